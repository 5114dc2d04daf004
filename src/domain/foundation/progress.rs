//! Questionnaire progress value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer percentage of the questionnaire completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const COMPLETE: Self = Self(100);

    /// Creates a new Progress, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Computes progress for `answered` of `total` questions,
    /// rounded to the nearest integer percent.
    pub fn of(answered: usize, total: usize) -> Self {
        if total == 0 {
            return Self::COMPLETE;
        }
        let pct = (answered as f64 / total as f64) * 100.0;
        Self::new(pct.round() as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
