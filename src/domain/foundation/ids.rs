//! Strongly-typed identifier value objects.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Number of random bytes behind a session identifier (128 bits).
const SESSION_ID_BYTES: usize = 16;

/// Unique identifier for an intake session.
///
/// Backed by 128 bits from the OS entropy source, encoded as URL-safe
/// base64. Session ids are bearer tokens: knowing one is the only
/// credential needed to continue a conversation, so they must be
/// unguessable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a new random SessionId.
    ///
    /// Draws from the OS entropy source; an entropy failure aborts the
    /// process, since every identifier issued afterwards would be suspect.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        if s.len() > 64 || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ValidationError::invalid_format(
                "session_id",
                "not a session token",
            ));
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_url_safe_tokens() {
        let id = SessionId::generate();
        // 16 bytes -> 22 base64url chars, no padding
        assert_eq!(id.as_str().len(), 22);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(SessionId::generate()), "session id collision");
        }
    }

    #[test]
    fn round_trips_through_from_str() {
        let id = SessionId::generate();
        let parsed: SessionId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_empty_and_malformed_tokens() {
        assert!("".parse::<SessionId>().is_err());
        assert!("   ".parse::<SessionId>().is_err());
        assert!("not a token".parse::<SessionId>().is_err());
        assert!("semi;colon".parse::<SessionId>().is_err());
    }

    #[test]
    fn serializes_transparently() {
        let id: SessionId = "abc123_-XYZ".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123_-XYZ\"");
    }
}
