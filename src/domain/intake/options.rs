//! Quick-reply option extraction from generated replies.
//!
//! The generation service is instructed to end replies that call for a
//! discrete choice with a marker of the form `[OPTIONS: Yes, No]`. This
//! module strips the marker from the display text and parses the option
//! list; it is pure text processing, independent of the generation call.

/// Marker prefix embedded in generated text.
const MARKER_PREFIX: &str = "[OPTIONS:";

/// Delimiters between options: the neutral comma and the Arabic comma.
const DELIMITERS: [char; 2] = [',', '\u{060C}'];

/// A generated reply after option extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReply {
    /// Display text with the marker removed and whitespace trimmed.
    pub text: String,
    /// Parsed options, in marker order, duplicates preserved.
    pub options: Vec<String>,
}

impl ExtractedReply {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Parses the first `[OPTIONS: ...]` marker out of a generated reply.
///
/// With no marker (or an unterminated one) the text is returned unchanged
/// and the option list is empty. Only the first marker is honored; any
/// later occurrences are left in the text untouched.
pub fn extract_options(reply: &str) -> ExtractedReply {
    let Some(start) = reply.find(MARKER_PREFIX) else {
        return ExtractedReply {
            text: reply.to_string(),
            options: Vec::new(),
        };
    };

    let after_prefix = start + MARKER_PREFIX.len();
    let Some(close) = reply[after_prefix..].find(']') else {
        return ExtractedReply {
            text: reply.to_string(),
            options: Vec::new(),
        };
    };
    let close = after_prefix + close;

    let options = reply[after_prefix..close]
        .split(&DELIMITERS[..])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut text = String::with_capacity(reply.len());
    text.push_str(&reply[..start]);
    text.push_str(&reply[close + 1..]);

    ExtractedReply {
        text: text.trim().to_string(),
        options,
    }
}
