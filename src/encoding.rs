//! Character set handling for text-mode content access.
//!
//! # Responsibilities
//! - Map charset names (and common aliases) to a decoder
//! - Decode raw request bytes into the internal text representation
//!
//! # Design Decisions
//! - Only charsets whose decoding is total or trivially checkable are
//!   supported; unknown names are an error, not a silent UTF-8 fallback
//! - Invalid byte sequences decode to U+FFFD rather than failing, so a
//!   malformed body cannot make text-mode access error out

use crate::error::{ConnError, ConnResult};

/// A supported character set for request/response text conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8 (the internal representation; decoding is replacement-lossy).
    #[default]
    Utf8,
    /// US-ASCII; bytes above 0x7F decode to U+FFFD.
    Ascii,
    /// ISO-8859-1 / Latin-1; every byte maps 1:1 to U+00..U+FF.
    Latin1,
}

impl Charset {
    /// Look up a charset by name. Matching is case-insensitive and accepts
    /// the usual aliases.
    pub fn from_name(name: &str) -> ConnResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "us-ascii" | "ascii" => Ok(Charset::Ascii),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" => Ok(Charset::Latin1),
            _ => Err(ConnError::UnknownCharset(name.to_string())),
        }
    }

    /// Canonical name of this charset.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Ascii => "us-ascii",
            Charset::Latin1 => "iso-8859-1",
        }
    }

    /// Decode raw bytes into text.
    pub fn decode(&self, raw: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(raw).into_owned(),
            Charset::Ascii => raw
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                .collect(),
            Charset::Latin1 => raw.iter().map(|&b| b as char).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_lookup_aliases() {
        assert_eq!(Charset::from_name("UTF-8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::from_name("latin1").unwrap(), Charset::Latin1);
        assert_eq!(Charset::from_name("US-ASCII").unwrap(), Charset::Ascii);
    }

    #[test]
    fn charset_lookup_unknown_is_error() {
        let err = Charset::from_name("klingon-1").unwrap_err();
        assert!(err.to_string().contains("klingon-1"));
    }

    #[test]
    fn latin1_decodes_every_byte() {
        let raw = [0x61, 0xE9, 0xFF];
        assert_eq!(Charset::Latin1.decode(&raw), "a\u{E9}\u{FF}");
    }

    #[test]
    fn ascii_replaces_high_bytes() {
        let raw = [b'h', b'i', 0x80];
        assert_eq!(Charset::Ascii.decode(&raw), "hi\u{FFFD}");
    }
}
