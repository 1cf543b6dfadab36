//! Error types returned by decoding and encoding.
//!
//! Three recoverable failure classes exist: malformed input
//! ([`Error::InvalidJson`]), well-formed input that does not fit the
//! destination ([`Error::InvalidUnmarshal`]) and I/O failures of the bound
//! reader or writer ([`Error::Io`]). Using a pooled decoder or encoder after
//! it was released is a programmer error and panics with a [`PoolMisuse`]
//! message instead.

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Any error a decode or encode call can report.
#[derive(Error, Debug)]
pub enum Error {
    /// The input violates JSON's lexical or structural grammar.
    #[error("invalid JSON: {source} at offset {offset}")]
    InvalidJson {
        /// What the lexer found.
        source: SyntaxError,
        /// Offset of the offending byte, counted from the start of the
        /// current top-level call.
        offset: usize,
    },
    /// The input is well formed but cannot be represented by the destination.
    #[error("invalid unmarshal: {0}")]
    InvalidUnmarshal(#[from] UnmarshalError),
    /// The underlying reader or writer failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns `true` for lexical and structural errors.
    #[must_use]
    pub fn is_invalid_json(&self) -> bool {
        matches!(self, Error::InvalidJson { .. })
    }

    /// Returns `true` when a well-formed value did not fit its destination.
    #[must_use]
    pub fn is_invalid_unmarshal(&self) -> bool {
        matches!(self, Error::InvalidUnmarshal(_))
    }

    /// Returns `true` for reader and writer failures.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// The syntax error behind an [`Error::InvalidJson`].
    #[must_use]
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::InvalidJson { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Lexical and structural violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{}'", .0.escape_debug())]
    /// A byte that cannot appear at this point of the grammar.
    InvalidCharacter(char),
    #[error("invalid unicode escape sequence at character: '{}'", .0.escape_debug())]
    /// A non-hexadecimal digit inside `\uXXXX`.
    InvalidUnicodeEscapeChar(char),
    #[error("invalid escape character '{}'", .0.escape_debug())]
    /// A backslash followed by a letter JSON does not define.
    InvalidEscape(char),
    #[error("exponent does not fit a 64-bit integer")]
    /// The exponent literal of a number overflowed.
    ExponentOverflow,
    #[error("exponent beyond the power-of-ten table of integer conversion")]
    /// An integer destination received an exponent of magnitude 20 or more.
    ExponentOutOfRange,
    #[error("string is not valid UTF-8")]
    /// String contents are not valid UTF-8.
    InvalidUtf8,
    #[error("maximum nesting depth of {0} exceeded")]
    /// Containers nested deeper than the configured limit.
    DepthLimitExceeded(usize),
    #[error("unexpected end of input")]
    /// The input ended in the middle of a value.
    UnexpectedEndOfInput,
}

/// Well-formed values the destination cannot hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnmarshalError {
    /// The JSON value has a different kind than the destination.
    #[error("cannot decode JSON {found} into {target}")]
    Mismatch {
        /// Kind of the JSON value, such as `"string"`.
        found: &'static str,
        /// Name of the destination type.
        target: &'static str,
    },
    /// The number does not fit the destination width.
    #[error("number out of range for {target}")]
    OutOfRange {
        /// Name of the destination type.
        target: &'static str,
    },
    /// A time string does not match its layout.
    #[error("cannot parse {value:?} as {layout:?}: {reason}")]
    Time {
        /// The string that failed to parse.
        value: String,
        /// The layout it was parsed with.
        layout: String,
        /// Parser message.
        reason: String,
    },
}

/// Payload of the panic raised when a released pooled instance is used.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolMisuse {
    /// A decoder was used after `release`.
    #[error("invalid usage of pooled decoder")]
    Decoder,
    /// An encoder was used after `release`.
    #[error("invalid usage of pooled encoder")]
    Encoder,
}

impl PoolMisuse {
    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        panic!("{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_display_includes_offset() {
        let err = Error::InvalidJson {
            source: SyntaxError::InvalidCharacter('?'),
            offset: 3,
        };
        assert_eq!(err.to_string(), "invalid JSON: invalid character '?' at offset 3");
        assert!(err.is_invalid_json());
        assert_eq!(err.syntax(), Some(&SyntaxError::InvalidCharacter('?')));
    }

    #[test]
    fn control_characters_are_escaped_in_messages() {
        let err = SyntaxError::InvalidCharacter('\n');
        assert_eq!(err.to_string(), "invalid character '\\n'");
    }

    #[test]
    fn non_ascii_characters_are_shown_as_is() {
        assert_eq!(SyntaxError::InvalidCharacter('é').to_string(), "invalid character 'é'");
        assert_eq!(SyntaxError::InvalidEscape('ü').to_string(), "invalid escape character 'ü'");
    }

    #[test]
    fn unmarshal_converts_into_error() {
        let err: Error = UnmarshalError::OutOfRange { target: "i8" }.into();
        assert!(err.is_invalid_unmarshal());
        assert_eq!(err.to_string(), "invalid unmarshal: number out of range for i8");
    }

    #[test]
    #[should_panic(expected = "invalid usage of pooled encoder")]
    fn misuse_panics_with_message() {
        PoolMisuse::Encoder.raise();
    }
}
