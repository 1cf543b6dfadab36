//! Accumulates the four hexadecimal digits of a `\uXXXX` escape.
//!
//! The result is a UTF-16 code unit rather than a `char`: surrogate halves
//! are legal here and get paired (or replaced) by the string lexer.

use crate::error::SyntaxError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    unit: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds one ASCII hex digit.
    ///
    /// Returns `Ok(Some(unit))` after the fourth digit and resets itself.
    pub(crate) fn feed(&mut self, b: u8) -> Result<Option<u16>, SyntaxError> {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(SyntaxError::InvalidUnicodeEscapeChar(char::from(b))),
        };
        self.unit = (self.unit << 4) | u16::from(digit);
        self.len += 1;
        if self.len == 4 {
            let unit = self.unit;
            *self = Self::default();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }
}

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

pub(crate) fn combine_surrogates(high: u16, low: u16) -> char {
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(digits: &[u8]) -> Result<Option<u16>, SyntaxError> {
        let mut buf = UnicodeEscapeBuffer::new();
        let mut last = None;
        for &d in digits {
            last = buf.feed(d)?;
        }
        Ok(last)
    }

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'4').unwrap(), None);
        assert_eq!(buf.feed(b'1').unwrap(), Some(0x41));
    }

    #[test]
    fn mixed_case_hex() {
        assert_eq!(feed_all(b"AbCd").unwrap(), Some(0xABCD));
    }

    #[test]
    fn surrogates_are_returned_as_units() {
        assert_eq!(feed_all(b"D834").unwrap(), Some(0xD834));
        assert!(is_high_surrogate(0xD834));
        assert!(is_low_surrogate(0xDD1E));
        assert_eq!(combine_surrogates(0xD834, 0xDD1E), '\u{1D11E}');
    }

    #[test]
    fn resets_after_four_digits() {
        let mut buf = UnicodeEscapeBuffer::new();
        for d in b"ffff" {
            buf.feed(*d).unwrap();
        }
        assert_eq!(feed_all(b"0020").unwrap(), Some(0x20));
        assert_eq!(buf.feed(b'0').unwrap(), None);
    }

    #[test]
    fn invalid_hex_error() {
        let err = feed_all(b"2Z70").unwrap_err();
        assert_eq!(err, SyntaxError::InvalidUnicodeEscapeChar('Z'));
    }
}
