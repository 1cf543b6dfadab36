//! Number lexing and conversion.
//!
//! [`Decoder::scan_number`] checks the grammar and records where the parts of
//! the literal sit in the cursor buffer; conversion into a destination width
//! happens afterwards on those bytes.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

use core::{ops::Range, str::FromStr};

use super::{Decoder, Lead, Slot};
use crate::error::{Result, SyntaxError, UnmarshalError};

/// Powers of ten addressable by an exponent.
const POW10: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// Where the parts of a number literal sit in the cursor buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumberLexeme {
    pub(crate) span: Range<usize>,
    pub(crate) negative: bool,
    pub(crate) int_digits: Range<usize>,
    pub(crate) frac_digits: Range<usize>,
    pub(crate) exponent: i64,
}

pub(crate) trait Integer: Copy + Default {
    const NAME: &'static str;
    const MAX_POSITIVE: u64;
    const MAX_NEGATIVE: u64;

    fn from_magnitude(negative: bool, magnitude: u64) -> Self;
}

macro_rules! signed {
    ($($t:ty),*) => {$(
        impl Integer for $t {
            const NAME: &'static str = stringify!($t);
            const MAX_POSITIVE: u64 = <$t>::MAX as u64;
            const MAX_NEGATIVE: u64 = <$t>::MIN.unsigned_abs() as u64;

            #[inline]
            fn from_magnitude(negative: bool, magnitude: u64) -> Self {
                if negative {
                    (magnitude as i64).wrapping_neg() as $t
                } else {
                    magnitude as $t
                }
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($t:ty),*) => {$(
        impl Integer for $t {
            const NAME: &'static str = stringify!($t);
            const MAX_POSITIVE: u64 = <$t>::MAX as u64;
            const MAX_NEGATIVE: u64 = 0;

            #[inline]
            fn from_magnitude(_: bool, magnitude: u64) -> Self {
                magnitude as $t
            }
        }
    )*};
}

signed!(i8, i16, i32, i64);
unsigned!(u8, u16, u32, u64);

pub(crate) trait Float: Copy + Default + FromStr {
    const NAME: &'static str;

    fn is_finite(self) -> bool;
}

impl Float for f32 {
    const NAME: &'static str = "f32";

    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Float for f64 {
    const NAME: &'static str = "f64";

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Decoder<'_> {
    /// Scans a number literal starting at `-` or a digit.
    pub(crate) fn scan_number(&mut self) -> Result<NumberLexeme> {
        let start = self.cursor.pos();
        let negative = self.cursor.peek() == Some(b'-');
        if negative {
            self.cursor.advance();
        }

        let int_start = self.cursor.pos();
        match self.cursor.peek() {
            Some(b'0') => {
                self.cursor.advance();
                if let Some(b @ b'0'..=b'9') = self.cursor.peek() {
                    return Err(self.unexpected(Some(b)));
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            other => return Err(self.unexpected(other)),
        }
        let int_digits = int_start..self.cursor.pos();

        let mut frac_digits = int_digits.end..int_digits.end;
        if self.cursor.peek() == Some(b'.') {
            self.cursor.advance();
            let frac_start = self.cursor.pos();
            self.skip_digits();
            if self.cursor.pos() == frac_start {
                let found = self.cursor.peek();
                return Err(self.unexpected(found));
            }
            frac_digits = frac_start..self.cursor.pos();
        }

        let mut exponent = 0i64;
        if let Some(b'e' | b'E') = self.cursor.peek() {
            self.cursor.advance();
            let exp_negative = match self.cursor.peek() {
                Some(b'-') => {
                    self.cursor.advance();
                    true
                }
                Some(b'+') => {
                    self.cursor.advance();
                    false
                }
                _ => false,
            };
            let exp_start = self.cursor.pos();
            while let Some(b @ b'0'..=b'9') = self.cursor.peek() {
                exponent = exponent
                    .checked_mul(10)
                    .and_then(|e| e.checked_add(i64::from(b - b'0')))
                    .ok_or_else(|| self.syntax(SyntaxError::ExponentOverflow))?;
                self.cursor.advance();
            }
            if self.cursor.pos() == exp_start {
                let found = self.cursor.peek();
                return Err(self.unexpected(found));
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        match self.cursor.peek() {
            Some(b) if !crate::cursor::is_delimiter(b) => Err(self.unexpected(Some(b))),
            _ => Ok(NumberLexeme {
                span: start..self.cursor.pos(),
                negative,
                int_digits,
                frac_digits,
                exponent,
            }),
        }
    }

    #[inline]
    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.cursor.peek() {
            self.cursor.advance();
        }
    }

    pub(crate) fn read_integer<T: Integer>(&mut self) -> Result<Slot<T>> {
        match self.lead()? {
            Lead::End => Ok(Slot::Absent),
            Lead::Null => Ok(Slot::Null),
            Lead::Byte(b'-' | b'0'..=b'9') => {
                let lexeme = self.scan_number()?;
                if lexeme.exponent.unsigned_abs() >= POW10.len() as u64 {
                    return Err(self.syntax(SyntaxError::ExponentOutOfRange));
                }
                Ok(Slot::Value(integer_from_lexeme(self.cursor.data(), &lexeme)?))
            }
            Lead::Byte(b) => Err(self.mismatch(b, T::NAME)),
        }
    }

    pub(crate) fn read_float<T: Float>(&mut self) -> Result<Slot<T>> {
        match self.lead()? {
            Lead::End => Ok(Slot::Absent),
            Lead::Null => Ok(Slot::Null),
            Lead::Byte(b'-' | b'0'..=b'9') => {
                let lexeme = self.scan_number()?;
                Ok(Slot::Value(float_from_lexeme(self.cursor.data(), &lexeme)?))
            }
            Lead::Byte(b) => Err(self.mismatch(b, T::NAME)),
        }
    }
}

/// Converts a scanned literal into an integer of width `T`.
///
/// Fractions truncate toward zero; fraction digits still shift with the
/// exponent, so `5.01e+10` is `50100000000`.
pub(crate) fn integer_from_lexeme<T: Integer>(data: &[u8], lexeme: &NumberLexeme) -> Result<T, UnmarshalError> {
    let out_of_range = UnmarshalError::OutOfRange { target: T::NAME };
    let limit = if lexeme.negative {
        T::MAX_NEGATIVE
    } else {
        T::MAX_POSITIVE
    };
    let (cutoff, cutlim) = (limit / 10, limit % 10);

    let mut magnitude = 0u64;
    for &b in &data[lexeme.int_digits.clone()] {
        let digit = u64::from(b - b'0');
        if magnitude > cutoff || (magnitude == cutoff && digit > cutlim) {
            return Err(out_of_range);
        }
        magnitude = magnitude * 10 + digit;
    }
    if lexeme.exponent == 0 {
        return Ok(T::from_magnitude(lexeme.negative, magnitude));
    }
    let mut scale = lexeme.exponent;
    for &b in &data[lexeme.frac_digits.clone()] {
        match magnitude.checked_mul(10).and_then(|m| m.checked_add(u64::from(b - b'0'))) {
            Some(next) => {
                magnitude = next;
                scale -= 1;
            }
            None if scale > 0 => return Err(out_of_range),
            None => break,
        }
    }

    let magnitude = match scale {
        0 => magnitude,
        _ if magnitude == 0 => 0,
        s if s > 0 => POW10
            .get(s as usize)
            .and_then(|p| magnitude.checked_mul(*p))
            .ok_or(out_of_range.clone())?,
        s => POW10.get(s.unsigned_abs() as usize).map_or(0, |p| magnitude / p),
    };
    if magnitude > limit {
        return Err(out_of_range);
    }
    Ok(T::from_magnitude(lexeme.negative, magnitude))
}

/// Parses a scanned literal with the standard library's float parser.
pub(crate) fn float_from_lexeme<T: Float>(data: &[u8], lexeme: &NumberLexeme) -> Result<T, UnmarshalError> {
    let out_of_range = UnmarshalError::OutOfRange { target: T::NAME };
    let text = core::str::from_utf8(&data[lexeme.span.clone()]).map_err(|_| out_of_range.clone())?;
    match text.parse::<T>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(out_of_range),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{Decoder, Error, SyntaxError, UnmarshalError};

    fn int64(input: &str) -> Result<i64, Error> {
        let mut v = 0;
        Decoder::from_slice(input.as_bytes()).int64(&mut v).map(|()| v)
    }

    #[rstest]
    #[case("0", 0)]
    #[case("-0", 0)]
    #[case("  42  ", 42)]
    #[case("2.4595", 2)]
    #[case("-7.8876", -7)]
    #[case("5.01e+10", 50_100_000_000)]
    #[case("1e2", 100)]
    #[case("1E2", 100)]
    #[case("8e+005", 800_000)]
    #[case("100000e-4", 10)]
    #[case("1e-2", 0)]
    #[case("0e-8", 0)]
    #[case("-1.5e1", -15)]
    #[case("9223372036854775807", i64::MAX)]
    #[case("-9223372036854775808", i64::MIN)]
    #[case("9223372036854775807.9", i64::MAX)]
    fn integer_conversion(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(int64(input).unwrap(), expected, "{input}");
    }

    #[rstest]
    #[case("9223372036854775808")]
    #[case("-9223372036854775809")]
    #[case("1e19")]
    #[case("\"1\"")]
    #[case("true")]
    #[case("[1]")]
    fn integer_unmarshal_errors(#[case] input: &str) {
        let err = int64(input).unwrap_err();
        assert!(err.is_invalid_unmarshal(), "{input}: {err}");
    }

    #[rstest]
    #[case("-7.8876a")]
    #[case("1.")]
    #[case("1.e3")]
    #[case(".5")]
    #[case("-")]
    #[case("01")]
    #[case("1e")]
    #[case("1e+")]
    #[case("0e10000000000000000000")]
    #[case("1e20")]
    #[case("1e-20")]
    #[case("0E40")]
    #[case("nxll")]
    #[case("1234\"")]
    fn integer_syntax_errors(#[case] input: &str) {
        let err = int64(input).unwrap_err();
        assert!(err.is_invalid_json(), "{input}: {err}");
    }

    #[test]
    fn exponent_literal_overflow_is_reported() {
        let err = int64("0e10000000000000000000").unwrap_err();
        assert_eq!(err.syntax(), Some(&SyntaxError::ExponentOverflow));
    }

    #[test]
    fn exponent_beyond_power_table_is_invalid_json() {
        let err = int64("0E40").unwrap_err();
        assert_eq!(err.syntax(), Some(&SyntaxError::ExponentOutOfRange));
        let mut v = 0u8;
        let err = Decoder::from_slice(b"5e-25").uint8(&mut v).unwrap_err();
        assert!(err.is_invalid_json(), "{err}");
        assert_eq!(int64("1e18").unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn negative_into_unsigned() {
        let mut v = 0u64;
        let err = Decoder::from_slice(b"-1").uint64(&mut v).unwrap_err();
        assert!(matches!(err, Error::InvalidUnmarshal(UnmarshalError::OutOfRange { target: "u64" })));
        Decoder::from_slice(b"-0").uint64(&mut v).unwrap();
        assert_eq!(v, 0);
    }

    #[test]
    fn mismatch_skips_the_offending_value() {
        let mut dec = Decoder::from_slice(br#""nope" 7"#);
        let mut v = 0i32;
        assert!(dec.int32(&mut v).unwrap_err().is_invalid_unmarshal());
        dec.int32(&mut v).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn null_resets_and_empty_input_is_a_noop() {
        let mut v = 5i16;
        Decoder::from_slice(b"").int16(&mut v).unwrap();
        assert_eq!(v, 5);
        Decoder::from_slice(b"null").int16(&mut v).unwrap();
        assert_eq!(v, 0);

        let mut opt = Some(3u16);
        Decoder::from_slice(b"null").uint16_null(&mut opt).unwrap();
        assert_eq!(opt, None);
        Decoder::from_slice(b"9").add_uint16_null(&mut opt).unwrap();
        assert_eq!(opt, Some(9));
    }

    #[rstest]
    #[case("1", 1.0)]
    #[case("-0.5", -0.5)]
    #[case("1.5e3", 1500.0)]
    #[case("2.2250738585072014e-308", 2.225_073_858_507_201_4e-308)]
    #[case("0.1", 0.1)]
    fn floats(#[case] input: &str, #[case] expected: f64) {
        let mut v = 0.0;
        Decoder::from_slice(input.as_bytes()).float64(&mut v).unwrap();
        assert_eq!(v.to_bits(), expected.to_bits());
    }

    #[test]
    fn float_overflow_is_out_of_range() {
        let mut v = 0.0f32;
        let err = Decoder::from_slice(b"1e39").float32(&mut v).unwrap_err();
        assert!(err.is_invalid_unmarshal());
    }
}
