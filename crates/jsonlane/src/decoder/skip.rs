//! Skipping one well-formed value without materializing it.

use super::Decoder;
use crate::{cursor::is_delimiter, error::Result, literal_buffer::Literal};

impl Decoder<'_> {
    /// Skips whitespace and exactly one value.
    pub(crate) fn skip_value(&mut self) -> Result<()> {
        match self.cursor.skip_whitespace() {
            None => Err(self.eof()),
            Some(b'"') => {
                self.cursor.advance();
                self.skip_string_body()
            }
            Some(b'{') => {
                self.cursor.advance();
                self.nested(Self::skip_object_members)
            }
            Some(b'[') => {
                self.cursor.advance();
                self.nested(Self::skip_array_elements)
            }
            Some(b'-' | b'0'..=b'9') => self.skip_number(),
            Some(b) => match Literal::from_first(b) {
                Some(lit) => self.literal(lit).map(drop),
                None => Err(self.unexpected(Some(b))),
            },
        }
    }

    /// Moves past the closing quote of a string whose opening quote is
    /// consumed.
    pub(crate) fn skip_string_body(&mut self) -> Result<()> {
        loop {
            match self.cursor.scan_string_run(None) {
                None => return Err(self.eof()),
                Some(b'"') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some(_) => {
                    self.cursor.advance();
                    if self.cursor.next_byte().is_none() {
                        return Err(self.eof());
                    }
                }
            }
        }
    }

    fn skip_number(&mut self) -> Result<()> {
        loop {
            match self.cursor.peek() {
                Some(b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') => self.cursor.advance(),
                Some(b) if !is_delimiter(b) => return Err(self.unexpected(Some(b))),
                _ => return Ok(()),
            }
        }
    }

    fn skip_object_members(&mut self) -> Result<()> {
        if self.cursor.skip_whitespace() == Some(b'}') {
            self.cursor.advance();
            return Ok(());
        }
        loop {
            self.expect_byte(b'"')?;
            self.skip_string_body()?;
            self.expect_byte(b':')?;
            self.skip_value()?;
            match self.cursor.skip_whitespace() {
                Some(b',') => self.cursor.advance(),
                Some(b'}') => {
                    self.cursor.advance();
                    return Ok(());
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn skip_array_elements(&mut self) -> Result<()> {
        if self.cursor.skip_whitespace() == Some(b']') {
            self.cursor.advance();
            return Ok(());
        }
        loop {
            self.skip_value()?;
            match self.cursor.skip_whitespace() {
                Some(b',') => self.cursor.advance(),
                Some(b']') => {
                    self.cursor.advance();
                    return Ok(());
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{Decoder, DecoderOptions, SyntaxError};

    #[rstest]
    #[case("true")]
    #[case("null")]
    #[case("-1.5e+3")]
    #[case(r#""a \" b""#)]
    #[case("[]")]
    #[case(r#"{"a": [1, {"b": null}], "c": "}"}"#)]
    #[case(" [ 1 , 2 ] ")]
    fn skips_well_formed_values(#[case] input: &str) {
        let mut dec = Decoder::from_slice(input.as_bytes());
        dec.skip().unwrap();
        assert_eq!(dec.cursor.skip_whitespace(), None);
    }

    #[rstest]
    #[case("[1,]")]
    #[case(r#"{"a":1,}"#)]
    #[case(r#"{"a" 1}"#)]
    #[case("[1 2]")]
    #[case("1x")]
    #[case("trou")]
    #[case("faulse")]
    #[case("nil")]
    #[case(r#"{"a":"#)]
    #[case("[")]
    fn rejects_malformed_values(#[case] input: &str) {
        let err = Decoder::from_slice(input.as_bytes()).skip().unwrap_err();
        assert!(err.is_invalid_json(), "{input}: {err}");
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = "[".repeat(5) + &"]".repeat(5);
        let options = DecoderOptions {
            max_depth: 4,
            ..Default::default()
        };
        let err = Decoder::from_slice(deep.as_bytes()).with_options(options).skip().unwrap_err();
        assert_eq!(err.syntax(), Some(&SyntaxError::DepthLimitExceeded(4)));
    }
}
