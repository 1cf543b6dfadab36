//! String lexing: the unescaping variant, the verbatim "no-escape" variant
//! and the borrowing fast path.

use std::borrow::Cow;

use memchr::memchr2;

use super::{Decoder, Lead};
use crate::{
    error::{Result, SyntaxError},
    escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate},
};

#[inline]
fn push_char(out: &mut Vec<u8>, c: char) {
    let mut tmp = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
}

impl<'de> Decoder<'de> {
    /// Reads string contents up to and including the closing quote.
    ///
    /// The opening quote must already be consumed.
    pub(crate) fn read_string_bytes(&mut self, out: &mut Vec<u8>, unescape: bool) -> Result<()> {
        loop {
            match self.cursor.scan_string_run(Some(out)) {
                None => return Err(self.eof()),
                Some(b'"') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some(_) => {
                    self.cursor.advance();
                    if unescape {
                        self.unescape(out)?;
                    } else {
                        out.push(b'\\');
                        match self.cursor.next_byte() {
                            Some(b) => out.push(b),
                            None => return Err(self.eof()),
                        }
                    }
                }
            }
        }
    }

    /// Decodes the escape whose backslash was just consumed.
    fn unescape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let Some(b) = self.cursor.peek() else {
            return Err(self.eof());
        };
        let plain = match b {
            b'"' | b'\\' | b'/' => b,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                self.cursor.advance();
                let unit = self.read_hex4()?;
                return self.push_code_unit(out, unit);
            }
            other => return Err(self.syntax(SyntaxError::InvalidEscape(char::from(other)))),
        };
        self.cursor.advance();
        out.push(plain);
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u16> {
        let mut escape = UnicodeEscapeBuffer::new();
        loop {
            let Some(b) = self.cursor.peek() else {
                return Err(self.eof());
            };
            match escape.feed(b) {
                Err(e) => return Err(self.syntax(e)),
                Ok(unit) => {
                    self.cursor.advance();
                    if let Some(unit) = unit {
                        return Ok(unit);
                    }
                }
            }
        }
    }

    /// Emits one UTF-16 code unit, pairing a high surrogate with a `\uXXXX`
    /// low surrogate that follows it.
    fn push_code_unit(&mut self, out: &mut Vec<u8>, mut unit: u16) -> Result<()> {
        loop {
            if !is_high_surrogate(unit) {
                let c = if is_low_surrogate(unit) {
                    char::REPLACEMENT_CHARACTER
                } else {
                    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
                };
                push_char(out, c);
                return Ok(());
            }
            if self.cursor.peek() != Some(b'\\') {
                push_char(out, char::REPLACEMENT_CHARACTER);
                return Ok(());
            }
            self.cursor.advance();
            if self.cursor.peek() != Some(b'u') {
                push_char(out, char::REPLACEMENT_CHARACTER);
                return self.unescape(out);
            }
            self.cursor.advance();
            let next = self.read_hex4()?;
            if is_low_surrogate(next) {
                push_char(out, combine_surrogates(unit, next));
                return Ok(());
            }
            push_char(out, char::REPLACEMENT_CHARACTER);
            unit = next;
        }
    }

    /// Reads the rest of a string into `out`, replacing its contents.
    pub(crate) fn fill_string(&mut self, out: &mut String, unescape: bool) -> Result<()> {
        self.with_scratch(|dec, bytes| {
            dec.read_string_bytes(bytes, unescape)?;
            dec.store_utf8(bytes, out)
        })
    }

    fn store_utf8(&self, bytes: &[u8], out: &mut String) -> Result<()> {
        let s = core::str::from_utf8(bytes).map_err(|_| self.syntax(SyntaxError::InvalidUtf8))?;
        out.clear();
        out.push_str(s);
        Ok(())
    }

    fn string_into(&mut self, v: &mut String, unescape: bool) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End => Ok(()),
            Lead::Null => {
                v.clear();
                Ok(())
            }
            Lead::Byte(b'"') => {
                self.cursor.advance();
                self.fill_string(v, unescape)
            }
            Lead::Byte(b) => Err(self.mismatch(b, "string")),
        }
    }

    fn string_option(&mut self, v: &mut Option<String>, unescape: bool) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End => Ok(()),
            Lead::Null => {
                *v = None;
                Ok(())
            }
            Lead::Byte(b'"') => {
                self.cursor.advance();
                self.fill_string(v.get_or_insert_with(String::new), unescape)
            }
            Lead::Byte(b) => Err(self.mismatch(b, "string")),
        }
    }

    /// Decodes a JSON string into `v`, resolving escapes.
    ///
    /// `null` clears `v`.
    ///
    /// ```rust
    /// let mut s = String::new();
    /// jsonlane::Decoder::from_slice(br#""\uD834\uDD1E""#).string(&mut s).unwrap();
    /// assert_eq!(s, "𝄞");
    /// ```
    pub fn string(&mut self, v: &mut String) -> Result<()> {
        self.string_into(v, true)
    }

    /// Same as [`Decoder::string`].
    #[inline]
    pub fn add_string(&mut self, v: &mut String) -> Result<()> {
        self.string(v)
    }

    /// Decodes a JSON string into `v` without touching escape sequences.
    pub fn string_no_escape(&mut self, v: &mut String) -> Result<()> {
        self.string_into(v, false)
    }

    /// Same as [`Decoder::string_no_escape`].
    #[inline]
    pub fn add_string_no_escape(&mut self, v: &mut String) -> Result<()> {
        self.string_no_escape(v)
    }

    /// Decodes a JSON string into an `Option`; `null` stores `None`.
    pub fn string_null(&mut self, v: &mut Option<String>) -> Result<()> {
        self.string_option(v, true)
    }

    /// Same as [`Decoder::string_null`].
    #[inline]
    pub fn add_string_null(&mut self, v: &mut Option<String>) -> Result<()> {
        self.string_null(v)
    }

    /// Verbatim variant of [`Decoder::string_null`].
    pub fn string_no_escape_null(&mut self, v: &mut Option<String>) -> Result<()> {
        self.string_option(v, false)
    }

    /// Decodes a JSON string, borrowing it from the input slice when it holds
    /// no escapes. Stream-backed decoders always return an owned string.
    ///
    /// Returns `None` for `null` and at the end of input.
    ///
    /// ```rust
    /// use std::borrow::Cow;
    ///
    /// let mut dec = jsonlane::Decoder::from_slice(br#""plain" "esc\n""#);
    /// assert!(matches!(dec.string_borrowed().unwrap(), Some(Cow::Borrowed("plain"))));
    /// assert!(matches!(dec.string_borrowed().unwrap(), Some(Cow::Owned(_))));
    /// ```
    pub fn string_borrowed(&mut self) -> Result<Option<Cow<'de, str>>> {
        self.borrowed_string(true)
    }

    /// Verbatim variant of [`Decoder::string_borrowed`]; always borrows from
    /// slice-backed input.
    pub fn string_no_escape_borrowed(&mut self) -> Result<Option<Cow<'de, str>>> {
        self.borrowed_string(false)
    }

    fn borrowed_string(&mut self, unescape: bool) -> Result<Option<Cow<'de, str>>> {
        self.start();
        match self.lead()? {
            Lead::End | Lead::Null => Ok(None),
            Lead::Byte(b'"') => {
                self.cursor.advance();
                self.borrow_or_copy(unescape).map(Some)
            }
            Lead::Byte(b) => Err(self.mismatch(b, "string")),
        }
    }

    fn borrow_or_copy(&mut self, unescape: bool) -> Result<Cow<'de, str>> {
        if let Some(input) = self.cursor.borrowed() {
            let start = self.cursor.pos();
            let plain = !unescape || memchr2(b'"', b'\\', &input[start..]).is_some_and(|i| input[start + i] == b'"');
            if plain {
                self.skip_string_body()?;
                let bytes = &input[start..self.cursor.pos() - 1];
                return core::str::from_utf8(bytes)
                    .map(Cow::Borrowed)
                    .map_err(|_| self.syntax(SyntaxError::InvalidUtf8));
            }
        }
        let mut owned = String::new();
        self.fill_string(&mut owned, unescape)?;
        Ok(Cow::Owned(owned))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{Decoder, SyntaxError};

    fn decode(input: &str) -> crate::Result<String> {
        let mut s = String::new();
        Decoder::from_slice(input.as_bytes()).string(&mut s).map(|()| s)
    }

    #[rstest]
    #[case(r#""""#, "")]
    #[case(r#""hello world""#, "hello world")]
    #[case(r#""\"\\\/\b\f\n\r\t""#, "\"\\/\u{8}\u{c}\n\r\t")]
    #[case(r#""été""#, "été")]
    #[case(r#""\uD834\uDD1E""#, "\u{1D11E}")]
    #[case(r#""\uD834""#, "\u{FFFD}")]
    #[case(r#""\uDD1E""#, "\u{FFFD}")]
    #[case(r#""\uD834\\""#, "\u{FFFD}\\")]
    #[case(r#""\uD834\t""#, "\u{FFFD}\t")]
    #[case(r#""\uD834x""#, "\u{FFFD}x")]
    #[case(r#""\uD834\uD834""#, "\u{FFFD}\u{FFFD}")]
    #[case(r#""\uD834𝄞""#, "\u{FFFD}\u{1D11E}")]
    #[case("\"tab\there\"", "tab\there")]
    #[case(r#""日本語""#, "日本語")]
    fn unescapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode(input).unwrap(), expected);
    }

    #[rstest]
    #[case(r#""\uD834\h""#, SyntaxError::InvalidEscape('h'))]
    #[case(r#""\u2Z70""#, SyntaxError::InvalidUnicodeEscapeChar('Z'))]
    #[case(r#""\x""#, SyntaxError::InvalidEscape('x'))]
    #[case(r#""\uD834\"#, SyntaxError::UnexpectedEndOfInput)]
    #[case(r#""\uD834"#, SyntaxError::UnexpectedEndOfInput)]
    #[case(r#""\u00"#, SyntaxError::UnexpectedEndOfInput)]
    #[case(r#""open"#, SyntaxError::UnexpectedEndOfInput)]
    fn rejects(#[case] input: &str, #[case] expected: SyntaxError) {
        let err = decode(input).unwrap_err();
        assert_eq!(err.syntax(), Some(&expected), "{input}");
    }

    #[test]
    fn invalid_utf8_is_invalid_json() {
        let mut s = String::new();
        let err = Decoder::from_slice(b"\"\xff\"").string(&mut s).unwrap_err();
        assert_eq!(err.syntax(), Some(&SyntaxError::InvalidUtf8));
    }

    #[rstest]
    #[case(r#""\n""#, r"\n")]
    #[case(r#""a\"b""#, r#"a\"b"#)]
    #[case(r#""é""#, r"é")]
    fn no_escape_keeps_sequences(#[case] input: &str, #[case] expected: &str) {
        let mut s = String::new();
        Decoder::from_slice(input.as_bytes()).string_no_escape(&mut s).unwrap();
        assert_eq!(s, expected);
    }

    #[test]
    fn no_escape_unterminated() {
        let mut s = String::new();
        let err = Decoder::from_slice(br#""\"#).string_no_escape(&mut s).unwrap_err();
        assert!(err.is_invalid_json());
    }

    #[test]
    fn null_and_mismatch() {
        let mut s = "keep".to_owned();
        Decoder::from_slice(b"").string(&mut s).unwrap();
        assert_eq!(s, "keep");
        Decoder::from_slice(b" null ").string(&mut s).unwrap();
        assert_eq!(s, "");

        let mut opt = Some("x".to_owned());
        Decoder::from_slice(b"null").string_null(&mut opt).unwrap();
        assert_eq!(opt, None);

        let err = Decoder::from_slice(b"12").string(&mut s).unwrap_err();
        assert!(err.is_invalid_unmarshal());
    }

    #[test]
    fn input_is_left_untouched() {
        let input = br#""\/foo\/bar""#.to_vec();
        let copy = input.clone();
        let mut s = String::new();
        Decoder::from_slice(&input).string(&mut s).unwrap();
        assert_eq!(s, "/foo/bar");
        assert_eq!(input, copy);
    }

    #[test]
    fn no_escape_borrowed_always_borrows_slices() {
        let mut dec = Decoder::from_slice(br#""a\nb""#);
        let s = dec.string_no_escape_borrowed().unwrap().unwrap();
        assert!(matches!(s, std::borrow::Cow::Borrowed(r"a\nb")));
    }

    #[test]
    fn stream_strings_are_owned() {
        let mut dec = Decoder::new(&br#""plain""#[..]);
        let s = dec.string_borrowed().unwrap().unwrap();
        assert!(matches!(s, std::borrow::Cow::Owned(ref o) if o == "plain"));
    }
}
