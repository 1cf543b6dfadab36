const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `s` as a quoted JSON string.
///
/// Quote, backslash and the control characters get escaped; everything else,
/// including `/` and non-ASCII text, is copied as is.
pub(crate) fn write_escaped(buf: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    buf.reserve(bytes.len() + 2);
    buf.push(b'"');
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let short: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0C => b"\\f",
            0x00..=0x1F => &[],
            _ => continue,
        };
        buf.extend_from_slice(&bytes[start..i]);
        if short.is_empty() {
            buf.extend_from_slice(b"\\u00");
            buf.push(HEX[usize::from(b >> 4)]);
            buf.push(HEX[usize::from(b & 0xF)]);
        } else {
            buf.extend_from_slice(short);
        }
        start = i + 1;
    }
    buf.extend_from_slice(&bytes[start..]);
    buf.push(b'"');
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::write_escaped;

    #[rstest]
    #[case("", r#""""#)]
    #[case("plain", r#""plain""#)]
    #[case("a\"b\\c", r#""a\"b\\c""#)]
    #[case("\n\r\t\u{8}\u{c}", r#""\n\r\t\b\f""#)]
    #[case("\u{1b}\u{0}", r#""\u001b\u0000""#)]
    #[case("/é𝄞", "\"/é𝄞\"")]
    fn escapes(#[case] input: &str, #[case] expected: &str) {
        let mut buf = Vec::new();
        write_escaped(&mut buf, input);
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
