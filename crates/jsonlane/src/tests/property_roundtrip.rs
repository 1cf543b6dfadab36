use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{Decoder, DecoderOptions, Value, marshal};

/// Encoding a value and decoding it back yields the same value, and the
/// encoded text is JSON another parser agrees with.
#[test]
fn value_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let bytes = marshal(&value);
        let decoded = Decoder::from_slice(&bytes).decode_value().unwrap();
        let oracle: Value = serde_json::from_slice(&bytes).unwrap();
        decoded == value && oracle == value
    }

    QuickCheck::new().tests(1_000).quickcheck(prop as fn(Value) -> bool);
}

#[test]
fn long_float_literal_agrees_with_serde_json() {
    let value = Value::Array(vec![Value::Number(3_879_417_784_672_925e131), Value::Number(-1.234_567_890_123_456_7e-300)]);
    let bytes = marshal(&value);
    let decoded = Decoder::from_slice(&bytes).decode_value().unwrap();
    let oracle: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(oracle, value);
}

/// The same holds when the text arrives through a reader in small pieces.
#[test]
fn value_roundtrip_through_reader() {
    struct Trickle<'a>(&'a [u8], usize);

    impl std::io::Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.1.min(buf.len()).min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop(values: Vec<Value>, step: usize) -> bool {
        let mut text = Vec::new();
        for v in &values {
            text.extend_from_slice(&marshal(v));
            text.push(b'\n');
        }
        let options = DecoderOptions {
            buffer_size: 1,
            ..Default::default()
        };
        let mut dec = Decoder::with_reader_options(Trickle(&text, 1 + step % 7), options);
        values.iter().all(|v| dec.decode_value().ok().as_ref() == Some(v))
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<Value>, usize) -> bool);
}

#[quickcheck]
fn skip_consumes_exactly_one_value(value: Value, tail: i64) -> bool {
    let mut text = marshal(&value);
    text.push(b' ');
    text.extend_from_slice(tail.to_string().as_bytes());
    let mut dec = Decoder::from_slice(&text);
    let mut n = 0i64;
    dec.skip().is_ok() && dec.int64(&mut n).is_ok() && n == tail
}

#[quickcheck]
fn scalars_roundtrip(v: i64, w: u64, s: String) -> bool {
    let mut text = marshal(&v);
    text.push(b' ');
    text.extend_from_slice(&marshal(&w));
    text.push(b' ');
    text.extend_from_slice(&marshal(&s));
    let mut dec = Decoder::from_slice(&text);
    let (mut v2, mut w2, mut s2) = (0i64, 0u64, String::new());
    dec.int64(&mut v2).is_ok() && dec.uint64(&mut w2).is_ok() && dec.string(&mut s2).is_ok() && (v, w, s) == (v2, w2, s2)
}
