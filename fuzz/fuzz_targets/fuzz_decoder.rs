#![no_main]
use std::io::Read;

use arbitrary::Arbitrary;
use jsonlane::{Decoder, DecoderOptions, EmbeddedJson, marshal};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    /// Bytes handed to the reader per `read` call, minus one.
    step: u8,
    max_depth: u8,
    text: &'a [u8],
}

/// Reader returning at most `step` bytes per call.
struct Trickle<'a> {
    rest: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.rest.len());
        buf[..n].copy_from_slice(&self.rest[..n]);
        self.rest = &self.rest[n..];
        Ok(n)
    }
}

fn check(input: Input<'_>) {
    let options = DecoderOptions {
        buffer_size: 1,
        max_depth: usize::from(input.max_depth) + 1,
    };

    let from_slice = Decoder::from_slice(input.text).with_options(options).decode_value();
    let from_reader = Decoder::with_reader_options(
        Trickle {
            rest: input.text,
            step: usize::from(input.step) + 1,
        },
        options,
    )
    .decode_value();
    assert_eq!(from_slice.is_ok(), from_reader.is_ok());

    let Ok(value) = from_slice else {
        return;
    };
    assert_eq!(from_reader.ok().as_ref(), Some(&value));

    // Anything the dynamic decoder accepts is a well-formed value.
    assert!(Decoder::from_slice(input.text).with_options(options).skip().is_ok());
    let mut raw = EmbeddedJson::default();
    Decoder::from_slice(input.text)
        .with_options(options)
        .embedded_json(&mut raw)
        .expect("embedded capture of a decodable value");

    // Re-encoding is canonical: a second pass produces identical bytes.
    let once = marshal(&value);
    let reparsed = Decoder::from_slice(&once)
        .decode_value()
        .expect("encoded output decodes");
    assert_eq!(marshal(&reparsed), once);
}

fuzz_target!(|input: Input<'_>| check(input));
