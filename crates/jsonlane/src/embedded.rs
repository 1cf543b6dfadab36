//! Raw JSON values captured and re-emitted byte for byte.

use core::{fmt, ops::Deref};

use bstr::BStr;

use crate::{
    decoder::{Decode, Decoder},
    encoder::{Encode, Encoder},
    error::Result,
};

/// The exact bytes of one JSON value.
///
/// Decoding into it only checks the value is well formed; encoding writes the
/// bytes back unchanged. An empty span counts as absent for the omit-empty
/// writers.
///
/// ```rust
/// use jsonlane::{Decoder, EmbeddedJson};
///
/// let mut raw = EmbeddedJson::default();
/// Decoder::from_slice(br#" { "a" : [1, 2] } "#).embedded_json(&mut raw).unwrap();
/// assert_eq!(raw.as_bytes(), br#"{ "a" : [1, 2] }"#);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct EmbeddedJson(Vec<u8>);

impl EmbeddedJson {
    /// Wraps bytes the caller knows to be one JSON value.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The captured bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes `self`, returning the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for EmbeddedJson {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EmbeddedJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EmbeddedJson").field(&BStr::new(&self.0)).finish()
    }
}

impl From<&str> for EmbeddedJson {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for EmbeddedJson {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Decoder<'_> {
    /// Captures the next value verbatim, without its surrounding whitespace.
    pub fn embedded_json(&mut self, v: &mut EmbeddedJson) -> Result<()> {
        self.start();
        if self.cursor.skip_whitespace().is_none() {
            return match self.cursor.take_error() {
                Some(io) => Err(io.into()),
                None => Ok(()),
            };
        }
        let start = self.cursor.pos();
        self.skip_value()?;
        v.0.clear();
        v.0.extend_from_slice(&self.cursor.data()[start..self.cursor.pos()]);
        Ok(())
    }

    /// Same as [`Decoder::embedded_json`].
    #[inline]
    pub fn add_embedded_json(&mut self, v: &mut EmbeddedJson) -> Result<()> {
        self.embedded_json(v)
    }
}

impl<'de> Decode<'de> for EmbeddedJson {
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        dec.embedded_json(self)
    }
}

impl Encoder<'_> {
    /// Writes `v` verbatim, even when it is empty.
    pub fn embedded_json(&mut self, v: &EmbeddedJson) {
        self.begin_value();
        self.buf.extend_from_slice(&v.0);
    }

    /// Same as [`Encoder::embedded_json`].
    #[inline]
    pub fn add_embedded_json(&mut self, v: &EmbeddedJson) {
        self.embedded_json(v);
    }

    /// Writes `v` verbatim unless it is empty.
    pub fn embedded_json_omit_empty(&mut self, v: &EmbeddedJson) {
        self.active();
        if !v.is_empty() {
            self.embedded_json(v);
        }
    }

    /// Same as [`Encoder::embedded_json_omit_empty`].
    #[inline]
    pub fn add_embedded_json_omit_empty(&mut self, v: &EmbeddedJson) {
        self.embedded_json_omit_empty(v);
    }

    /// Writes `"key":` followed by `v` verbatim.
    pub fn embedded_json_key(&mut self, key: &str, v: &EmbeddedJson) {
        if self.begin_key(key) {
            self.buf.extend_from_slice(&v.0);
        }
    }

    /// Same as [`Encoder::embedded_json_key`].
    #[inline]
    pub fn add_embedded_json_key(&mut self, key: &str, v: &EmbeddedJson) {
        self.embedded_json_key(key, v);
    }

    /// Keyed variant of [`Encoder::embedded_json_omit_empty`].
    pub fn embedded_json_key_omit_empty(&mut self, key: &str, v: &EmbeddedJson) {
        self.active();
        if !v.is_empty() {
            self.embedded_json_key(key, v);
        }
    }

    /// Same as [`Encoder::embedded_json_key_omit_empty`].
    #[inline]
    pub fn add_embedded_json_key_omit_empty(&mut self, key: &str, v: &EmbeddedJson) {
        self.embedded_json_key_omit_empty(key, v);
    }
}

impl Encode for EmbeddedJson {
    fn encode(&self, enc: &mut Encoder<'_>) {
        enc.embedded_json(self);
    }
}
