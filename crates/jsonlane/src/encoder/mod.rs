//! The encoder: an append-only JSON buffer with an optional bound writer.
//!
//! Every writer decides on its own whether a `,` is needed by looking at the
//! last byte written: no separator at the very start of the buffer or right
//! after the opening bracket of the current container. Scalar writers come in
//! plain, `omit_empty` and `null_empty` flavours, each bare and keyed, each
//! with an identical `add_` alias.

use std::io::Write;

use crate::{
    capability::{EncodeArray, EncodeObject},
    error::{PoolMisuse, Result},
    pool::EncoderPool,
};

mod composite;
mod escape;
mod scalar;

pub(crate) use escape::write_escaped;

/// JSON encoder writing into an internal buffer.
///
/// # Examples
///
/// ```rust
/// use jsonlane::{EncodeArrayFn, Encoder};
///
/// let mut out = Vec::new();
/// let mut enc = Encoder::new(&mut out);
/// enc.encode_array(&EncodeArrayFn(|enc: &mut Encoder<'_>| {
///     enc.int64(1);
///     enc.string_null_empty("");
///     enc.bool_omit_empty(false);
/// }))
/// .unwrap();
/// drop(enc);
/// assert_eq!(out, b"[1,null]");
/// ```
pub struct Encoder<'w> {
    pub(crate) buf: Vec<u8>,
    writer: Option<Box<dyn Write + Send + 'w>>,
    keys: Option<Vec<String>>,
    pool: Option<EncoderPool>,
    released: bool,
}

impl<'w> Encoder<'w> {
    /// Creates an unpooled encoder flushing to `writer` after each top-level
    /// value.
    pub fn new<W: Write + Send + 'w>(writer: W) -> Self {
        Self::from_parts(Vec::new(), Some(Box::new(writer)), None)
    }

    /// Creates an unpooled encoder that only fills its buffer.
    #[must_use]
    pub fn new_buffer() -> Self {
        Self::from_parts(Vec::new(), None, None)
    }

    pub(crate) fn from_parts(
        mut buf: Vec<u8>,
        writer: Option<Box<dyn Write + Send + 'w>>,
        pool: Option<EncoderPool>,
    ) -> Self {
        buf.clear();
        Self {
            buf,
            writer,
            keys: None,
            pool,
            released: false,
        }
    }

    /// Returns the encoder's buffer to the pool it came from.
    ///
    /// # Panics
    ///
    /// Panics when the encoder was already released.
    pub fn release(&mut self) {
        self.active();
        self.recycle();
    }

    fn recycle(&mut self) {
        self.released = true;
        self.writer = None;
        self.keys = None;
        let buf = std::mem::take(&mut self.buf);
        if let Some(pool) = self.pool.take() {
            pool.put(buf);
        }
    }

    /// Bytes written so far and not yet flushed.
    #[must_use]
    pub fn buf(&self) -> &[u8] {
        self.active();
        &self.buf
    }

    /// Flushes the buffer to the bound writer and returns the number of
    /// bytes written. Without a writer the buffer is kept and `0` returned.
    pub fn write(&mut self) -> Result<usize> {
        self.active();
        let Some(writer) = self.writer.as_mut() else {
            return Ok(0);
        };
        writer.write_all(&self.buf)?;
        let n = self.buf.len();
        self.buf.clear();
        Ok(n)
    }

    /// Encodes one top-level value and flushes it.
    pub fn encode<T: Encode + ?Sized>(&mut self, v: &T) -> Result<()> {
        self.active();
        v.encode(self);
        self.write().map(drop)
    }

    /// Encodes an [`EncodeObject`] as a top-level object and flushes it.
    pub fn encode_object<T: EncodeObject + ?Sized>(&mut self, v: &T) -> Result<()> {
        self.object(v);
        self.write().map(drop)
    }

    /// Like [`Encoder::encode_object`], emitting only members of `v` whose
    /// key is in `keys`. Nested objects are written whole.
    pub fn encode_object_keys<T: EncodeObject + ?Sized>(&mut self, v: &T, keys: &[&str]) -> Result<()> {
        self.begin_value();
        if v.is_nil() {
            self.put_null();
        } else {
            self.buf.push(b'{');
            self.keys = Some(keys.iter().map(|k| (*k).to_owned()).collect());
            v.encode_object(self);
            self.keys = None;
            self.buf.push(b'}');
        }
        self.write().map(drop)
    }

    /// Encodes an [`EncodeArray`] as a top-level array and flushes it.
    pub fn encode_array<T: EncodeArray + ?Sized>(&mut self, v: &T) -> Result<()> {
        self.array(v);
        self.write().map(drop)
    }

    // ------------------------------------------------------------------
    // separators and keys
    // ------------------------------------------------------------------

    #[inline(always)]
    pub(crate) fn active(&self) {
        if self.released {
            PoolMisuse::Encoder.raise();
        }
    }

    #[inline]
    fn separate(&mut self, open: u8) {
        if let Some(&last) = self.buf.last() {
            if last != open {
                self.buf.push(b',');
            }
        }
    }

    /// Prepares a bare value: array element or top-level value.
    #[inline]
    pub(crate) fn begin_value(&mut self) {
        self.active();
        self.separate(b'[');
    }

    /// Runs `f` with the key filter lifted, for the members of a nested
    /// container.
    #[inline]
    pub(crate) fn unfiltered(&mut self, f: impl FnOnce(&mut Self)) {
        let keys = self.keys.take();
        f(self);
        self.keys = keys;
    }

    /// Writes `"key":` unless the key filter excludes `key`.
    #[inline]
    pub(crate) fn begin_key(&mut self, key: &str) -> bool {
        self.active();
        if let Some(keys) = &self.keys {
            if !keys.iter().any(|k| k == key) {
                return false;
            }
        }
        self.separate(b'{');
        write_escaped(&mut self.buf, key);
        self.buf.push(b':');
        true
    }

    /// Appends raw bytes without any separator logic.
    pub fn raw(&mut self, bytes: &[u8]) {
        self.active();
        self.buf.extend_from_slice(bytes);
    }

    /// Appends one raw byte.
    pub fn raw_byte(&mut self, b: u8) {
        self.active();
        self.buf.push(b);
    }

    /// Appends `s` as a quoted, escaped JSON string without a separator.
    pub fn raw_str_quoted(&mut self, s: &str) {
        self.active();
        write_escaped(&mut self.buf, s);
    }
}

impl Drop for Encoder<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.recycle();
        }
    }
}

/// A value the encoder can write as a bare JSON value.
///
/// Implemented for the primitives, strings, [`Value`](crate::Value),
/// [`EmbeddedJson`](crate::EmbeddedJson), `Option<T>` (as `null` when
/// `None`), slices and `Vec`s.
pub trait Encode {
    /// Writes `self` through `enc`.
    fn encode(&self, enc: &mut Encoder<'_>);
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder<'_>) {
        (**self).encode(enc);
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, enc: &mut Encoder<'_>) {
        match self {
            Some(v) => v.encode(enc),
            None => enc.null(),
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, enc: &mut Encoder<'_>) {
        enc.begin_value();
        enc.buf.push(b'[');
        for item in self {
            item.encode(enc);
        }
        enc.buf.push(b']');
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder<'_>) {
        self.as_slice().encode(enc);
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder<'_>) {
        enc.string(self);
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder<'_>) {
        enc.string(self);
    }
}

impl Encode for std::borrow::Cow<'_, str> {
    fn encode(&self, enc: &mut Encoder<'_>) {
        enc.string(self);
    }
}

/// Encodes `v` with an encoder from the global pool.
///
/// ```rust
/// assert_eq!(jsonlane::marshal(&vec![Some(1.5), None]), b"[1.5,null]");
/// ```
#[must_use]
pub fn marshal<T: Encode + ?Sized>(v: &T) -> Vec<u8> {
    with_pooled(|enc| v.encode(enc))
}

/// Encodes an [`EncodeObject`] with an encoder from the global pool.
#[must_use]
pub fn marshal_object<T: EncodeObject + ?Sized>(v: &T) -> Vec<u8> {
    with_pooled(|enc| enc.object(v))
}

/// Encodes an [`EncodeArray`] with an encoder from the global pool.
#[must_use]
pub fn marshal_array<T: EncodeArray + ?Sized>(v: &T) -> Vec<u8> {
    with_pooled(|enc| enc.array(v))
}

fn with_pooled(f: impl FnOnce(&mut Encoder<'_>)) -> Vec<u8> {
    let mut enc = EncoderPool::global().borrow_buffer();
    f(&mut enc);
    let out = enc.buf().to_vec();
    enc.release();
    out
}

/// Borrows an encoder bound to `writer` from the global pool.
pub fn borrow_encoder<'w, W: Write + Send + 'w>(writer: W) -> Encoder<'w> {
    EncoderPool::global().borrow(writer)
}
