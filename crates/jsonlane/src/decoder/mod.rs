//! The decoder: typed entry points, lifecycle and the generic [`Decode`]
//! trait.
//!
//! A [`Decoder`] reads one or more JSON values from a byte slice or a
//! blocking reader. Every destination type has a direct method (`int64`,
//! `string`, `object`, ...), an identical `add_` alias and a `_null` variant
//! writing into an `Option`. Beginning a value at the very end of input is a
//! no-op for typed destinations; a value that starts but does not finish is
//! an [`Error::InvalidJson`].

use std::{borrow::Cow, io::Read, mem};

use bstr::ByteSlice;

use crate::{
    capability::{DecodeArray, DecodeObject},
    cursor::{Cursor, is_delimiter},
    error::{Error, PoolMisuse, Result, SyntaxError, UnmarshalError},
    literal_buffer::{ExpectedLiteralBuffer, Literal, Step},
    options::DecoderOptions,
    pool::{DecoderBuffers, DecoderPool},
};

mod dynamic;
mod number;
mod object;
mod skip;
mod slice;
mod string;

/// Streaming JSON decoder bound to one input.
///
/// # Examples
///
/// ```rust
/// use jsonlane::Decoder;
///
/// let mut dec = Decoder::from_slice(b"42 \"two\"");
/// let mut n = 0u8;
/// let mut s = String::new();
/// dec.uint8(&mut n).unwrap();
/// dec.string(&mut s).unwrap();
/// assert_eq!((n, s.as_str()), (42, "two"));
/// ```
pub struct Decoder<'de> {
    pub(crate) cursor: Cursor<'de>,
    scratch: Vec<u8>,
    key: String,
    keys_done: usize,
    key_hint: usize,
    depth: usize,
    options: DecoderOptions,
    pool: Option<DecoderPool>,
    released: bool,
}

/// What sits at the start of the next value.
pub(crate) enum Lead {
    /// The input ended before any value began.
    End,
    /// A `null` literal, already consumed.
    Null,
    /// First byte of any other value, not consumed.
    Byte(u8),
}

/// Outcome of reading a scalar for a destination.
pub(crate) enum Slot<T> {
    Absent,
    Null,
    Value(T),
}

impl<T: Default> Slot<T> {
    pub(crate) fn store(self, dst: &mut T) {
        match self {
            Slot::Absent => {}
            Slot::Null => *dst = T::default(),
            Slot::Value(v) => *dst = v,
        }
    }

    pub(crate) fn store_option(self, dst: &mut Option<T>) {
        match self {
            Slot::Absent => {}
            Slot::Null => *dst = None,
            Slot::Value(v) => *dst = Some(v),
        }
    }
}

impl<'de> Decoder<'de> {
    /// Creates an unpooled decoder reading the caller's bytes in place.
    #[must_use]
    pub fn from_slice(bytes: &'de [u8]) -> Self {
        Self::from_parts(
            Cursor::from_slice(bytes, Vec::new()),
            DecoderBuffers::default(),
            DecoderOptions::default(),
            None,
        )
    }

    /// Creates an unpooled decoder pulling bytes from `reader` on demand.
    pub fn new<R: Read + Send + 'de>(reader: R) -> Self {
        Self::with_reader_options(reader, DecoderOptions::default())
    }

    /// Creates an unpooled, stream-backed decoder with explicit options.
    pub fn with_reader_options<R: Read + Send + 'de>(reader: R, options: DecoderOptions) -> Self {
        Self::from_parts(
            Cursor::from_reader(Box::new(reader), Vec::new(), options.buffer_size),
            DecoderBuffers::default(),
            options,
            None,
        )
    }

    /// Replaces the options. The buffer size of an existing stream buffer is
    /// left as it is.
    #[must_use]
    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn from_parts(
        cursor: Cursor<'de>,
        buffers: DecoderBuffers,
        options: DecoderOptions,
        pool: Option<DecoderPool>,
    ) -> Self {
        Self {
            cursor,
            scratch: buffers.scratch,
            key: buffers.key,
            keys_done: 0,
            key_hint: 0,
            depth: 0,
            options,
            pool,
            released: false,
        }
    }

    /// Returns the decoder's buffers to the pool it came from.
    ///
    /// Any later call on this decoder panics.
    ///
    /// # Panics
    ///
    /// Panics when the decoder was already released.
    pub fn release(&mut self) {
        self.active();
        self.recycle();
    }

    fn recycle(&mut self) {
        self.released = true;
        let buffers = DecoderBuffers {
            data: self.cursor.detach(),
            scratch: mem::take(&mut self.scratch),
            key: mem::take(&mut self.key),
        };
        self.keys_done = 0;
        self.key_hint = 0;
        self.depth = 0;
        if let Some(pool) = self.pool.take() {
            pool.put(buffers);
        }
    }

    /// Number of keys consumed by the callback of the innermost object
    /// being decoded, or of the last top-level object.
    #[must_use]
    pub fn keys_done(&self) -> usize {
        self.keys_done
    }

    /// Keys still expected by the current object according to its
    /// [`DecodeObject::key_count`] hint. Useful to pre-size storage.
    #[must_use]
    pub fn remaining_keys_hint(&self) -> usize {
        self.key_hint.saturating_sub(self.keys_done)
    }

    /// Decodes the next value into any [`Decode`] destination.
    pub fn decode<T: Decode<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.start();
        v.decode(self)
    }

    /// Decodes the next value through a [`DecodeObject`] capability.
    pub fn decode_object<T: DecodeObject<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.object(v)
    }

    /// Decodes the next value through a [`DecodeArray`] capability.
    pub fn decode_array<T: DecodeArray<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.array(v)
    }

    /// Skips the next value after checking it is well formed.
    pub fn skip(&mut self) -> Result<()> {
        self.start();
        self.skip_value()
    }

    // ------------------------------------------------------------------
    // internals shared by the lexers
    // ------------------------------------------------------------------

    #[inline(always)]
    fn active(&self) {
        if self.released {
            PoolMisuse::Decoder.raise();
        }
    }

    /// Entry bookkeeping for every public operation.
    #[inline]
    pub(crate) fn start(&mut self) {
        self.active();
        if self.depth == 0 {
            self.cursor.compact();
        }
    }

    pub(crate) fn syntax(&self, source: SyntaxError) -> Error {
        Error::InvalidJson {
            source,
            offset: self.cursor.pos(),
        }
    }

    /// Error for running out of input inside a value.
    pub(crate) fn eof(&mut self) -> Error {
        match self.cursor.take_error() {
            Some(io) => Error::Io(io),
            None => self.syntax(SyntaxError::UnexpectedEndOfInput),
        }
    }

    /// Error for a byte the grammar does not allow here.
    pub(crate) fn unexpected(&mut self, found: Option<u8>) -> Error {
        if found.is_none() {
            return self.eof();
        }
        let ch = self.cursor.data()[self.cursor.pos()..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.syntax(SyntaxError::InvalidCharacter(ch))
    }

    pub(crate) fn expect_byte(&mut self, want: u8) -> Result<()> {
        match self.cursor.skip_whitespace() {
            Some(b) if b == want => {
                self.cursor.advance();
                Ok(())
            }
            other => Err(self.unexpected(other)),
        }
    }

    /// Matches `lit` starting at its first byte and checks what follows.
    pub(crate) fn literal(&mut self, lit: Literal) -> Result<Literal> {
        self.cursor.advance();
        let mut matcher = ExpectedLiteralBuffer::new(lit);
        loop {
            let Some(b) = self.cursor.peek() else {
                return Err(self.eof());
            };
            match matcher.step(b) {
                Step::NeedMore => self.cursor.advance(),
                Step::Done(found) => {
                    self.cursor.advance();
                    return match self.cursor.peek() {
                        Some(b) if !is_delimiter(b) => Err(self.unexpected(Some(b))),
                        _ => Ok(found),
                    };
                }
                Step::Reject => return Err(self.unexpected(Some(b))),
            }
        }
    }

    pub(crate) fn lead(&mut self) -> Result<Lead> {
        match self.cursor.skip_whitespace() {
            None => match self.cursor.take_error() {
                Some(io) => Err(io.into()),
                None => Ok(Lead::End),
            },
            Some(b'n') => {
                self.literal(Literal::Null)?;
                Ok(Lead::Null)
            }
            Some(b) => Ok(Lead::Byte(b)),
        }
    }

    /// Skips a value of the wrong kind and reports the mismatch.
    pub(crate) fn mismatch(&mut self, first: u8, target: &'static str) -> Error {
        let found = match first {
            b'"' => "string",
            b'{' => "object",
            b'[' => "array",
            b'-' | b'0'..=b'9' => "number",
            b => match Literal::from_first(b) {
                Some(lit) => lit.kind(),
                None => return self.unexpected(Some(b)),
            },
        };
        match self.skip_value() {
            Ok(()) => UnmarshalError::Mismatch { found, target }.into(),
            Err(e) => e,
        }
    }

    /// Runs `f` one container level deeper.
    pub(crate) fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.depth >= self.options.max_depth {
            return Err(self.syntax(SyntaxError::DepthLimitExceeded(self.options.max_depth)));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Runs `f` with the reusable byte scratch buffer.
    pub(crate) fn with_scratch<R>(&mut self, f: impl FnOnce(&mut Self, &mut Vec<u8>) -> Result<R>) -> Result<R> {
        let mut scratch = mem::take(&mut self.scratch);
        scratch.clear();
        let result = f(self, &mut scratch);
        self.scratch = scratch;
        result
    }

    fn read_bool(&mut self) -> Result<Slot<bool>> {
        match self.lead()? {
            Lead::End => Ok(Slot::Absent),
            Lead::Null => Ok(Slot::Null),
            Lead::Byte(b @ (b't' | b'f')) => {
                let lit = self.literal(if b == b't' { Literal::True } else { Literal::False })?;
                Ok(Slot::Value(lit == Literal::True))
            }
            Lead::Byte(b) => Err(self.mismatch(b, "bool")),
        }
    }
}

impl Drop for Decoder<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.recycle();
        }
    }
}

macro_rules! scalar_methods {
    ($($ty:ty => $read:expr, $name:ident, $add:ident, $null:ident, $add_null:ident;)*) => {
        impl<'de> Decoder<'de> {
            $(
                #[doc = concat!("Decodes the next value into an `", stringify!($ty), "`.")]
                ///
                /// `null` stores the zero value.
                pub fn $name(&mut self, v: &mut $ty) -> Result<()> {
                    self.start();
                    let read: fn(&mut Self) -> Result<Slot<$ty>> = $read;
                    read(self)?.store(v);
                    Ok(())
                }

                #[doc = concat!("Same as [`Decoder::", stringify!($name), "`].")]
                #[inline]
                pub fn $add(&mut self, v: &mut $ty) -> Result<()> {
                    self.$name(v)
                }

                #[doc = concat!("Decodes the next value into an `Option<", stringify!($ty), ">`; `null` stores `None`.")]
                pub fn $null(&mut self, v: &mut Option<$ty>) -> Result<()> {
                    self.start();
                    let read: fn(&mut Self) -> Result<Slot<$ty>> = $read;
                    read(self)?.store_option(v);
                    Ok(())
                }

                #[doc = concat!("Same as [`Decoder::", stringify!($null), "`].")]
                #[inline]
                pub fn $add_null(&mut self, v: &mut Option<$ty>) -> Result<()> {
                    self.$null(v)
                }
            )*
        }

        $(
            impl<'de> Decode<'de> for $ty {
                fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
                    dec.$name(self)
                }
            }
        )*
    };
}

scalar_methods! {
    i8 => Self::read_integer::<i8>, int8, add_int8, int8_null, add_int8_null;
    i16 => Self::read_integer::<i16>, int16, add_int16, int16_null, add_int16_null;
    i32 => Self::read_integer::<i32>, int32, add_int32, int32_null, add_int32_null;
    i64 => Self::read_integer::<i64>, int64, add_int64, int64_null, add_int64_null;
    u8 => Self::read_integer::<u8>, uint8, add_uint8, uint8_null, add_uint8_null;
    u16 => Self::read_integer::<u16>, uint16, add_uint16, uint16_null, add_uint16_null;
    u32 => Self::read_integer::<u32>, uint32, add_uint32, uint32_null, add_uint32_null;
    u64 => Self::read_integer::<u64>, uint64, add_uint64, uint64_null, add_uint64_null;
    f32 => Self::read_float::<f32>, float32, add_float32, float32_null, add_float32_null;
    f64 => Self::read_float::<f64>, float64, add_float64, float64_null, add_float64_null;
    bool => Self::read_bool, bool, add_bool, bool_null, add_bool_null;
}

/// A destination the decoder can fill directly.
///
/// Implemented for the primitive types, `String`, [`Value`](crate::Value),
/// [`EmbeddedJson`](crate::EmbeddedJson), `Option<T>` and `Vec<T>`. Types
/// with fields implement [`DecodeObject`] or [`DecodeArray`] instead and go
/// through [`unmarshal_object`] / [`unmarshal_array`].
pub trait Decode<'de> {
    /// Reads the next value from `dec` into `self`.
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()>;
}

impl<'de> Decode<'de> for String {
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        dec.string(self)
    }
}

impl<'de> Decode<'de> for Cow<'de, str> {
    /// Borrows from the input when possible; `null` leaves `self` unchanged.
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        if let Some(s) = dec.string_borrowed()? {
            *self = s;
        }
        Ok(())
    }
}

impl<'de, T: Decode<'de> + Default> Decode<'de> for Option<T> {
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        dec.start();
        match dec.lead()? {
            Lead::End => Ok(()),
            Lead::Null => {
                *self = None;
                Ok(())
            }
            Lead::Byte(_) => self.get_or_insert_with(T::default).decode(dec),
        }
    }
}

impl<'de, T: Decode<'de> + Default> Decode<'de> for Vec<T> {
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        dec.slice_of(self)
    }
}

/// Decodes `data` into `v` using a decoder from the global pool.
///
/// ```rust
/// let mut ids: Vec<i64> = Vec::new();
/// jsonlane::unmarshal(b"[1, 2, 3]", &mut ids).unwrap();
/// assert_eq!(ids, [1, 2, 3]);
/// ```
pub fn unmarshal<'de, T: Decode<'de> + ?Sized>(data: &'de [u8], v: &mut T) -> Result<()> {
    let mut dec = DecoderPool::global().borrow_slice(data);
    let result = dec.decode(v);
    dec.release();
    result
}

/// Decodes a JSON object in `data` through `v`'s [`DecodeObject`] capability.
pub fn unmarshal_object<'de, T: DecodeObject<'de> + ?Sized>(data: &'de [u8], v: &mut T) -> Result<()> {
    let mut dec = DecoderPool::global().borrow_slice(data);
    let result = dec.object(v);
    dec.release();
    result
}

/// Decodes a JSON array in `data` through `v`'s [`DecodeArray`] capability.
pub fn unmarshal_array<'de, T: DecodeArray<'de> + ?Sized>(data: &'de [u8], v: &mut T) -> Result<()> {
    let mut dec = DecoderPool::global().borrow_slice(data);
    let result = dec.array(v);
    dec.release();
    result
}

/// Borrows a stream-backed decoder from the global pool.
pub fn borrow_decoder<'de, R: Read + Send + 'de>(reader: R) -> Decoder<'de> {
    DecoderPool::global().borrow(reader)
}
