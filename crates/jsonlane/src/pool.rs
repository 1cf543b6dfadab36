//! Reusable decoders, encoders and scratch strings.
//!
//! A pool keeps idle buffers behind a mutex. Borrowing wraps pooled buffers
//! into a fresh [`Decoder`] or [`Encoder`]; releasing (or dropping) it hands
//! the buffers back. Pools are cheap to clone and every clone shares the same
//! idle list.

use std::{
    io::{Read, Write},
    sync::{Arc, OnceLock},
};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::{
    cursor::Cursor,
    decoder::Decoder,
    encoder::Encoder,
    options::{DecoderOptions, PoolOptions},
};

/// Something a [`Pool`] can hold.
trait Poolable: Default + Send {
    const KIND: &'static str;

    /// Clears contents while keeping capacity.
    fn reset(&mut self);
}

struct Pool<T> {
    idle: Mutex<Vec<T>>,
    options: PoolOptions,
}

impl<T: Poolable> Pool<T> {
    fn new(options: PoolOptions) -> Self {
        let seed = options.seed.min(options.max_idle);
        debug!("seeding {} pool with {seed} instances", T::KIND);
        Self {
            idle: Mutex::new((0..seed).map(|_| T::default()).collect()),
            options,
        }
    }

    fn take(&self) -> T {
        if let Some(item) = self.idle.lock().pop() {
            trace!("reusing pooled {}", T::KIND);
            return item;
        }
        debug!("{} pool empty, allocating", T::KIND);
        T::default()
    }

    fn put(&self, mut item: T) {
        item.reset();
        let mut idle = self.idle.lock();
        if idle.len() < self.options.max_idle {
            trace!("returning {} to pool", T::KIND);
            idle.push(item);
        } else {
            trace!("{} pool full, dropping instance", T::KIND);
        }
    }

    fn idle(&self) -> usize {
        self.idle.lock().len()
    }
}

/// Buffers owned by a pooled decoder.
#[derive(Default)]
pub(crate) struct DecoderBuffers {
    pub(crate) data: Vec<u8>,
    pub(crate) scratch: Vec<u8>,
    pub(crate) key: String,
}

impl Poolable for DecoderBuffers {
    const KIND: &'static str = "decoder";

    fn reset(&mut self) {
        self.data.clear();
        self.scratch.clear();
        self.key.clear();
    }
}

impl Poolable for Vec<u8> {
    const KIND: &'static str = "encoder";

    fn reset(&mut self) {
        self.clear();
    }
}

impl Poolable for String {
    const KIND: &'static str = "string";

    fn reset(&mut self) {
        self.clear();
    }
}

/// Pool of decoders sharing one set of [`DecoderOptions`].
///
/// ```rust
/// use jsonlane::{DecoderPool, PoolOptions};
///
/// let pool = DecoderPool::new(PoolOptions { seed: 1, max_idle: 4 });
/// let mut dec = pool.borrow(&b"[1,2]"[..]);
/// let mut v: Vec<u8> = Vec::new();
/// dec.decode(&mut v).unwrap();
/// dec.release();
/// assert_eq!(v, [1, 2]);
/// assert_eq!(pool.idle(), 1);
/// ```
#[derive(Clone)]
pub struct DecoderPool {
    inner: Arc<Pool<DecoderBuffers>>,
    decoder: DecoderOptions,
}

impl DecoderPool {
    /// Creates a pool handing out decoders with default options.
    #[must_use]
    pub fn new(options: PoolOptions) -> Self {
        Self::with_decoder_options(options, DecoderOptions::default())
    }

    /// Creates a pool whose decoders use `decoder` options.
    #[must_use]
    pub fn with_decoder_options(options: PoolOptions, decoder: DecoderOptions) -> Self {
        Self {
            inner: Arc::new(Pool::new(options)),
            decoder,
        }
    }

    /// The process-wide pool used by [`unmarshal`](crate::unmarshal) and
    /// [`borrow_decoder`](crate::borrow_decoder).
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<DecoderPool> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::new(PoolOptions::default()))
    }

    /// Borrows a decoder reading from `reader`.
    pub fn borrow<'de, R: Read + Send + 'de>(&self, reader: R) -> Decoder<'de> {
        let mut buffers = self.inner.take();
        let data = std::mem::take(&mut buffers.data);
        let cursor = Cursor::from_reader(Box::new(reader), data, self.decoder.buffer_size);
        Decoder::from_parts(cursor, buffers, self.decoder, Some(self.clone()))
    }

    /// Borrows a decoder reading `bytes` in place.
    #[must_use]
    pub fn borrow_slice<'de>(&self, bytes: &'de [u8]) -> Decoder<'de> {
        let mut buffers = self.inner.take();
        let data = std::mem::take(&mut buffers.data);
        Decoder::from_parts(Cursor::from_slice(bytes, data), buffers, self.decoder, Some(self.clone()))
    }

    pub(crate) fn put(&self, buffers: DecoderBuffers) {
        self.inner.put(buffers);
    }

    /// Number of idle decoders.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.inner.idle()
    }
}

/// Pool of encoder buffers.
#[derive(Clone)]
pub struct EncoderPool {
    inner: Arc<Pool<Vec<u8>>>,
}

impl EncoderPool {
    /// Creates an empty pool seeded per `options`.
    #[must_use]
    pub fn new(options: PoolOptions) -> Self {
        Self {
            inner: Arc::new(Pool::new(options)),
        }
    }

    /// The process-wide pool used by [`marshal`](crate::marshal) and
    /// [`borrow_encoder`](crate::borrow_encoder).
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<EncoderPool> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::new(PoolOptions::default()))
    }

    /// Borrows an encoder flushing into `writer`.
    pub fn borrow<'w, W: Write + Send + 'w>(&self, writer: W) -> Encoder<'w> {
        Encoder::from_parts(self.inner.take(), Some(Box::new(writer)), Some(self.clone()))
    }

    /// Borrows an encoder with no writer; read the output with
    /// [`Encoder::buf`].
    #[must_use]
    pub fn borrow_buffer(&self) -> Encoder<'static> {
        Encoder::from_parts(self.inner.take(), None, Some(self.clone()))
    }

    pub(crate) fn put(&self, buf: Vec<u8>) {
        self.inner.put(buf);
    }

    /// Number of idle encoders.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.inner.idle()
    }
}

/// Pool of scratch `String`s used while decoding string arrays.
#[derive(Clone)]
pub struct StringPool {
    inner: Arc<Pool<String>>,
}

impl StringPool {
    /// Creates an empty pool seeded per `options`.
    #[must_use]
    pub fn new(options: PoolOptions) -> Self {
        Self {
            inner: Arc::new(Pool::new(options)),
        }
    }

    /// The process-wide string pool.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<StringPool> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::new(PoolOptions::default()))
    }

    /// Takes an empty string.
    #[must_use]
    pub fn acquire(&self) -> String {
        self.inner.take()
    }

    /// Returns a string; its contents are discarded.
    pub fn release(&self, s: String) {
        self.inner.put(s);
    }

    /// Number of idle strings.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.inner.idle()
    }
}
