/// Configuration for a [`Decoder`](crate::Decoder).
///
/// # Examples
///
/// ```rust
/// use jsonlane::{Decoder, DecoderOptions, Value};
///
/// let options = DecoderOptions {
///     max_depth: 8,
///     ..Default::default()
/// };
/// let mut dec = Decoder::from_slice(b"[[1]]").with_options(options);
/// assert_eq!(dec.decode_value().unwrap(), Value::Array(vec![Value::Array(vec![Value::Number(1.0)])]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Initial size of the read buffer of stream-backed decoders.
    ///
    /// The buffer grows by doubling while a single value is larger than the
    /// bytes read so far. Slice-backed decoders ignore this setting.
    ///
    /// # Default
    ///
    /// `512`
    pub buffer_size: usize,

    /// Maximum container nesting accepted by dynamic decoding and by the
    /// value skipper.
    ///
    /// Input nested deeper than this is rejected with
    /// [`SyntaxError::DepthLimitExceeded`](crate::SyntaxError::DepthLimitExceeded).
    ///
    /// # Default
    ///
    /// `512`
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            buffer_size: 512,
            max_depth: 512,
        }
    }
}

/// Sizing of a [`DecoderPool`](crate::DecoderPool),
/// [`EncoderPool`](crate::EncoderPool) or [`StringPool`](crate::StringPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Number of instances built when the pool is created.
    ///
    /// # Default
    ///
    /// `32`
    pub seed: usize,

    /// Upper bound on idle instances kept for reuse. Instances released into
    /// a full pool are dropped.
    ///
    /// # Default
    ///
    /// `1024`
    pub max_idle: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            seed: 32,
            max_idle: 1024,
        }
    }
}
