//! A pooled JSON encoder and decoder driven by explicit callbacks.
//!
//! Types read and write their own fields through the capability traits
//! ([`DecodeObject`], [`DecodeArray`], [`EncodeObject`], [`EncodeArray`]);
//! there is no reflection. Decoders and encoders can be borrowed from
//! concurrent pools and handed back with `release`. Values of unknown shape
//! decode into the dynamic [`Value`] tree, and [`EmbeddedJson`] carries a
//! verbatim sub-document through both directions.
//!
//! ```rust
//! use jsonlane::{Decoder, Value};
//!
//! let mut dec = Decoder::from_slice(br#"{"a": [1, "two", null]}"#);
//! let v = dec.decode_value().unwrap();
//! assert_eq!(v.to_string(), r#"{"a":[1,"two",null]}"#);
//! # assert!(matches!(v, Value::Object(_)));
//! ```

mod capability;
mod cursor;
mod decoder;
mod embedded;
mod encoder;
mod error;
mod escape_buffer;
mod literal_buffer;
mod options;
mod pool;
pub mod time;
mod value;

#[cfg(test)]
mod tests;

pub use capability::{
    DecodeArray, DecodeArrayFn, DecodeObject, DecodeObjectFn, EncodeArray, EncodeArrayFn, EncodeObject, EncodeObjectFn,
};
pub use decoder::{Decode, Decoder, borrow_decoder, unmarshal, unmarshal_array, unmarshal_object};
pub use embedded::EmbeddedJson;
pub use encoder::{Encode, Encoder, borrow_encoder, marshal, marshal_array, marshal_object};
pub use error::{Error, PoolMisuse, Result, SyntaxError, UnmarshalError};
pub use options::{DecoderOptions, PoolOptions};
pub use pool::{DecoderPool, EncoderPool, StringPool};
pub use value::{Array, Map, Value};
