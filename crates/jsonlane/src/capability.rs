//! Capability traits a type implements to read or write its own fields.
//!
//! ```rust
//! use jsonlane::{DecodeObject, Decoder, EncodeObject, Encoder, Result};
//!
//! #[derive(Default)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl<'de> DecodeObject<'de> for User {
//!     fn decode_key(&mut self, dec: &mut Decoder<'de>, key: &str) -> Result<()> {
//!         match key {
//!             "id" => dec.int64(&mut self.id),
//!             "name" => dec.string(&mut self.name),
//!             _ => Ok(()),
//!         }
//!     }
//!
//!     fn key_count(&self) -> usize {
//!         2
//!     }
//! }
//!
//! impl EncodeObject for User {
//!     fn encode_object(&self, enc: &mut Encoder<'_>) {
//!         enc.int64_key("id", self.id);
//!         enc.string_key("name", &self.name);
//!     }
//! }
//!
//! let mut user = User::default();
//! jsonlane::unmarshal_object(br#"{"id":1,"name":"ada","extra":[1,2]}"#, &mut user).unwrap();
//! assert_eq!(jsonlane::marshal_object(&user), br#"{"id":1,"name":"ada"}"#);
//! ```

use crate::{decoder::Decoder, encoder::Encoder, error::Result};

/// A type that decodes itself from a JSON object, one key at a time.
pub trait DecodeObject<'de> {
    /// Called once per key. Decode the value with one of `dec`'s methods, or
    /// return `Ok(())` without touching `dec` to have the value skipped.
    fn decode_key(&mut self, dec: &mut Decoder<'de>, key: &str) -> Result<()>;

    /// Number of keys the type expects. A sizing hint only; never checked.
    fn key_count(&self) -> usize {
        0
    }
}

/// A type that decodes itself from a JSON array, one element at a time.
pub trait DecodeArray<'de> {
    /// Called once per element. Leaving `dec` untouched skips the element.
    fn decode_element(&mut self, dec: &mut Decoder<'de>) -> Result<()>;
}

/// A type that writes its fields as a JSON object.
pub trait EncodeObject {
    /// Writes the members with the encoder's keyed writers.
    fn encode_object(&self, enc: &mut Encoder<'_>);

    /// A nil value is written as `null`.
    fn is_nil(&self) -> bool {
        false
    }
}

/// A type that writes its elements as a JSON array.
pub trait EncodeArray {
    /// Writes the elements with the encoder's bare writers.
    fn encode_array(&self, enc: &mut Encoder<'_>);

    /// A nil value is written as `null`.
    fn is_nil(&self) -> bool {
        false
    }
}

/// Adapts a closure into a [`DecodeObject`].
pub struct DecodeObjectFn<F>(pub F);

impl<'de, F> DecodeObject<'de> for DecodeObjectFn<F>
where
    F: FnMut(&mut Decoder<'de>, &str) -> Result<()>,
{
    fn decode_key(&mut self, dec: &mut Decoder<'de>, key: &str) -> Result<()> {
        (self.0)(dec, key)
    }
}

/// Adapts a closure into a [`DecodeArray`].
pub struct DecodeArrayFn<F>(pub F);

impl<'de, F> DecodeArray<'de> for DecodeArrayFn<F>
where
    F: FnMut(&mut Decoder<'de>) -> Result<()>,
{
    fn decode_element(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        (self.0)(dec)
    }
}

/// Adapts a closure into an [`EncodeObject`].
pub struct EncodeObjectFn<F>(pub F);

impl<F: Fn(&mut Encoder<'_>)> EncodeObject for EncodeObjectFn<F> {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        (self.0)(enc);
    }
}

/// Adapts a closure into an [`EncodeArray`].
pub struct EncodeArrayFn<F>(pub F);

impl<F: Fn(&mut Encoder<'_>)> EncodeArray for EncodeArrayFn<F> {
    fn encode_array(&self, enc: &mut Encoder<'_>) {
        (self.0)(enc);
    }
}

impl<T: EncodeObject + ?Sized> EncodeObject for &T {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        (**self).encode_object(enc);
    }

    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: EncodeObject> EncodeObject for Option<T> {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        if let Some(v) = self {
            v.encode_object(enc);
        }
    }

    fn is_nil(&self) -> bool {
        self.as_ref().is_none_or(EncodeObject::is_nil)
    }
}

impl<T: EncodeArray> EncodeArray for Option<T> {
    fn encode_array(&self, enc: &mut Encoder<'_>) {
        if let Some(v) = self {
            v.encode_array(enc);
        }
    }

    fn is_nil(&self) -> bool {
        self.as_ref().is_none_or(EncodeArray::is_nil)
    }
}
