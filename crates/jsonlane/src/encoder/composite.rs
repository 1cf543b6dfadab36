//! Writers for nested objects and arrays, `null` and dynamic values.

use super::{Encode, Encoder};
use crate::{
    capability::{EncodeArray, EncodeObject},
    value::Value,
};

impl Encoder<'_> {
    fn put_object<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        if v.is_nil() {
            self.put_null();
            return;
        }
        self.buf.push(b'{');
        self.unfiltered(|enc| v.encode_object(enc));
        self.buf.push(b'}');
    }

    fn put_array<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        if v.is_nil() {
            self.put_null();
            return;
        }
        self.buf.push(b'[');
        self.unfiltered(|enc| v.encode_array(enc));
        self.buf.push(b']');
    }

    /// Writes a nested object; a nil object is written as `null`.
    pub fn object<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        self.begin_value();
        self.put_object(v);
    }

    /// Same as [`Encoder::object`].
    #[inline]
    pub fn add_object<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        self.object(v);
    }

    /// Writes a nested object, or nothing when it is nil.
    pub fn object_omit_empty<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        self.active();
        if !v.is_nil() {
            self.object(v);
        }
    }

    /// Same as [`Encoder::object_omit_empty`].
    #[inline]
    pub fn add_object_omit_empty<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        self.object_omit_empty(v);
    }

    /// Writes a nested object, or `null` when it is nil.
    pub fn object_null_empty<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        self.object(v);
    }

    /// Same as [`Encoder::object_null_empty`].
    #[inline]
    pub fn add_object_null_empty<T: EncodeObject + ?Sized>(&mut self, v: &T) {
        self.object_null_empty(v);
    }

    /// Writes an object member holding a nested object.
    pub fn object_key<T: EncodeObject + ?Sized>(&mut self, key: &str, v: &T) {
        if self.begin_key(key) {
            self.put_object(v);
        }
    }

    /// Same as [`Encoder::object_key`].
    #[inline]
    pub fn add_object_key<T: EncodeObject + ?Sized>(&mut self, key: &str, v: &T) {
        self.object_key(key, v);
    }

    /// Keyed variant of [`Encoder::object_omit_empty`].
    pub fn object_key_omit_empty<T: EncodeObject + ?Sized>(&mut self, key: &str, v: &T) {
        self.active();
        if !v.is_nil() {
            self.object_key(key, v);
        }
    }

    /// Same as [`Encoder::object_key_omit_empty`].
    #[inline]
    pub fn add_object_key_omit_empty<T: EncodeObject + ?Sized>(&mut self, key: &str, v: &T) {
        self.object_key_omit_empty(key, v);
    }

    /// Keyed variant of [`Encoder::object_null_empty`].
    pub fn object_key_null_empty<T: EncodeObject + ?Sized>(&mut self, key: &str, v: &T) {
        self.object_key(key, v);
    }

    /// Same as [`Encoder::object_key_null_empty`].
    #[inline]
    pub fn add_object_key_null_empty<T: EncodeObject + ?Sized>(&mut self, key: &str, v: &T) {
        self.object_key_null_empty(key, v);
    }

    /// Writes a nested array; a nil array is written as `null`.
    pub fn array<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        self.begin_value();
        self.put_array(v);
    }

    /// Same as [`Encoder::array`].
    #[inline]
    pub fn add_array<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        self.array(v);
    }

    /// Writes a nested array, or nothing when it is nil.
    pub fn array_omit_empty<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        self.active();
        if !v.is_nil() {
            self.array(v);
        }
    }

    /// Same as [`Encoder::array_omit_empty`].
    #[inline]
    pub fn add_array_omit_empty<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        self.array_omit_empty(v);
    }

    /// Writes a nested array, or `null` when it is nil.
    pub fn array_null_empty<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        self.array(v);
    }

    /// Same as [`Encoder::array_null_empty`].
    #[inline]
    pub fn add_array_null_empty<T: EncodeArray + ?Sized>(&mut self, v: &T) {
        self.array_null_empty(v);
    }

    /// Writes an object member holding a nested array.
    pub fn array_key<T: EncodeArray + ?Sized>(&mut self, key: &str, v: &T) {
        if self.begin_key(key) {
            self.put_array(v);
        }
    }

    /// Same as [`Encoder::array_key`].
    #[inline]
    pub fn add_array_key<T: EncodeArray + ?Sized>(&mut self, key: &str, v: &T) {
        self.array_key(key, v);
    }

    /// Keyed variant of [`Encoder::array_omit_empty`].
    pub fn array_key_omit_empty<T: EncodeArray + ?Sized>(&mut self, key: &str, v: &T) {
        self.active();
        if !v.is_nil() {
            self.array_key(key, v);
        }
    }

    /// Same as [`Encoder::array_key_omit_empty`].
    #[inline]
    pub fn add_array_key_omit_empty<T: EncodeArray + ?Sized>(&mut self, key: &str, v: &T) {
        self.array_key_omit_empty(key, v);
    }

    /// Keyed variant of [`Encoder::array_null_empty`].
    pub fn array_key_null_empty<T: EncodeArray + ?Sized>(&mut self, key: &str, v: &T) {
        self.array_key(key, v);
    }

    /// Same as [`Encoder::array_key_null_empty`].
    #[inline]
    pub fn add_array_key_null_empty<T: EncodeArray + ?Sized>(&mut self, key: &str, v: &T) {
        self.array_key_null_empty(key, v);
    }

    /// Writes `null`.
    pub fn null(&mut self) {
        self.begin_value();
        self.put_null();
    }

    /// Same as [`Encoder::null`].
    #[inline]
    pub fn add_null(&mut self) {
        self.null();
    }

    /// Writes a member whose value is `null`.
    pub fn null_key(&mut self, key: &str) {
        if self.begin_key(key) {
            self.put_null();
        }
    }

    /// Same as [`Encoder::null_key`].
    #[inline]
    pub fn add_null_key(&mut self, key: &str) {
        self.null_key(key);
    }

    fn put_value(&mut self, v: &Value) {
        match v {
            Value::Null => self.put_null(),
            Value::Boolean(b) => self.put_bool(*b),
            Value::Number(n) => self.put_f64(*n),
            Value::String(s) => super::write_escaped(&mut self.buf, s),
            Value::Array(items) => {
                self.buf.push(b'[');
                self.unfiltered(|enc| items.iter().for_each(|item| enc.value(item)));
                self.buf.push(b']');
            }
            Value::Object(map) => {
                self.buf.push(b'{');
                self.unfiltered(|enc| map.iter().for_each(|(k, item)| enc.value_key(k, item)));
                self.buf.push(b'}');
            }
        }
    }

    /// Writes a dynamic value.
    pub fn value(&mut self, v: &Value) {
        self.begin_value();
        self.put_value(v);
    }

    /// Same as [`Encoder::value`].
    #[inline]
    pub fn add_value(&mut self, v: &Value) {
        self.value(v);
    }

    /// Writes an object member holding a dynamic value.
    pub fn value_key(&mut self, key: &str, v: &Value) {
        if self.begin_key(key) {
            self.put_value(v);
        }
    }

    /// Same as [`Encoder::value_key`].
    #[inline]
    pub fn add_value_key(&mut self, key: &str, v: &Value) {
        self.value_key(key, v);
    }
}

impl Encode for Value {
    fn encode(&self, enc: &mut Encoder<'_>) {
        enc.value(self);
    }
}
