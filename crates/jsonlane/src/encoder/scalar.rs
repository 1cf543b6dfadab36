//! Scalar writers. Each type gets six writers (bare or keyed, times plain,
//! `omit_empty` and `null_empty`) plus an `add_` alias for every one.
#![allow(clippy::float_cmp)]

use std::io::Write as _;

use super::{Encode, Encoder, write_escaped};

impl Encoder<'_> {
    #[inline]
    fn put_integer<I: itoa::Integer>(&mut self, v: I) {
        let mut digits = itoa::Buffer::new();
        self.buf.extend_from_slice(digits.format(v).as_bytes());
    }

    #[inline]
    pub(super) fn put_f64(&mut self, v: f64) {
        if v.is_finite() {
            let _ = write!(self.buf, "{v}");
        } else {
            self.put_null();
        }
    }

    #[inline]
    fn put_f32(&mut self, v: f32) {
        if v.is_finite() {
            let _ = write!(self.buf, "{v}");
        } else {
            self.put_null();
        }
    }

    #[inline]
    pub(super) fn put_bool(&mut self, v: bool) {
        let text: &[u8] = if v { b"true" } else { b"false" };
        self.buf.extend_from_slice(text);
    }

    #[inline]
    fn put_str(&mut self, v: &str) {
        write_escaped(&mut self.buf, v);
    }

    #[inline]
    pub(crate) fn put_null(&mut self) {
        self.buf.extend_from_slice(b"null");
    }
}

macro_rules! scalar_writers {
    ($($name:ident: $ty:ty, |$v:ident| $zero:expr, $put:ident;)*) => { paste::paste! {
        impl Encoder<'_> {
            $(
                #[doc = concat!("Writes a `", stringify!($ty), "` as an array element or top-level value.")]
                pub fn $name(&mut self, $v: $ty) {
                    self.begin_value();
                    self.$put($v);
                }

                #[doc = concat!("Same as [`Encoder::", stringify!($name), "`].")]
                #[inline]
                pub fn [<add_ $name>](&mut self, $v: $ty) {
                    self.$name($v);
                }

                #[doc = concat!("Like [`Encoder::", stringify!($name), "`], writing nothing for the zero value.")]
                pub fn [<$name _omit_empty>](&mut self, $v: $ty) {
                    self.active();
                    if !($zero) {
                        self.$name($v);
                    }
                }

                #[doc = concat!("Same as [`Encoder::", stringify!($name), "_omit_empty`].")]
                #[inline]
                pub fn [<add_ $name _omit_empty>](&mut self, $v: $ty) {
                    self.[<$name _omit_empty>]($v);
                }

                #[doc = concat!("Like [`Encoder::", stringify!($name), "`], writing `null` for the zero value.")]
                pub fn [<$name _null_empty>](&mut self, $v: $ty) {
                    self.begin_value();
                    if $zero {
                        self.put_null();
                    } else {
                        self.$put($v);
                    }
                }

                #[doc = concat!("Same as [`Encoder::", stringify!($name), "_null_empty`].")]
                #[inline]
                pub fn [<add_ $name _null_empty>](&mut self, $v: $ty) {
                    self.[<$name _null_empty>]($v);
                }

                #[doc = concat!("Writes a `", stringify!($ty), "` object member.")]
                pub fn [<$name _key>](&mut self, key: &str, $v: $ty) {
                    if self.begin_key(key) {
                        self.$put($v);
                    }
                }

                #[doc = concat!("Same as [`Encoder::", stringify!($name), "_key`].")]
                #[inline]
                pub fn [<add_ $name _key>](&mut self, key: &str, $v: $ty) {
                    self.[<$name _key>](key, $v);
                }

                #[doc = concat!("Writes a `", stringify!($ty), "` member, omitting it for the zero value.")]
                pub fn [<$name _key_omit_empty>](&mut self, key: &str, $v: $ty) {
                    self.active();
                    if !($zero) {
                        self.[<$name _key>](key, $v);
                    }
                }

                #[doc = concat!("Same as [`Encoder::", stringify!($name), "_key_omit_empty`].")]
                #[inline]
                pub fn [<add_ $name _key_omit_empty>](&mut self, key: &str, $v: $ty) {
                    self.[<$name _key_omit_empty>](key, $v);
                }

                #[doc = concat!("Writes a `", stringify!($ty), "` member, as `null` for the zero value.")]
                pub fn [<$name _key_null_empty>](&mut self, key: &str, $v: $ty) {
                    if self.begin_key(key) {
                        if $zero {
                            self.put_null();
                        } else {
                            self.$put($v);
                        }
                    }
                }

                #[doc = concat!("Same as [`Encoder::", stringify!($name), "_key_null_empty`].")]
                #[inline]
                pub fn [<add_ $name _key_null_empty>](&mut self, key: &str, $v: $ty) {
                    self.[<$name _key_null_empty>](key, $v);
                }
            )*
        }
    }};
}

scalar_writers! {
    int8: i8, |v| v == 0, put_integer;
    int16: i16, |v| v == 0, put_integer;
    int32: i32, |v| v == 0, put_integer;
    int64: i64, |v| v == 0, put_integer;
    uint8: u8, |v| v == 0, put_integer;
    uint16: u16, |v| v == 0, put_integer;
    uint32: u32, |v| v == 0, put_integer;
    uint64: u64, |v| v == 0, put_integer;
    float32: f32, |v| v == 0.0, put_f32;
    float64: f64, |v| v == 0.0, put_f64;
    bool: bool, |v| !v, put_bool;
    string: &str, |v| v.is_empty(), put_str;
}

macro_rules! encode_by_value {
    ($($ty:ty => $name:ident),*) => {$(
        impl Encode for $ty {
            fn encode(&self, enc: &mut Encoder<'_>) {
                enc.$name(*self);
            }
        }
    )*};
}

encode_by_value!(
    i8 => int8, i16 => int16, i32 => int32, i64 => int64,
    u8 => uint8, u16 => uint16, u32 => uint32, u64 => uint64,
    f32 => float32, f64 => float64, bool => bool
);
