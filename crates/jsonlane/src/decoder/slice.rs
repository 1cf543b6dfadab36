//! Helpers appending the elements of a JSON array to a `Vec`.

use super::{Decode, Decoder};
use crate::{capability::DecodeArrayFn, error::Result, pool::StringPool};

impl<'de> Decoder<'de> {
    pub(crate) fn slice_of<T: Decode<'de> + Default>(&mut self, v: &mut Vec<T>) -> Result<()> {
        self.array(&mut DecodeArrayFn(|dec: &mut Decoder<'de>| {
            let mut item = T::default();
            item.decode(dec)?;
            v.push(item);
            Ok(())
        }))
    }

    fn slice_of_strings(&mut self, v: &mut Vec<String>, unescape: bool) -> Result<()> {
        let pool = StringPool::global();
        let mut scratch = pool.acquire();
        let result = self.array(&mut DecodeArrayFn(|dec: &mut Decoder<'de>| {
            if unescape {
                dec.string(&mut scratch)?;
            } else {
                dec.string_no_escape(&mut scratch)?;
            }
            v.push(scratch.clone());
            Ok(())
        }));
        pool.release(scratch);
        result
    }

    /// Appends the strings of a JSON array to `v`.
    pub fn slice_string(&mut self, v: &mut Vec<String>) -> Result<()> {
        self.slice_of_strings(v, true)
    }

    /// Same as [`Decoder::slice_string`].
    #[inline]
    pub fn add_slice_string(&mut self, v: &mut Vec<String>) -> Result<()> {
        self.slice_string(v)
    }

    /// Appends the strings of a JSON array to `v`, keeping escapes verbatim.
    pub fn slice_string_no_escape(&mut self, v: &mut Vec<String>) -> Result<()> {
        self.slice_of_strings(v, false)
    }

    /// Same as [`Decoder::slice_string_no_escape`].
    #[inline]
    pub fn add_slice_string_no_escape(&mut self, v: &mut Vec<String>) -> Result<()> {
        self.slice_string_no_escape(v)
    }
}

macro_rules! slice_methods {
    ($($ty:ty => $name:ident, $add:ident;)*) => {
        impl<'de> Decoder<'de> {
            $(
                #[doc = concat!("Appends the elements of a JSON array of `", stringify!($ty), "` to `v`.")]
                pub fn $name(&mut self, v: &mut Vec<$ty>) -> Result<()> {
                    self.slice_of(v)
                }

                #[doc = concat!("Same as [`Decoder::", stringify!($name), "`].")]
                #[inline]
                pub fn $add(&mut self, v: &mut Vec<$ty>) -> Result<()> {
                    self.$name(v)
                }
            )*
        }
    };
}

slice_methods! {
    i64 => slice_i64, add_slice_i64;
    i8 => slice_i8, add_slice_i8;
    u8 => slice_u8, add_slice_u8;
    f64 => slice_f64, add_slice_f64;
    bool => slice_bool, add_slice_bool;
}
