//! The object/array dispatch loop driving [`DecodeObject`] and
//! [`DecodeArray`] capabilities.

use std::mem;

use log::trace;

use super::{Decoder, Lead};
use crate::{
    capability::{DecodeArray, DecodeObject},
    error::Result,
};

impl<'de> Decoder<'de> {
    /// Decodes a JSON object through `v`'s [`DecodeObject::decode_key`].
    ///
    /// Keys the callback leaves alone are skipped. `null` leaves `v` as it is.
    pub fn object<T: DecodeObject<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End | Lead::Null => Ok(()),
            Lead::Byte(b'{') => {
                self.cursor.advance();
                self.object_members(v)
            }
            Lead::Byte(b) => Err(self.mismatch(b, "object")),
        }
    }

    /// Same as [`Decoder::object`].
    #[inline]
    pub fn add_object<T: DecodeObject<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.object(v)
    }

    /// Decodes a JSON object into an optional destination, creating it with
    /// `Default` on first use. `null` stores `None`.
    pub fn object_null<T: DecodeObject<'de> + Default>(&mut self, v: &mut Option<T>) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End => Ok(()),
            Lead::Null => {
                *v = None;
                Ok(())
            }
            Lead::Byte(b'{') => {
                self.cursor.advance();
                self.object_members(v.get_or_insert_with(T::default))
            }
            Lead::Byte(b) => Err(self.mismatch(b, "object")),
        }
    }

    /// Same as [`Decoder::object_null`].
    #[inline]
    pub fn add_object_null<T: DecodeObject<'de> + Default>(&mut self, v: &mut Option<T>) -> Result<()> {
        self.object_null(v)
    }

    /// Decodes a JSON array through `v`'s [`DecodeArray::decode_element`].
    pub fn array<T: DecodeArray<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End | Lead::Null => Ok(()),
            Lead::Byte(b'[') => {
                self.cursor.advance();
                self.nested(|dec| dec.array_elements(v))
            }
            Lead::Byte(b) => Err(self.mismatch(b, "array")),
        }
    }

    /// Same as [`Decoder::array`].
    #[inline]
    pub fn add_array<T: DecodeArray<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        self.array(v)
    }

    /// Array counterpart of [`Decoder::object_null`].
    pub fn array_null<T: DecodeArray<'de> + Default>(&mut self, v: &mut Option<T>) -> Result<()> {
        self.start();
        match self.lead()? {
            Lead::End => Ok(()),
            Lead::Null => {
                *v = None;
                Ok(())
            }
            Lead::Byte(b'[') => {
                self.cursor.advance();
                let target = v.get_or_insert_with(T::default);
                self.nested(|dec| dec.array_elements(target))
            }
            Lead::Byte(b) => Err(self.mismatch(b, "array")),
        }
    }

    /// Same as [`Decoder::array_null`].
    #[inline]
    pub fn add_array_null<T: DecodeArray<'de> + Default>(&mut self, v: &mut Option<T>) -> Result<()> {
        self.array_null(v)
    }

    fn object_members<T: DecodeObject<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        let hint = v.key_count();
        self.nested(|dec| {
            let outer = (dec.keys_done, dec.key_hint);
            dec.keys_done = 0;
            dec.key_hint = hint;
            let mut key = mem::take(&mut dec.key);
            let result = dec.walk_members(v, &mut key);
            dec.key = key;
            if dec.depth > 1 {
                (dec.keys_done, dec.key_hint) = outer;
            }
            result
        })
    }

    fn walk_members<T: DecodeObject<'de> + ?Sized>(&mut self, v: &mut T, key: &mut String) -> Result<()> {
        if self.cursor.skip_whitespace() == Some(b'}') {
            self.cursor.advance();
            return Ok(());
        }
        loop {
            self.expect_byte(b'"')?;
            self.fill_string(key, false)?;
            self.expect_byte(b':')?;
            if self.cursor.skip_whitespace().is_none() {
                return Err(self.eof());
            }
            let before = self.cursor.pos();
            v.decode_key(self, key)?;
            if self.cursor.pos() == before {
                trace!("skipping value of unhandled key {key:?}");
                self.skip_value()?;
            } else {
                self.keys_done += 1;
            }
            match self.cursor.skip_whitespace() {
                Some(b',') => self.cursor.advance(),
                Some(b'}') => {
                    self.cursor.advance();
                    return Ok(());
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn array_elements<T: DecodeArray<'de> + ?Sized>(&mut self, v: &mut T) -> Result<()> {
        if self.cursor.skip_whitespace() == Some(b']') {
            self.cursor.advance();
            return Ok(());
        }
        loop {
            if self.cursor.skip_whitespace().is_none() {
                return Err(self.eof());
            }
            let before = self.cursor.pos();
            v.decode_element(self)?;
            if self.cursor.pos() == before {
                self.skip_value()?;
            }
            match self.cursor.skip_whitespace() {
                Some(b',') => self.cursor.advance(),
                Some(b']') => {
                    self.cursor.advance();
                    return Ok(());
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }
}
