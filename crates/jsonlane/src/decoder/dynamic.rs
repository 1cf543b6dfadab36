//! Decoding into the dynamic [`Value`] tree.

use super::{Decode, Decoder, number::float_from_lexeme};
use crate::{
    error::Result,
    literal_buffer::Literal,
    value::{Map, Value},
};

impl Decoder<'_> {
    /// Decodes the next value into a [`Value`]. Numbers become `f64`.
    ///
    /// Unlike the typed methods, an empty input is an error here.
    pub fn decode_value(&mut self) -> Result<Value> {
        self.start();
        self.read_value()
    }

    /// Decodes the next value into `v`, replacing it.
    pub fn value(&mut self, v: &mut Value) -> Result<()> {
        *v = self.decode_value()?;
        Ok(())
    }

    /// Same as [`Decoder::value`].
    #[inline]
    pub fn add_value(&mut self, v: &mut Value) -> Result<()> {
        self.value(v)
    }

    fn read_value(&mut self) -> Result<Value> {
        match self.cursor.skip_whitespace() {
            None => Err(self.eof()),
            Some(b'{') => {
                self.cursor.advance();
                self.nested(Self::read_map).map(Value::Object)
            }
            Some(b'[') => {
                self.cursor.advance();
                self.nested(Self::read_list).map(Value::Array)
            }
            Some(b'"') => {
                self.cursor.advance();
                let mut s = String::new();
                self.fill_string(&mut s, true)?;
                Ok(Value::String(s))
            }
            Some(b'-' | b'0'..=b'9') => {
                let lexeme = self.scan_number()?;
                Ok(Value::Number(float_from_lexeme(self.cursor.data(), &lexeme)?))
            }
            Some(b) => match Literal::from_first(b) {
                Some(lit) => Ok(match self.literal(lit)? {
                    Literal::Null => Value::Null,
                    Literal::True => Value::Boolean(true),
                    Literal::False => Value::Boolean(false),
                }),
                None => Err(self.unexpected(Some(b))),
            },
        }
    }

    fn read_map(&mut self) -> Result<Map> {
        let mut map = Map::new();
        if self.cursor.skip_whitespace() == Some(b'}') {
            self.cursor.advance();
            return Ok(map);
        }
        loop {
            self.expect_byte(b'"')?;
            let mut key = String::new();
            self.fill_string(&mut key, true)?;
            self.expect_byte(b':')?;
            let value = self.read_value()?;
            map.insert(key, value);
            match self.cursor.skip_whitespace() {
                Some(b',') => self.cursor.advance(),
                Some(b'}') => {
                    self.cursor.advance();
                    return Ok(map);
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }

    fn read_list(&mut self) -> Result<Vec<Value>> {
        let mut list = Vec::new();
        if self.cursor.skip_whitespace() == Some(b']') {
            self.cursor.advance();
            return Ok(list);
        }
        loop {
            list.push(self.read_value()?);
            match self.cursor.skip_whitespace() {
                Some(b',') => self.cursor.advance(),
                Some(b']') => {
                    self.cursor.advance();
                    return Ok(list);
                }
                other => return Err(self.unexpected(other)),
            }
        }
    }
}

impl<'de> Decode<'de> for Value {
    fn decode(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        dec.value(self)
    }
}
