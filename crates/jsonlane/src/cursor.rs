//! Byte cursor over a borrowed slice or a blocking reader.
//!
//! A slice-backed cursor reads the caller's bytes in place and never copies
//! them. A stream-backed cursor owns a buffer that is refilled on demand. The
//! stream buffer only grows during one top-level call so offsets taken inside
//! that call stay valid; [`Cursor::compact`] drops the consumed prefix between
//! calls.

use std::io::{self, Read};

use log::trace;
use memchr::memchr2;

pub(crate) enum Input<'de> {
    Slice(&'de [u8]),
    Stream(Box<dyn Read + Send + 'de>),
    Detached,
}

pub(crate) struct Cursor<'de> {
    input: Input<'de>,
    buf: Vec<u8>,
    pos: usize,
    len: usize,
    exhausted: bool,
    error: Option<io::Error>,
}

#[inline(always)]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes that may follow a scalar literal.
#[inline(always)]
pub(crate) fn is_delimiter(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b',' | b'}' | b']')
}

impl<'de> Cursor<'de> {
    pub(crate) fn from_slice(bytes: &'de [u8], buf: Vec<u8>) -> Self {
        Self {
            input: Input::Slice(bytes),
            buf,
            pos: 0,
            len: bytes.len(),
            exhausted: true,
            error: None,
        }
    }

    pub(crate) fn from_reader(reader: Box<dyn Read + Send + 'de>, mut buf: Vec<u8>, size: usize) -> Self {
        buf.clear();
        buf.resize(size.max(1), 0);
        Self {
            input: Input::Stream(reader),
            buf,
            pos: 0,
            len: 0,
            exhausted: false,
            error: None,
        }
    }

    /// Unbinds the input and hands back the owned buffer.
    pub(crate) fn detach(&mut self) -> Vec<u8> {
        self.input = Input::Detached;
        self.pos = 0;
        self.len = 0;
        self.exhausted = true;
        self.error = None;
        core::mem::take(&mut self.buf)
    }

    #[inline(always)]
    pub(crate) fn data(&self) -> &[u8] {
        match self.input {
            Input::Slice(bytes) => bytes,
            _ => &self.buf[..self.len],
        }
    }

    /// The caller's slice, when the cursor reads one in place.
    #[inline]
    pub(crate) fn borrowed(&self) -> Option<&'de [u8]> {
        match self.input {
            Input::Slice(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.pos < self.len);
        self.pos += 1;
    }

    #[inline(always)]
    pub(crate) fn peek(&mut self) -> Option<u8> {
        if self.pos < self.len || self.read_more() {
            Some(self.data()[self.pos])
        } else {
            None
        }
    }

    #[inline(always)]
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Skips JSON whitespace and returns the next byte without consuming it.
    #[inline]
    pub(crate) fn skip_whitespace(&mut self) -> Option<u8> {
        loop {
            let b = self.peek()?;
            if !is_whitespace(b) {
                return Some(b);
            }
            self.pos += 1;
        }
    }

    /// Reads from the stream until at least one new byte is buffered.
    ///
    /// Returns `false` at end of stream, on a read error (kept for
    /// [`Cursor::take_error`]) or for slice-backed cursors.
    pub(crate) fn read_more(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let Input::Stream(reader) = &mut self.input else {
            self.exhausted = true;
            return false;
        };
        if self.len == self.buf.len() {
            let grown = (self.buf.len() * 2).max(64);
            trace!("growing decoder buffer from {} to {grown} bytes", self.buf.len());
            self.buf.resize(grown, 0);
        }
        loop {
            match reader.read(&mut self.buf[self.len..]) {
                Ok(0) => {
                    self.exhausted = true;
                    return false;
                }
                Ok(n) => {
                    trace!("refilled {n} bytes");
                    self.len += n;
                    return true;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.error = Some(e);
                    self.exhausted = true;
                    return false;
                }
            }
        }
    }

    pub(crate) fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Drops the consumed prefix of the stream buffer.
    pub(crate) fn compact(&mut self) {
        if matches!(self.input, Input::Stream(_)) && self.pos > 0 {
            self.buf.copy_within(self.pos..self.len, 0);
            self.len -= self.pos;
            self.pos = 0;
        }
    }

    /// Moves past plain string bytes, copying them into `dst` when given.
    ///
    /// Stops in front of the next `"` or `\` and returns it, or returns
    /// `None` when the input ends first.
    pub(crate) fn scan_string_run(&mut self, mut dst: Option<&mut Vec<u8>>) -> Option<u8> {
        loop {
            let rest = match self.input {
                Input::Slice(bytes) => &bytes[self.pos..self.len],
                _ => &self.buf[self.pos..self.len],
            };
            match memchr2(b'"', b'\\', rest) {
                Some(i) => {
                    if let Some(dst) = dst.as_deref_mut() {
                        dst.extend_from_slice(&rest[..i]);
                    }
                    let special = rest[i];
                    self.pos += i;
                    return Some(special);
                }
                None => {
                    if let Some(dst) = dst.as_deref_mut() {
                        dst.extend_from_slice(rest);
                    }
                    self.pos = self.len;
                    if !self.read_more() {
                        return None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((b, rest)) if !buf.is_empty() => {
                    buf[0] = *b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn slice_cursor_never_refills() {
        let mut c = Cursor::from_slice(b"  x", Vec::new());
        assert_eq!(c.skip_whitespace(), Some(b'x'));
        c.advance();
        assert_eq!(c.peek(), None);
        assert!(c.take_error().is_none());
    }

    #[test]
    fn stream_cursor_grows_and_keeps_offsets() {
        let mut c = Cursor::from_reader(Box::new(Trickle(b"abcdefgh")), Vec::new(), 2);
        let mut seen = Vec::new();
        while let Some(b) = c.next_byte() {
            seen.push(b);
        }
        assert_eq!(seen, b"abcdefgh");
        assert_eq!(&c.data()[2..5], b"cde");
    }

    #[test]
    fn compact_discards_consumed_prefix() {
        let mut c = Cursor::from_reader(Box::new(&b"12 34"[..]), Vec::new(), 16);
        for _ in 0..3 {
            c.next_byte();
        }
        c.compact();
        assert_eq!(c.pos(), 0);
        assert_eq!(c.data(), b"34");
    }

    #[test]
    fn string_run_stops_at_quote_across_refills() {
        let mut c = Cursor::from_reader(Box::new(Trickle(b"hello\"")), Vec::new(), 1);
        let mut out = Vec::new();
        assert_eq!(c.scan_string_run(Some(&mut out)), Some(b'"'));
        assert_eq!(out, b"hello");
    }

    #[test]
    fn read_errors_are_kept() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("boom"))
            }
        }
        let mut c = Cursor::from_reader(Box::new(Broken), Vec::new(), 4);
        assert_eq!(c.peek(), None);
        assert_eq!(c.take_error().map(|e| e.to_string()), Some("boom".to_owned()));
    }
}
