//! Buffered byte source with one byte of look-ahead

use std::io::{self, BufRead, BufReader, ErrorKind, Read};

/// Byte-at-a-time view over a buffered reader
///
/// `peek_byte` looks at the next byte without consuming it; the tokenizer
/// uses it to merge CRLF pairs and to detect doubled quotes. Interrupted
/// reads are retried.
#[derive(Debug)]
pub struct ByteSource<R> {
    inner: BufReader<R>,
    consumed: u64,
}

impl<R: Read> ByteSource<R> {
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, reader),
            consumed: 0,
        }
    }

    /// Consume and return the next byte, `None` at end of input
    #[inline]
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.inner.consume(1);
            self.consumed += 1;
        }
        Ok(byte)
    }

    /// Return the next byte without consuming it
    #[inline]
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Consume the next byte if it equals `expected`
    #[inline]
    pub fn next_if_eq(&mut self, expected: u8) -> io::Result<bool> {
        if self.peek_byte()? == Some(expected) {
            self.inner.consume(1);
            self.consumed += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<R> ByteSource<R> {
    /// Total bytes consumed so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }
}
