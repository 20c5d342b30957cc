//! Streaming record tokenizer
//!
//! [`Tokenizer`] pulls bytes from any [`Read`] source and produces one record
//! per call. Fields are accumulated in pooled byte buffers and records in
//! pooled containers; finalized values are moved out before a record is
//! handed to the caller, so returned records never alias pooled storage.
//!
//! Parsing rules, per byte and in priority order:
//!
//! 1. The comment byte at the very start of a record skips the rest of the
//!    physical line (CR, LF or CRLF).
//! 2. The delimiter outside quotes ends the field.
//! 3. The quote byte opens a quoted field only as the first byte of a field.
//!    Inside quotes a doubled quote is one literal quote; a single quote
//!    closes the quoted section. Anywhere else it is plain data.
//! 4. CR, LF or CRLF outside quotes ends the record.
//! 5. Any other byte is appended, except leading spaces and tabs of an
//!    unquoted field when trimming is enabled.
//!
//! A final record without a line terminator is still returned. Once the
//! source is exhausted or fails, every later call repeats that outcome
//! without touching the source again.

use crate::dialect::Dialect;
use crate::error::{CsvError, Result};
use crate::pool::BufferPools;
use crate::position::{Position, PositionTracker};
use crate::source::ByteSource;
use std::io::{self, Read};
use std::mem;
use std::sync::Arc;

/// Result of one [`Tokenizer::next_record`] call
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    /// The next record, one string per field
    Record(Vec<String>),
    /// No more records; not a failure
    EndOfStream,
    /// The source failed. The same error is returned on every later call
    Error(CsvError),
}

impl ReadOutcome {
    /// Convert into the `Result<Option<_>>` shape used by [`Tokenizer::read_record`]
    pub fn into_result(self) -> Result<Option<Vec<String>>> {
        match self {
            ReadOutcome::Record(record) => Ok(Some(record)),
            ReadOutcome::EndOfStream => Ok(None),
            ReadOutcome::Error(e) => Err(e),
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReadOutcome::EndOfStream)
    }
}

/// Where the tokenizer is inside the current field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Nothing consumed for this field yet
    Start,
    /// Plain, unquoted content
    Unquoted,
    /// Between an opening and a closing quote
    Quoted,
    /// After the closing quote; later bytes are plain data
    QuoteClosed,
}

#[derive(Debug)]
enum Terminal {
    Exhausted,
    Failed(CsvError),
}

enum Scan {
    /// A record ended with a line terminator
    Record,
    /// The source ended with pending content, flushed as a last record
    Last,
    /// The source ended with nothing pending
    Empty,
}

/// Streaming tokenizer over a byte source
///
/// A tokenizer owns its source for its whole lifetime and must be driven
/// by one caller at a time. The buffer pools it draws from may be shared
/// with other tokenizers (see [`Tokenizer::with_pools`]).
///
/// # Examples
///
/// ```
/// use fastcsv::{Dialect, ReadOutcome, Tokenizer};
///
/// let data = "a,b,c\n1,2,3";
/// let mut tokenizer = Tokenizer::new(data.as_bytes(), Dialect::default());
///
/// let mut rows = Vec::new();
/// loop {
///     match tokenizer.next_record() {
///         ReadOutcome::Record(record) => rows.push(record),
///         ReadOutcome::EndOfStream => break,
///         ReadOutcome::Error(e) => panic!("{}", e),
///     }
/// }
///
/// assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
/// assert_eq!(tokenizer.current_row(), 2);
/// ```
pub struct Tokenizer<R> {
    source: ByteSource<R>,
    dialect: Dialect,
    pools: Arc<BufferPools>,

    // In-progress state
    field: Vec<u8>,
    record: Vec<String>,
    state: FieldState,

    tracker: PositionTracker,
    terminal: Option<Terminal>,
}

impl<R: Read> Tokenizer<R> {
    /// Create a tokenizer with its own private buffer pools
    pub fn new(reader: R, dialect: Dialect) -> Self {
        Self::with_pools(reader, dialect, BufferPools::shared())
    }

    /// Create a tokenizer drawing buffers from `pools`
    pub fn with_pools(reader: R, dialect: Dialect, pools: Arc<BufferPools>) -> Self {
        tracing::debug!(
            delimiter = ?(dialect.delimiter() as char),
            quote = ?dialect.quote().map(char::from),
            comment = ?dialect.comment().map(char::from),
            null_sentinel = ?dialect.null_sentinel(),
            trim_leading = dialect.trim_leading(),
            "creating tokenizer"
        );

        let source = ByteSource::with_capacity(dialect.buffer_capacity(), reader);
        let field = pools.fields().acquire();
        let record = pools.records().acquire();
        Self {
            source,
            dialect,
            pools,
            field,
            record,
            state: FieldState::Start,
            tracker: PositionTracker::default(),
            terminal: None,
        }
    }

    /// Read the next record
    ///
    /// The returned fields are owned by the caller and stay valid
    /// regardless of later calls.
    pub fn next_record(&mut self) -> ReadOutcome {
        match self.advance() {
            Ok(true) => ReadOutcome::Record(self.record.drain(..).collect()),
            Ok(false) => ReadOutcome::EndOfStream,
            Err(e) => ReadOutcome::Error(e),
        }
    }

    /// Read the next record, `Ok(None)` at end of stream
    ///
    /// # Examples
    ///
    /// ```
    /// use fastcsv::{Dialect, Tokenizer};
    ///
    /// let mut tokenizer = Tokenizer::new(&b"x;y\n"[..], Dialect::builder().delimiter(b';').build().unwrap());
    ///
    /// while let Some(record) = tokenizer.read_record().unwrap() {
    ///     assert_eq!(record, vec!["x", "y"]);
    /// }
    /// ```
    pub fn read_record(&mut self) -> Result<Option<Vec<String>>> {
        self.next_record().into_result()
    }

    /// Read the next record without copying it out of pooled storage
    ///
    /// The returned slice borrows the tokenizer and is only valid until
    /// the next call; the borrow checker rejects keeping it longer:
    ///
    /// ```compile_fail
    /// use fastcsv::{Dialect, Tokenizer};
    ///
    /// let mut tokenizer = Tokenizer::new(&b"a\nb\n"[..], Dialect::default());
    /// let first = tokenizer.read_record_borrowed().unwrap().unwrap();
    /// let _second = tokenizer.read_record_borrowed().unwrap();
    /// assert_eq!(first, ["a"]);
    /// ```
    ///
    /// Copy the fields (`to_vec()`) to keep a record across calls.
    pub fn read_record_borrowed(&mut self) -> Result<Option<&[String]>> {
        if self.advance()? {
            Ok(Some(self.record.as_slice()))
        } else {
            Ok(None)
        }
    }

    /// Iterate over the remaining records
    ///
    /// The iterator ends after end of stream or after yielding the first
    /// error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            tokenizer: self,
            done: false,
        }
    }

    /// Produce the next record in `self.record`; `false` at end of stream
    fn advance(&mut self) -> Result<bool> {
        match &self.terminal {
            Some(Terminal::Failed(e)) => return Err(e.clone()),
            Some(Terminal::Exhausted) => return Ok(false),
            None => {}
        }

        self.begin_record();
        match self.scan_record() {
            Ok(Scan::Record) => {
                self.finish_record();
                Ok(true)
            }
            Ok(Scan::Last) => {
                self.finish_record();
                self.terminal = Some(Terminal::Exhausted);
                Ok(true)
            }
            Ok(Scan::Empty) => {
                tracing::debug!(position = %self.position(), bytes = self.bytes_read(), "end of stream");
                self.terminal = Some(Terminal::Exhausted);
                Ok(false)
            }
            Err(source) => {
                let err = CsvError::io(self.position(), source);
                tracing::warn!(error = %err, "read failed, tokenizer stopped");
                self.terminal = Some(Terminal::Failed(err.clone()));
                Err(err)
            }
        }
    }

    fn begin_record(&mut self) {
        let spent = mem::take(&mut self.record);
        self.pools.records().release(spent);
        self.record = self.pools.records().acquire();
        self.field.clear();
        self.state = FieldState::Start;
        self.tracker.start_record();
    }

    fn finish_record(&mut self) {
        self.tracker.finish_record(self.record.len());
        tracing::trace!(row = self.tracker.row(), fields = self.record.len(), "record");
    }

    fn scan_record(&mut self) -> io::Result<Scan> {
        loop {
            let byte = match self.source.next_byte()? {
                Some(b) => b,
                None if self.has_pending() => {
                    self.commit_field();
                    return Ok(Scan::Last);
                }
                None => return Ok(Scan::Empty),
            };

            if self.field_is_empty()
                && self.record.is_empty()
                && self.dialect.is_comment(byte)
            {
                self.skip_line()?;
                continue;
            }

            if byte == self.dialect.delimiter() && self.state != FieldState::Quoted {
                self.commit_field();
                continue;
            }

            if self.dialect.is_quote(byte) {
                match self.state {
                    FieldState::Start | FieldState::QuoteClosed if self.field.is_empty() => {
                        self.state = FieldState::Quoted;
                        continue;
                    }
                    FieldState::Quoted => {
                        if self.source.next_if_eq(byte)? {
                            self.field.push(byte);
                        } else {
                            self.state = FieldState::QuoteClosed;
                        }
                        continue;
                    }
                    // Mid-field quotes are data
                    _ => {}
                }
            } else if (byte == b'\n' || byte == b'\r') && self.state != FieldState::Quoted {
                if byte == b'\r' {
                    self.source.next_if_eq(b'\n')?;
                }
                self.commit_field();
                return Ok(Scan::Record);
            }

            if self.field_is_empty() {
                if self.dialect.trim_leading() && (byte == b' ' || byte == b'\t') {
                    continue;
                }
                if self.state == FieldState::Start {
                    self.state = FieldState::Unquoted;
                }
            }
            self.field.push(byte);
        }
    }

    /// Discard the rest of the current physical line
    fn skip_line(&mut self) -> io::Result<()> {
        let start = self.source.consumed();
        while let Some(b) = self.source.next_byte()? {
            match b {
                b'\n' => break,
                b'\r' => {
                    self.source.next_if_eq(b'\n')?;
                    break;
                }
                _ => {}
            }
        }
        tracing::trace!(bytes = self.source.consumed() - start + 1, "skipped comment line");
        self.state = FieldState::Start;
        Ok(())
    }

    /// No content yet for this field, outside quotes. An empty quoted
    /// section that already closed still counts.
    fn field_is_empty(&self) -> bool {
        self.state != FieldState::Quoted && self.field.is_empty()
    }

    fn has_pending(&self) -> bool {
        !self.field.is_empty() || self.state == FieldState::Quoted || !self.record.is_empty()
    }

    /// Finalize the current field and append it to the record
    fn commit_field(&mut self) {
        let mut value = String::from_utf8_lossy(&self.field).into_owned();
        let was_quoted = matches!(self.state, FieldState::Quoted | FieldState::QuoteClosed);

        let spent = mem::take(&mut self.field);
        self.pools.fields().release(spent);
        self.field = self.pools.fields().acquire();

        if self.dialect.trim_leading() && !was_quoted {
            let skip = value.len() - value.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
            value.drain(..skip);
        }
        if self.dialect.null_sentinel() == Some(value.as_str()) {
            value.clear();
        }

        self.record.push(value);
        self.state = FieldState::Start;
        self.tracker.advance_column();
    }
}

impl<R> Tokenizer<R> {
    /// Number of records produced so far (1-based row of the last record)
    pub fn current_row(&self) -> u64 {
        self.tracker.row()
    }

    /// 1-based column of the field being read; reset for each record
    pub fn current_column(&self) -> usize {
        self.tracker.column()
    }

    /// Total bytes consumed from the source, comment lines included
    pub fn bytes_read(&self) -> u64 {
        self.source.consumed()
    }

    /// Number of fields in the most recently produced record
    pub fn field_count(&self) -> usize {
        self.tracker.last_field_count()
    }

    /// Current position, for error messages
    pub fn position(&self) -> Position {
        self.tracker.snapshot(self.source.consumed())
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn pools(&self) -> &Arc<BufferPools> {
        &self.pools
    }

    /// Reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }
}

impl<R> Drop for Tokenizer<R> {
    fn drop(&mut self) {
        self.pools.fields().release(mem::take(&mut self.field));
        self.pools.records().release(mem::take(&mut self.record));
    }
}

/// Iterator over records, created by [`Tokenizer::records`]
pub struct Records<'a, R> {
    tokenizer: &'a mut Tokenizer<R>,
    done: bool,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.tokenizer.next_record() {
            ReadOutcome::Record(record) => Some(Ok(record)),
            ReadOutcome::EndOfStream => {
                self.done = true;
                None
            }
            ReadOutcome::Error(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
