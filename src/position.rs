//! Read position reported by the tokenizer for diagnostics

use std::fmt;

/// Snapshot of where the tokenizer is in its input
///
/// `row` counts completed records (1-based once the first record is out),
/// `column` is the 1-based column of the field being built, and
/// `bytes_read` counts every byte consumed from the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u64,
    pub column: usize,
    pub bytes_read: u64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row, self.column)
    }
}

/// Counters updated by the tokenizer
///
/// Pure bookkeeping: nothing here feeds back into parsing decisions.
#[derive(Debug, Default)]
pub(crate) struct PositionTracker {
    row: u64,
    column: usize,
    last_field_count: usize,
}

impl PositionTracker {
    pub(crate) fn start_record(&mut self) {
        self.column = 0;
    }

    pub(crate) fn advance_column(&mut self) {
        self.column += 1;
    }

    pub(crate) fn finish_record(&mut self, field_count: usize) {
        self.row += 1;
        self.column = 0;
        self.last_field_count = field_count;
    }

    pub(crate) fn row(&self) -> u64 {
        self.row
    }

    /// 1-based column of the field in progress
    pub(crate) fn column(&self) -> usize {
        self.column + 1
    }

    pub(crate) fn last_field_count(&self) -> usize {
        self.last_field_count
    }

    pub(crate) fn snapshot(&self, bytes_read: u64) -> Position {
        Position {
            row: self.row,
            column: self.column(),
            bytes_read,
        }
    }
}
