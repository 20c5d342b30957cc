//! Error types for CSV tokenizing

use crate::position::Position;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors produced while configuring or running the tokenizer
///
/// The type is `Clone` so that a read failure can be cached and handed back
/// unchanged on every later call (sticky failure).
#[derive(Debug, Clone, thiserror::Error)]
pub enum CsvError {
    /// The dialect is invalid. Raised only when the dialect is built.
    #[error("Invalid dialect: {0}")]
    Config(String),

    /// The byte source failed with something other than end of input
    #[error("Failed to read input at {position}: {source}")]
    Io {
        position: Position,
        #[source]
        source: Arc<io::Error>,
    },

    /// A file could not be opened
    #[error("Failed to open CSV file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
}

impl CsvError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        CsvError::Config(msg.into())
    }

    pub(crate) fn io(position: Position, source: io::Error) -> Self {
        CsvError::Io {
            position,
            source: Arc::new(source),
        }
    }

    /// Underlying I/O error kind, if this error came from the byte source
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            CsvError::Io { source, .. } | CsvError::Open { source, .. } => Some(source.kind()),
            CsvError::Config(_) => None,
        }
    }

    /// Check if this is a dialect validation error
    pub fn is_config(&self) -> bool {
        matches!(self, CsvError::Config(_))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CsvError>;
