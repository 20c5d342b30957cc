//! # fastcsv
//!
//! Streaming CSV tokenizer with constant memory usage.
//!
//! Bytes are read from any [`std::io::Read`] source through a buffered
//! reader and turned into records, one per call, following a configurable
//! [`Dialect`]: delimiter, quote, optional comment character, optional null
//! sentinel and optional trimming of leading whitespace. Field and record
//! storage is recycled through [`BufferPools`], which can be shared between
//! tokenizers running on different threads.
//!
//! ## Quick Start
//!
//! ```
//! use fastcsv::{Dialect, Tokenizer};
//!
//! let dialect = Dialect::builder()
//!     .comment(Some(b'#'))
//!     .null_sentinel(Some("\\N"))
//!     .build()
//!     .unwrap();
//!
//! let data = "# exported\nid,name\n1,\"Smith, J.\"\n2,\\N\n";
//! let mut tokenizer = Tokenizer::new(data.as_bytes(), dialect);
//!
//! let records: Vec<Vec<String>> = tokenizer.records().collect::<Result<_, _>>().unwrap();
//! assert_eq!(records, vec![
//!     vec!["id", "name"],
//!     vec!["1", "Smith, J."],
//!     vec!["2", ""],
//! ]);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`DialectBuilder`]
//! - `parallel`: [`parallel::tokenize_files`] over a rayon thread pool

pub mod csv;
pub mod csv_reader;
pub mod dialect;
pub mod error;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod pool;
pub mod position;
pub mod source;
pub mod tokenizer;

pub use csv::CsvEncoder;
pub use csv_reader::CsvReader;
pub use dialect::{Dialect, DialectBuilder};
pub use error::{CsvError, Result};
pub use pool::{BufferPools, PoolStats};
pub use position::Position;
pub use tokenizer::{ReadOutcome, Records, Tokenizer};
