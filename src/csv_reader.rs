//! CSV file reading with streaming support and header handling

use crate::dialect::Dialect;
use crate::error::{CsvError, Result};
use crate::pool::BufferPools;
use crate::position::Position;
use crate::tokenizer::Tokenizer;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// CSV reader with streaming capabilities
///
/// Reads CSV data record by record using an iterator pattern, on top of a
/// [`Tokenizer`]. Memory usage is constant and low.
///
/// # Examples
///
/// ```no_run
/// use fastcsv::csv_reader::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv").unwrap();
///
/// for row_result in reader.rows() {
///     let row = row_result.unwrap();
///     println!("{:?}", row);
/// }
/// ```
///
/// # With Headers
///
/// ```
/// use fastcsv::csv_reader::CsvReader;
/// use fastcsv::Dialect;
///
/// let data = "id,name\n1,Alice\n2,Bob\n";
/// let mut reader = CsvReader::from_reader(data.as_bytes(), Dialect::default()).has_header(true);
///
/// let rows: Vec<_> = reader.rows().collect::<Result<_, _>>().unwrap();
/// assert_eq!(reader.headers(), Some(&["id".to_string(), "name".to_string()][..]));
/// assert_eq!(rows, vec![vec!["1", "Alice"], vec!["2", "Bob"]]);
/// ```
pub struct CsvReader<R = File> {
    tokenizer: Tokenizer<R>,

    // Configuration
    has_header: bool,
    headers: Vec<String>,
}

impl CsvReader<File> {
    /// Open CSV file with the default dialect
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_dialect(path, Dialect::default())
    }

    /// Open CSV file with a custom dialect
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fastcsv::csv_reader::CsvReader;
    /// use fastcsv::Dialect;
    ///
    /// let dialect = Dialect::builder().delimiter(b'\t').build().unwrap();
    /// let reader = CsvReader::open_with_dialect("data.tsv", dialect).unwrap();
    /// ```
    pub fn open_with_dialect<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        Self::open_with_pools(path, dialect, BufferPools::shared())
    }

    /// Open CSV file drawing buffers from shared pools
    pub fn open_with_pools<P: AsRef<Path>>(
        path: P,
        dialect: Dialect,
        pools: Arc<BufferPools>,
    ) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref).map_err(|e| CsvError::Open {
            path: path_ref.to_path_buf(),
            source: Arc::new(e),
        })?;
        tracing::debug!(path = %path_ref.display(), "opened CSV file");
        Ok(Self::from_tokenizer(Tokenizer::with_pools(file, dialect, pools)))
    }
}

impl<R: Read> CsvReader<R> {
    /// Read CSV from any byte source
    pub fn from_reader(reader: R, dialect: Dialect) -> Self {
        Self::from_tokenizer(Tokenizer::new(reader, dialect))
    }

    fn from_tokenizer(tokenizer: Tokenizer<R>) -> Self {
        CsvReader {
            tokenizer,
            has_header: false,
            headers: Vec::new(),
        }
    }

    /// Indicate that the first row contains headers (builder pattern)
    ///
    /// When set to `true`, the first row will be stored and accessible via `headers()`.
    /// The iterator will skip the header row.
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Get header row if available
    ///
    /// Returns `Some(&[String])` once the header row has been read, `None` otherwise.
    pub fn headers(&self) -> Option<&[String]> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }

    /// Read a single row, returning `Ok(None)` at end of input
    ///
    /// With `has_header(true)` the first row is stored as the header and the
    /// following row is returned instead.
    pub fn read_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.has_header && self.tokenizer.current_row() == 0 {
            match self.tokenizer.read_record()? {
                Some(header) => self.headers = header,
                None => return Ok(None),
            }
        }
        self.tokenizer.read_record()
    }

    /// Get iterator over rows
    pub fn rows(&mut self) -> CsvRowIterator<'_, R> {
        CsvRowIterator {
            reader: self,
            done: false,
        }
    }

    /// Get the number of rows read so far, header included
    pub fn row_count(&self) -> u64 {
        self.tokenizer.current_row()
    }

    /// Current read position
    pub fn position(&self) -> Position {
        self.tokenizer.position()
    }

    pub fn tokenizer(&self) -> &Tokenizer<R> {
        &self.tokenizer
    }
}

/// Iterator over CSV rows
pub struct CsvRowIterator<'a, R> {
    reader: &'a mut CsvReader<R>,
    done: bool,
}

impl<R: Read> Iterator for CsvRowIterator<'_, R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
