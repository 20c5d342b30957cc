//! Tokenizing many files concurrently over shared buffer pools

use crate::csv_reader::CsvReader;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::pool::BufferPools;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Tokenize every file in `paths`, one rayon task per file
///
/// All tasks draw from `pools`. Results come back in the order of `paths`;
/// a failure in one file does not affect the others.
///
/// # Examples
///
/// ```no_run
/// use fastcsv::{parallel, BufferPools, Dialect};
///
/// let results = parallel::tokenize_files(&["a.csv", "b.csv"], &Dialect::default(), BufferPools::shared());
/// for records in results {
///     println!("{} records", records.unwrap().len());
/// }
/// ```
pub fn tokenize_files<P>(
    paths: &[P],
    dialect: &Dialect,
    pools: Arc<BufferPools>,
) -> Vec<Result<Vec<Vec<String>>>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| -> Result<Vec<Vec<String>>> {
            let mut reader = CsvReader::open_with_pools(path, dialect.clone(), Arc::clone(&pools))?;
            reader.rows().collect()
        })
        .collect()
}
