//! Reusable storage for in-progress fields and records
//!
//! Two independent free lists live in a [`BufferPools`]: byte buffers for
//! fields and string containers for records. A pool can be owned by a single
//! tokenizer or shared as `Arc<BufferPools>` between tokenizers running on
//! different threads. No ordering is guaranteed about which released value
//! is handed out next, so every value is cleared when acquired.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Values that can be stored in a [`Pool`]
pub trait Reusable: Sized {
    /// Create a fresh value for an empty pool
    fn fresh(capacity: usize) -> Self;

    /// Drop prior contents, keeping the allocation
    fn reset(&mut self);

    /// Allocated capacity, used to refuse oversized values on release
    fn capacity(&self) -> usize;
}

impl Reusable for Vec<u8> {
    fn fresh(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }
}

impl Reusable for Vec<String> {
    fn fresh(capacity: usize) -> Self {
        Vec::with_capacity(capacity)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }
}

/// Pool counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Values allocated because the free list was empty
    pub created: u64,
    /// Acquisitions served from the free list
    pub reused: u64,
    /// Values currently waiting in the free list
    pub available: usize,
}

/// Thread-safe free list of reusable values
#[derive(Debug)]
pub struct Pool<T> {
    free: Mutex<Vec<T>>,
    initial_capacity: usize,
    max_retained: usize,
    max_capacity: usize,
    created: AtomicU64,
    reused: AtomicU64,
}

impl<T: Reusable> Pool<T> {
    /// Create a pool
    ///
    /// New values are allocated with `initial_capacity`. At most
    /// `max_retained` values are kept; released values whose capacity grew
    /// beyond `max_capacity` are dropped instead of retained.
    pub fn new(initial_capacity: usize, max_retained: usize, max_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            initial_capacity,
            max_retained,
            max_capacity,
            created: AtomicU64::new(0),
            reused: AtomicU64::new(0),
        }
    }

    /// Take a cleared value from the pool, allocating if it is empty
    pub fn acquire(&self) -> T {
        let recycled = self.free.lock().pop();
        match recycled {
            Some(mut value) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                value.reset();
                value
            }
            None => {
                self.created.fetch_add(1, Ordering::Relaxed);
                T::fresh(self.initial_capacity)
            }
        }
    }

    /// Hand a value back for reuse
    pub fn release(&self, value: T) {
        if value.capacity() > self.max_capacity {
            return;
        }
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(value);
        }
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            available: self.free.lock().len(),
        }
    }
}

/// Field byte buffers
pub type FieldPool = Pool<Vec<u8>>;

/// Record field containers
pub type RecordPool = Pool<Vec<String>>;

/// Initial capacity of a field buffer
pub const FIELD_CAPACITY: usize = 256;

/// Initial capacity of a record container
pub const RECORD_CAPACITY: usize = 16;

const MAX_RETAINED: usize = 64;
const MAX_FIELD_CAPACITY: usize = 1024 * 1024;
const MAX_RECORD_CAPACITY: usize = 64 * 1024;

/// The field and record pools used by a tokenizer
///
/// # Examples
///
/// ```
/// use fastcsv::{BufferPools, Dialect, Tokenizer};
///
/// let pools = BufferPools::shared();
/// let mut first = Tokenizer::with_pools(&b"a,b\n"[..], Dialect::default(), pools.clone());
/// let mut second = Tokenizer::with_pools(&b"c,d\n"[..], Dialect::default(), pools.clone());
///
/// assert_eq!(first.read_record().unwrap(), Some(vec!["a".to_string(), "b".to_string()]));
/// assert_eq!(second.read_record().unwrap(), Some(vec!["c".to_string(), "d".to_string()]));
/// ```
#[derive(Debug)]
pub struct BufferPools {
    fields: FieldPool,
    records: RecordPool,
}

impl Default for BufferPools {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPools {
    pub fn new() -> Self {
        Self {
            fields: Pool::new(FIELD_CAPACITY, MAX_RETAINED, MAX_FIELD_CAPACITY),
            records: Pool::new(RECORD_CAPACITY, MAX_RETAINED, MAX_RECORD_CAPACITY),
        }
    }

    /// New pools behind an `Arc`, ready to be shared between tokenizers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn fields(&self) -> &FieldPool {
        &self.fields
    }

    pub fn records(&self) -> &RecordPool {
        &self.records
    }
}
