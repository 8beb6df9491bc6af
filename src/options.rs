//! Search bounds and record framing options.
//!
//! Every operation takes a [`SearchOptions`]; fixed-record operations also
//! take a [`FixedLayout`]. Bounds are resolved against the source at the
//! start of each call, never cached between calls.

use crate::error::{BisectError, Result};
use crate::source::ByteSource;

/// Default chunk size for boundary scanning and line reads
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default record delimiter
pub const DEFAULT_DELIMITER: u8 = b'\n';

/// Options shared by every search operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Lowest offset considered. A line starting exactly here is included;
    /// a line straddling it is not.
    pub lo: u64,

    /// Exclusive upper bound: only records ending at or before it are in
    /// range. `None` means the size of the source at the moment the
    /// operation starts.
    pub hi: Option<u64>,

    /// Byte terminating variable-length lines
    pub delimiter: u8,

    /// Bytes read per step when scanning for a delimiter
    pub chunk_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            lo: 0,
            hi: None,
            delimiter: DEFAULT_DELIMITER,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lo(mut self, lo: u64) -> Self {
        self.lo = lo;
        self
    }

    /// Pin the upper bound instead of following the source size
    pub fn with_hi(mut self, hi: u64) -> Self {
        self.hi = Some(hi);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Resolve `(lo, hi)` against the current state of `source`
    ///
    /// Reads the size fresh unless `hi` is pinned. With `hi` pinned, a source
    /// that cannot report its size is trusted; otherwise `hi <= size` is
    /// enforced.
    pub(crate) fn resolve<S: ByteSource + ?Sized>(&self, source: &S) -> Result<(u64, u64)> {
        if self.chunk_size == 0 {
            return Err(BisectError::invalid_argument("chunk size must be non-zero"));
        }

        let size = match source.current_size() {
            Ok(size) => Some(size),
            Err(BisectError::SizeUnavailable) if self.hi.is_some() => None,
            Err(e) => return Err(e),
        };

        let hi = match (self.hi, size) {
            (Some(hi), _) => hi,
            (None, Some(size)) => size,
            (None, None) => return Err(BisectError::SizeUnavailable),
        };

        if self.lo > hi || size.is_some_and(|size| hi > size) {
            return Err(BisectError::invalid_range(self.lo, hi, size));
        }

        Ok((self.lo, hi))
    }
}

/// Layout of a file made of constant-size records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLayout {
    /// Size of every record in bytes
    pub recsize: u64,

    /// Offset of the first record (header length)
    pub base: u64,
}

impl FixedLayout {
    pub fn new(recsize: u64) -> Self {
        Self { recsize, base: 0 }
    }

    pub fn with_base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    /// Offset of record `index`
    pub fn offset_of(&self, index: u64) -> u64 {
        self.base + index * self.recsize
    }

    /// Index range of the whole records lying in `[lo, hi)`
    ///
    /// A record straddling `lo` is skipped; a trailing partial record below
    /// `hi` (an append still in flight) is dropped.
    pub(crate) fn index_range(&self, lo: u64, hi: u64) -> Result<(u64, u64)> {
        if self.recsize == 0 {
            return Err(BisectError::invalid_range(lo, hi, None));
        }

        let first = lo.saturating_sub(self.base).div_ceil(self.recsize);
        let end = hi.saturating_sub(self.base) / self.recsize;
        Ok((first.min(end), end))
    }
}
