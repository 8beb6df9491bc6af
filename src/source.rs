//! Byte source abstraction over files, memory maps and in-memory buffers.
//!
//! The bisection engines only ever talk to a [`ByteSource`]: read a run of
//! bytes at an absolute offset, and report the current size. Concrete
//! resources live in the submodules and are selected by [`SourceFactory`].

pub mod adaptive;
pub mod factory;
pub mod file;
pub mod memory;
pub mod mmap;
pub mod validation;

pub use adaptive::{AccessStrategy, AdaptiveSource};
pub use factory::SourceFactory;
pub use file::FileSource;
pub use memory::MemorySource;
pub use mmap::MmapSource;
pub use validation::validate_source_path;

use crate::error::Result;
use std::sync::Arc;

/// Random-access, read-only view of a sorted resource.
///
/// Implementations take `&self` so that one value can back several searches.
/// Whether those searches share a seek cursor is up to the implementation;
/// the engine never assumes either way.
pub trait ByteSource {
    /// Read up to `length` bytes starting at `start`
    ///
    /// # Returns
    /// * Fewer than `length` bytes near the end of the resource
    /// * An empty vector if `start` is at or beyond the end
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>>;

    /// Current size of the resource in bytes
    ///
    /// The value may grow between calls when a writer is appending. Sources
    /// that cannot know their size return
    /// [`BisectError::SizeUnavailable`](crate::error::BisectError::SizeUnavailable).
    fn current_size(&self) -> Result<u64>;
}

/// Size of `source` as seen right now.
///
/// Regular files report metadata length, block devices their seekable end,
/// buffers their length. Anything else reports `SizeUnavailable`, in which
/// case callers must pin `hi` themselves.
pub fn source_size<S: ByteSource + ?Sized>(source: &S) -> Result<u64> {
    source.current_size()
}

/// Clamp a `(start, length)` request to the bounds of `bytes`.
pub(crate) fn clamp_range(bytes: &[u8], start: u64, length: usize) -> &[u8] {
    let len = bytes.len();
    let start = usize::try_from(start).unwrap_or(usize::MAX).min(len);
    let end = start.saturating_add(length).min(len);
    &bytes[start..end]
}

impl ByteSource for [u8] {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        Ok(clamp_range(self, start, length).to_vec())
    }

    fn current_size(&self) -> Result<u64> {
        Ok(self.len() as u64)
    }
}

impl ByteSource for Vec<u8> {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        self.as_slice().read_range(start, length)
    }

    fn current_size(&self) -> Result<u64> {
        Ok(self.len() as u64)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        (**self).read_range(start, length)
    }

    fn current_size(&self) -> Result<u64> {
        (**self).current_size()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        (**self).read_range(start, length)
    }

    fn current_size(&self) -> Result<u64> {
        (**self).current_size()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Arc<S> {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        (**self).read_range(start, length)
    }

    fn current_size(&self) -> Result<u64> {
        (**self).current_size()
    }
}
