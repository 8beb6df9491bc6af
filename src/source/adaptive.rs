//! Adaptive byte source that dispatches to a file handle or a memory map
//!
//! The strategy is chosen once by [`SourceFactory`](crate::source::SourceFactory);
//! the bisection engines see a single [`ByteSource`] either way.

use crate::error::Result;
use crate::source::{ByteSource, FileSource, MmapSource};

/// Access strategy for opening a sorted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStrategy {
    /// Pick by file size and type
    Auto,
    /// Seek-and-read through a file handle
    Seek,
    /// Memory-mapped access
    MemoryMapped,
}

/// Internal byte source strategy chosen by the factory
#[derive(Debug)]
pub enum AdaptiveSource {
    /// Seek + read through a file handle (small files, devices)
    File(FileSource),
    /// Memory-mapped access (large regular files)
    Mapped(MmapSource),
}

impl AdaptiveSource {
    /// The concrete strategy in use
    pub fn strategy(&self) -> AccessStrategy {
        match self {
            AdaptiveSource::File(_) => AccessStrategy::Seek,
            AdaptiveSource::Mapped(_) => AccessStrategy::MemoryMapped,
        }
    }
}

impl ByteSource for AdaptiveSource {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        match self {
            AdaptiveSource::File(source) => source.read_range(start, length),
            AdaptiveSource::Mapped(source) => source.read_range(start, length),
        }
    }

    fn current_size(&self) -> Result<u64> {
        match self {
            AdaptiveSource::File(source) => source.current_size(),
            AdaptiveSource::Mapped(source) => source.current_size(),
        }
    }
}
