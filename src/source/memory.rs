//! Growable in-memory byte source.

use crate::error::Result;
use crate::source::{clamp_range, ByteSource};
use parking_lot::RwLock;

/// In-memory buffer that can be appended to while searches run against it.
///
/// Behaves like an append-only file held in memory: readers take a shared
/// lock per read, [`append`](Self::append) takes the exclusive lock once per
/// record batch.
#[derive(Debug, Default)]
pub struct MemorySource {
    data: RwLock<Vec<u8>>,
}

impl MemorySource {
    /// Create a source over existing content
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Append `bytes` at the end in a single step
    pub fn append(&self, bytes: &[u8]) {
        self.data.write().extend_from_slice(bytes);
    }

    /// Current length in bytes
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the source, returning its content
    pub fn into_inner(self) -> Vec<u8> {
        self.data.into_inner()
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for MemorySource {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl ByteSource for MemorySource {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        let data = self.data.read();
        Ok(clamp_range(&data, start, length).to_vec())
    }

    fn current_size(&self) -> Result<u64> {
        Ok(self.data.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_grows_size() {
        let source = MemorySource::from(&b"a\nb\n"[..]);
        assert_eq!(source.current_size().unwrap(), 4);

        source.append(b"c\n");
        assert_eq!(source.current_size().unwrap(), 6);
        assert_eq!(source.read_range(4, 10).unwrap(), b"c\n");
        assert_eq!(source.into_inner(), b"a\nb\nc\n");
    }

    #[test]
    fn test_empty_source() {
        let source = MemorySource::default();
        assert!(source.is_empty());
        assert!(source.read_range(0, 8).unwrap().is_empty());
    }
}
