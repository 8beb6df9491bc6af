//! Memory-mapped byte source for large files
//!
//! The mapping is refreshed lazily: whenever a size query or a read reaches
//! past the mapped length, the file length is checked again and the file is
//! re-mapped if it has grown. Reads never block on I/O syscalls otherwise.

use crate::error::{BisectError, Result};
use crate::source::{clamp_range, ByteSource};
use memmap2::Mmap;
use parking_lot::RwLock;
use std::fs::File;
use std::path::Path;

/// Memory-mapped view of an append-only file.
///
/// The file must only ever grow. Truncating a mapped file while it is being
/// read is undefined at the OS level (`SIGBUS` on most platforms).
#[derive(Debug)]
pub struct MmapSource {
    file: File,

    /// Current mapping, replaced when the file grows
    map: RwLock<Mmap>,
}

impl MmapSource {
    /// Open and map `path`
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            BisectError::source_io(format!("Failed to open file: {}", path.display()), e)
        })?;
        Self::from_file(file)
    }

    /// Map an already open handle
    pub fn from_file(file: File) -> Result<Self> {
        let map = Self::map(&file)?;
        Ok(Self {
            file,
            map: RwLock::new(map),
        })
    }

    /// Length currently covered by the mapping
    pub fn mapped_len(&self) -> u64 {
        self.map.read().len() as u64
    }

    fn map(file: &File) -> Result<Mmap> {
        // SAFETY: the mapping is read-only and callers uphold the append-only
        // contract documented on `MmapSource`, so mapped pages stay valid.
        unsafe { Mmap::map(file) }
            .map_err(|e| BisectError::source_io("Failed to memory map file", e))
    }

    /// Re-map if the file on disk is longer than the mapping
    fn refresh(&self) -> Result<u64> {
        let on_disk = self
            .file
            .metadata()
            .map_err(|e| BisectError::source_io("Failed to read file metadata", e))?
            .len();

        if on_disk > self.mapped_len() {
            let mut map = self.map.write();
            if on_disk > map.len() as u64 {
                log::trace!("remapping file: {} -> {} bytes", map.len(), on_disk);
                *map = Self::map(&self.file)?;
            }
        }

        Ok(self.mapped_len())
    }
}

impl ByteSource for MmapSource {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        let wanted_end = start.saturating_add(length as u64);
        if wanted_end > self.mapped_len() {
            self.refresh()?;
        }

        let map = self.map.read();
        Ok(clamp_range(&map, start, length).to_vec())
    }

    fn current_size(&self) -> Result<u64> {
        self.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write test content");
        file.flush().expect("Failed to flush test file");
        file
    }

    #[test]
    fn test_mmap_reads() {
        let temp = create_test_file(b"0001000300030007");
        let source = MmapSource::open(temp.path()).unwrap();

        assert_eq!(source.current_size().unwrap(), 16);
        assert_eq!(source.read_range(4, 4).unwrap(), b"0003");
        assert_eq!(source.read_range(14, 4).unwrap(), b"07");
    }

    #[test]
    fn test_mmap_remaps_after_growth() {
        let mut temp = create_test_file(b"a\n");
        let source = MmapSource::open(temp.path()).unwrap();
        assert_eq!(source.mapped_len(), 2);

        temp.write_all(b"b\nc\n").unwrap();
        temp.flush().unwrap();

        // A read past the mapped end picks up the new content
        assert_eq!(source.read_range(2, 4).unwrap(), b"b\nc\n");
        assert_eq!(source.current_size().unwrap(), 6);
    }

    #[test]
    fn test_mmap_empty_file() {
        let temp = create_test_file(b"");
        let source = MmapSource::open(temp.path()).unwrap();
        assert_eq!(source.current_size().unwrap(), 0);
        assert!(source.read_range(0, 16).unwrap().is_empty());
    }
}
