//! Seek-and-read byte source over an open file handle.
//!
//! Reads are issued as `seek` + `read` against a single cursor guarded by a
//! mutex. Independent searches that must not contend on that cursor should
//! each open their own [`FileSource`] onto the same path.

use crate::error::{BisectError, Result};
use crate::source::ByteSource;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Byte source reading through a regular file or device handle
#[derive(Debug)]
pub struct FileSource {
    file: Mutex<File>,
    path: Option<PathBuf>,
}

impl FileSource {
    /// Open `path` read-only
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            BisectError::source_io(format!("Failed to open file: {}", path.display()), e)
        })?;

        Ok(Self {
            file: Mutex::new(file),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already open handle
    pub fn from_file(file: File) -> Self {
        Self {
            file: Mutex::new(file),
            path: None,
        }
    }

    /// Path this source was opened from, if known
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ByteSource for FileSource {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(start)).map_err(|e| {
            BisectError::source_io(format!("Failed to seek to offset {start}"), e)
        })?;

        let mut buf = Vec::with_capacity(length);
        (&mut *file)
            .take(length as u64)
            .read_to_end(&mut buf)
            .map_err(|e| BisectError::source_io(format!("Failed to read at offset {start}"), e))?;

        Ok(buf)
    }

    fn current_size(&self) -> Result<u64> {
        let mut file = self.file.lock();
        let metadata = file
            .metadata()
            .map_err(|e| BisectError::source_io("Failed to read file metadata", e))?;

        if metadata.is_file() {
            return Ok(metadata.len());
        }

        // Block devices expose their size through the seekable end. Character
        // devices and pipes either fail here or claim an end of zero.
        match file.seek(SeekFrom::End(0)) {
            Ok(end) if end > 0 => Ok(end),
            _ => Err(BisectError::SizeUnavailable),
        }
    }
}
