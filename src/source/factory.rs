//! Factory for opening sorted files as byte sources.

use crate::error::{BisectError, Result};
use crate::source::adaptive::{AccessStrategy, AdaptiveSource};
use crate::source::validation::validate_source_path;
use crate::source::{FileSource, MmapSource};
use std::path::Path;

/// Factory for creating [`AdaptiveSource`] instances
///
/// # Strategy Selection
/// - Regular files < 50MB: seek + read (`AdaptiveSource::File`)
/// - Regular files ≥ 50MB: memory mapping (`AdaptiveSource::Mapped`)
/// - Devices and other special files: always seek + read
pub struct SourceFactory;

impl SourceFactory {
    /// Size at which regular files switch to memory mapping
    const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024; // 50MB

    /// Open `path` with the strategy suited to its size and type
    pub fn open(path: &Path) -> Result<AdaptiveSource> {
        Self::open_with_strategy(path, AccessStrategy::Auto)
    }

    /// Open `path` with an explicit strategy
    ///
    /// # Errors
    /// * Validation errors (missing path, directory)
    /// * `InvalidArgument` when mapping is forced on a non-regular file
    /// * Open or mapping failures
    pub fn open_with_strategy(path: &Path, strategy: AccessStrategy) -> Result<AdaptiveSource> {
        validate_source_path(path)?;

        let metadata = std::fs::metadata(path)
            .map_err(|e| BisectError::source_io("Failed to read file metadata", e))?;

        let strategy = match strategy {
            AccessStrategy::Auto if metadata.is_file() && metadata.len() >= Self::MMAP_THRESHOLD => {
                AccessStrategy::MemoryMapped
            }
            AccessStrategy::Auto => AccessStrategy::Seek,
            AccessStrategy::MemoryMapped if !metadata.is_file() => {
                return Err(BisectError::invalid_argument(format!(
                    "Cannot memory map a non-regular file: {}",
                    path.display()
                )));
            }
            explicit => explicit,
        };

        log::debug!("opening {} with {:?} strategy", path.display(), strategy);

        match strategy {
            AccessStrategy::MemoryMapped => Ok(AdaptiveSource::Mapped(MmapSource::open(path)?)),
            _ => Ok(AdaptiveSource::File(FileSource::open(path)?)),
        }
    }
}
