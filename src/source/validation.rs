//! Path validation before a source is opened.

use crate::error::{BisectError, Result};
use std::path::Path;

/// Validate that a path can back a byte source
///
/// # Validations Performed
/// - Path exists
/// - Path is not a directory
///
/// Empty files are accepted: every search over them returns offset 0.
/// Devices are accepted as well; whether their size is known is decided
/// when the source is queried.
pub fn validate_source_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(BisectError::source_io(
            format!("File does not exist: {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        ));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| BisectError::source_io("Failed to read file metadata", e))?;

    if metadata.is_dir() {
        return Err(BisectError::source_io(
            format!("Path is a directory: {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Is a directory"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_validate_valid_and_empty_file() {
        let empty = NamedTempFile::new().expect("Failed to create temp file");
        assert!(validate_source_path(empty.path()).is_ok());
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let result = validate_source_path(Path::new("/this/file/does/not/exist.log"));
        match result.unwrap_err() {
            BisectError::SourceIo { message, .. } => {
                assert!(message.contains("File does not exist"));
            }
            _ => panic!("Expected SourceIo for non-existent file"),
        }
    }

    #[test]
    fn test_validate_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        match validate_source_path(temp_dir.path()).unwrap_err() {
            BisectError::SourceIo { message, .. } => {
                assert!(message.contains("Path is a directory"));
            }
            _ => panic!("Expected SourceIo for directory"),
        }
    }
}
