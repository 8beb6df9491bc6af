//! Error types and handling infrastructure for filebisect.
//!
//! Every search operation reports failures through [`BisectError`]. Nothing is
//! retried or skipped inside the engine: a bad range, a key extractor that
//! rejects a record, or a failing read all surface to the caller unchanged.
//!
//! Unsorted input is not an error this module can express. Searching a file
//! that is not sorted under the supplied key yields unspecified offsets.

use thiserror::Error;

/// Error produced by a user-supplied key extractor.
///
/// Boxed so closures can use `?` on any error type they like.
pub type KeyError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for filebisect operations.
#[derive(Error, Debug)]
pub enum BisectError {
    /// Search bounds that do not satisfy `lo <= hi <= size`, or a fixed
    /// record layout that cannot address any record.
    #[error("Invalid search range: lo={lo}, hi={hi}, size={size:?}")]
    InvalidRange { lo: u64, hi: u64, size: Option<u64> },

    /// The key extractor failed on the record starting at `offset`
    #[error("Key function failed on record at offset {offset}")]
    KeyFunction {
        offset: u64,
        #[source]
        source: KeyError,
    },

    /// Underlying seek, read or metadata failure
    #[error("Source I/O failed: {message}")]
    SourceIo {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The source cannot report its size; pin `hi` explicitly
    #[error("Source size is unavailable; an explicit upper bound is required")]
    SizeUnavailable,

    /// Invalid configuration or command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Standard Result type for filebisect operations.
pub type Result<T> = std::result::Result<T, BisectError>;

impl BisectError {
    /// Create a SourceIo error from an io::Error with additional context
    pub fn source_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceIo {
            message: message.into(),
            source,
        }
    }

    /// Create an InvalidRange error
    pub fn invalid_range(lo: u64, hi: u64, size: Option<u64>) -> Self {
        Self::InvalidRange { lo, hi, size }
    }

    /// Wrap a key extractor failure for the record at `offset`
    pub fn key_function(offset: u64, source: KeyError) -> Self {
        Self::KeyFunction { offset, source }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for BisectError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::SourceIo {
                message: "Unexpected end of source".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::SourceIo {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::SourceIo {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display_messages() {
        let range = BisectError::invalid_range(10, 5, Some(20));
        assert_eq!(
            range.to_string(),
            "Invalid search range: lo=10, hi=5, size=Some(20)"
        );

        let unsized_source = BisectError::SizeUnavailable;
        assert_eq!(
            unsized_source.to_string(),
            "Source size is unavailable; an explicit upper bound is required"
        );
    }

    #[test]
    fn test_key_function_error_keeps_source() {
        let parse_err = "abc".parse::<i64>().unwrap_err();
        let err = BisectError::key_function(42, Box::new(parse_err));

        assert_eq!(err.to_string(), "Key function failed on record at offset 42");
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "invalid digit found in string");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: BisectError = io_err.into();

        match err {
            BisectError::SourceIo { message, .. } => {
                assert_eq!(message, "Permission denied");
            }
            _ => panic!("Expected SourceIo variant"),
        }
    }
}
