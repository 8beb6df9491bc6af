//! # filebisect - Index-Free Search over Sorted Files
//!
//! Logarithmic-time lookup and range extraction over sorted, append-only
//! files: time-ordered logs, or files of fixed-size records. Offsets are
//! found by binary search over byte ranges instead of sequential scans or a
//! prebuilt index.
//!
//! ## Features
//!
//! - **Variable-length lines**: bisection in byte space with backward
//!   boundary resolution
//! - **Fixed-size records**: bisection in index space, one read per step
//! - **Range iteration**: one seek, then a lazy forward scan
//! - **Extents**: the exact byte span of a duplicate-key run
//! - **Growing files**: the size is re-read on every call, so searches stay
//!   correct while a writer appends
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`source`] - Byte source abstraction over files, maps and buffers
//! - [`key`] - Pluggable key extraction
//! - [`boundary`] - Line boundary resolution
//! - [`bisect`] - Variable and fixed bisection engines
//! - [`range`] - Range iteration
//! - [`extents`] - Equal-range lookup
//!
//! ## Sortedness
//!
//! Input must be sorted under the key in use. This is not checked (doing so
//! would cost the O(log n) bound); results on unsorted input are unspecified.
//!
//! ## Writers
//!
//! Concurrent writers must open the file append-only and emit every record
//! in a single write no larger than the platform's atomic write size, so a
//! reader never observes half a record.

// Core modules
pub mod error;
pub mod options;
pub mod source;

// Search engine
pub mod bisect;
pub mod boundary;
pub mod extents;
pub mod key;
pub mod range;

// CLI support
pub mod config;

pub use error::{BisectError, KeyError, Result};

pub use bisect::{
    bisect_seek_fixed_left, bisect_seek_fixed_right, bisect_seek_left, bisect_seek_right,
};
pub use extents::{extents, extents_fixed};
pub use key::{Field, Identity, IntegerField, RecordKey};
pub use options::{FixedLayout, SearchOptions};
pub use range::{
    iter_exclusive, iter_fixed_exclusive, iter_fixed_inclusive, iter_inclusive, RangeIter,
};
pub use source::{source_size, ByteSource, SourceFactory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
