//! Bisection over byte offsets.
//!
//! Two engines share one contract: return the offset of the first record
//! that is not less than (`left`) or greater than (`right`) the target key.
//!
//! - [`variable`] works on delimiter-terminated lines of any length and
//!   bisects raw byte space, re-aligning every midpoint to a line start.
//! - [`fixed`] works on constant-size records and bisects record indices,
//!   so no boundary scanning is needed.
//!
//! Both re-read the source size at the start of every call unless `hi` is
//! pinned in [`SearchOptions`](crate::options::SearchOptions), which keeps
//! them correct against a file that is growing under a concurrent writer.

pub mod fixed;
pub mod variable;

pub use fixed::{bisect_seek_fixed_left, bisect_seek_fixed_right};
pub use variable::{bisect_seek_left, bisect_seek_right};

/// Which boundary of an equal-key run a search converges on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// First record with key >= target
    Left,
    /// First record with key > target
    Right,
}

impl Side {
    /// Whether a record with `key` lies before the boundary being sought
    pub(crate) fn is_before<K: Ord>(self, key: &K, target: &K) -> bool {
        match self {
            Side::Left => key < target,
            Side::Right => key <= target,
        }
    }
}
