//! Equal-range lookup: the byte span holding every record equal to a key.

use crate::bisect::{
    bisect_seek_fixed_left, bisect_seek_fixed_right, bisect_seek_left, bisect_seek_right,
};
use crate::error::Result;
use crate::key::RecordKey;
use crate::options::{FixedLayout, SearchOptions};
use crate::source::ByteSource;
use std::ops::Range;

/// Byte span `[L, R)` of all lines whose key equals `x`.
///
/// Both searches run against one upper bound fixed at call time, and the
/// right search starts from the left result, so the span is consistent even
/// while a writer appends. An absent key gives an empty span at its
/// insertion point.
pub fn extents<S, K, R>(source: &S, x: &K, key: &R, opts: &SearchOptions) -> Result<Range<u64>>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let (_, hi) = opts.resolve(source)?;
    let pinned = opts.with_hi(hi);

    let start = bisect_seek_left(source, x, key, &pinned)?;
    let end = bisect_seek_right(source, x, key, &pinned.with_lo(start))?;
    Ok(start..end)
}

/// Byte span `[L, R)` of all fixed records whose key equals `x`.
pub fn extents_fixed<S, K, R>(
    source: &S,
    x: &K,
    layout: &FixedLayout,
    key: &R,
    opts: &SearchOptions,
) -> Result<Range<u64>>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let (_, hi) = opts.resolve(source)?;
    let pinned = opts.with_hi(hi);

    let start = bisect_seek_fixed_left(source, x, layout, key, &pinned)?;
    let end = bisect_seek_fixed_right(source, x, layout, key, &pinned.with_lo(start))?;
    Ok(start..end)
}
