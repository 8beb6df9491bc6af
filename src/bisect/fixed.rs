//! Bisection over fixed-size records.
//!
//! Search runs over record indices: offset `base + i * recsize` is record
//! aligned by construction, so each step is exactly one read of `recsize`
//! bytes and the step count is `ceil(log2(records))`.

use crate::bisect::Side;
use crate::error::{BisectError, Result};
use crate::key::{extract, RecordKey};
use crate::options::{FixedLayout, SearchOptions};
use crate::source::ByteSource;

/// Offset of the first record whose key is `>= x`.
///
/// Records straddling `opts.lo` are skipped, and a partial record at the end
/// (an append still in progress) is excluded from the search. If every
/// record sorts below `x`, the offset just past the last whole record in
/// range is returned.
pub fn bisect_seek_fixed_left<S, K, R>(
    source: &S,
    x: &K,
    layout: &FixedLayout,
    key: &R,
    opts: &SearchOptions,
) -> Result<u64>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    bisect_records(source, x, layout, key, opts, Side::Left)
}

/// Offset of the first record whose key is `> x`.
pub fn bisect_seek_fixed_right<S, K, R>(
    source: &S,
    x: &K,
    layout: &FixedLayout,
    key: &R,
    opts: &SearchOptions,
) -> Result<u64>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    bisect_records(source, x, layout, key, opts, Side::Right)
}

fn bisect_records<S, K, R>(
    source: &S,
    x: &K,
    layout: &FixedLayout,
    key: &R,
    opts: &SearchOptions,
    side: Side,
) -> Result<u64>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let (lo, hi) = opts.resolve(source)?;
    let (mut lo_idx, mut hi_idx) = layout.index_range(lo, hi)?;
    log::debug!(
        "bisect records {side:?}: recsize={} base={} records {lo_idx}..{hi_idx}",
        layout.recsize,
        layout.base
    );

    while lo_idx < hi_idx {
        let mid = lo_idx + (hi_idx - lo_idx) / 2;
        let offset = layout.offset_of(mid);
        let record = read_record(source, offset, layout)?;
        let record_key = extract(key, &record, offset)?;

        if side.is_before(&record_key, x) {
            lo_idx = mid + 1;
        } else {
            hi_idx = mid;
        }
        log::trace!("mid={mid} offset={offset} -> records {lo_idx}..{hi_idx}");
    }

    Ok(layout.offset_of(lo_idx))
}

/// Read exactly one record at `offset`
pub(crate) fn read_record<S: ByteSource + ?Sized>(
    source: &S,
    offset: u64,
    layout: &FixedLayout,
) -> Result<Vec<u8>> {
    let recsize = record_len(layout)?;
    let record = source.read_range(offset, recsize)?;
    if record.len() < recsize {
        return Err(BisectError::source_io(
            format!("Record at offset {offset} is truncated"),
            std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        ));
    }
    Ok(record)
}

pub(crate) fn record_len(layout: &FixedLayout) -> Result<usize> {
    usize::try_from(layout.recsize)
        .map_err(|_| BisectError::invalid_argument("record size does not fit in memory"))
}
