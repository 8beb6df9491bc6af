//! Bisection over variable-length, delimiter-terminated lines.

use crate::bisect::Side;
use crate::boundary::{line_around, next_line_start};
use crate::error::Result;
use crate::key::{extract, RecordKey};
use crate::options::SearchOptions;
use crate::source::ByteSource;

/// Offset of the first line whose key is `>= x`.
///
/// Only whole lines lying in `[opts.lo, hi)` are considered: a line that
/// straddles `hi`, or a pinned `hi` past the end of the data, counts as out
/// of range. If every considered line sorts below `x`, the result is the
/// offset just past the last of them.
///
/// # Errors
/// * `InvalidRange` if `lo > hi` or `hi` lies past the end of the source
/// * `KeyFunction` if `key` rejects a line it was asked to compare
/// * `SourceIo` on read failures
pub fn bisect_seek_left<S, K, R>(source: &S, x: &K, key: &R, opts: &SearchOptions) -> Result<u64>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    bisect_lines(source, x, key, opts, Side::Left)
}

/// Offset of the first line whose key is `> x`.
///
/// Same bounds and errors as [`bisect_seek_left`].
pub fn bisect_seek_right<S, K, R>(
    source: &S,
    x: &K,
    key: &R,
    opts: &SearchOptions,
) -> Result<u64>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    bisect_lines(source, x, key, opts, Side::Right)
}

fn bisect_lines<S, K, R>(source: &S, x: &K, key: &R, opts: &SearchOptions, side: Side) -> Result<u64>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let (lo, hi) = opts.resolve(source)?;
    let mut lo = align_lo(source, lo, hi, opts)?;
    let mut hi = hi;
    log::debug!("bisect lines {side:?}: lo={lo} hi={hi}");

    // Invariant: `lo` is a line start (or `hi`) and every line before it
    // sorts before the boundary; `hi` is a line start (or the caller's bound)
    // and no line at or after it does.
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let line = line_around(source, mid, lo, opts)?;

        // Data ends before `hi`, or the line runs past it
        if line.bytes.is_empty() || line.end() > hi {
            hi = line.start;
            log::trace!("mid={mid} line={}..{} out of range -> hi={hi}", line.start, line.end());
            continue;
        }

        let line_key = extract(key, line.content(opts.delimiter), line.start)?;
        if side.is_before(&line_key, x) {
            lo = line.end();
        } else {
            hi = line.start;
        }
        log::trace!("mid={mid} line={}..{} -> lo={lo} hi={hi}", line.start, line.end());
    }

    Ok(lo)
}

/// First line start at or after `lo`.
///
/// A line that starts exactly at `lo` is kept, which is why the scan starts
/// one byte earlier.
fn align_lo<S: ByteSource + ?Sized>(
    source: &S,
    lo: u64,
    hi: u64,
    opts: &SearchOptions,
) -> Result<u64> {
    if lo == 0 || lo >= hi {
        return Ok(lo);
    }
    Ok(next_line_start(source, lo - 1, opts)?.min(hi))
}
