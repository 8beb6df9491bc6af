//! Range iteration: one bisection, then a forward scan.
//!
//! Each iterator seeks once with the left bisection for `x` and then reads
//! records sequentially until one sorts past `y`. Nothing is bisected while
//! iterating, and records are yielded one at a time so arbitrarily large
//! ranges never need to be held in memory.

use crate::bisect::fixed::record_len;
use crate::bisect::{bisect_seek_fixed_left, bisect_seek_left};
use crate::error::Result;
use crate::key::{extract, RecordKey};
use crate::options::{FixedLayout, SearchOptions};
use crate::source::ByteSource;
use memchr::memchr;
use std::iter::FusedIterator;

/// Lines with `x <= key < y`.
pub fn iter_exclusive<'a, S, K, R>(
    source: &'a S,
    x: &K,
    y: &'a K,
    key: &'a R,
    opts: &SearchOptions,
) -> Result<RangeIter<'a, S, K, R>>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let start = bisect_seek_left(source, x, key, opts)?;
    Ok(RangeIter::new(source, key, y, false, Framing::lines(opts), start, opts))
}

/// Lines with `x <= key <= y`.
pub fn iter_inclusive<'a, S, K, R>(
    source: &'a S,
    x: &K,
    y: &'a K,
    key: &'a R,
    opts: &SearchOptions,
) -> Result<RangeIter<'a, S, K, R>>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let start = bisect_seek_left(source, x, key, opts)?;
    Ok(RangeIter::new(source, key, y, true, Framing::lines(opts), start, opts))
}

/// Fixed records with `x <= key < y`.
pub fn iter_fixed_exclusive<'a, S, K, R>(
    source: &'a S,
    x: &K,
    y: &'a K,
    layout: &FixedLayout,
    key: &'a R,
    opts: &SearchOptions,
) -> Result<RangeIter<'a, S, K, R>>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let start = bisect_seek_fixed_left(source, x, layout, key, opts)?;
    let framing = Framing::Fixed {
        recsize: record_len(layout)?,
    };
    Ok(RangeIter::new(source, key, y, false, framing, start, opts))
}

/// Fixed records with `x <= key <= y`.
pub fn iter_fixed_inclusive<'a, S, K, R>(
    source: &'a S,
    x: &K,
    y: &'a K,
    layout: &FixedLayout,
    key: &'a R,
    opts: &SearchOptions,
) -> Result<RangeIter<'a, S, K, R>>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    let start = bisect_seek_fixed_left(source, x, layout, key, opts)?;
    let framing = Framing::Fixed {
        recsize: record_len(layout)?,
    };
    Ok(RangeIter::new(source, key, y, true, framing, start, opts))
}

#[derive(Debug, Clone, Copy)]
enum Framing {
    Lines { delimiter: u8 },
    Fixed { recsize: usize },
}

impl Framing {
    fn lines(opts: &SearchOptions) -> Self {
        Framing::Lines {
            delimiter: opts.delimiter,
        }
    }
}

/// Forward-only iterator over the records of a key range.
///
/// Yields each record's raw bytes (lines keep their delimiter). The first
/// error ends the iteration. With `hi` unset the scan follows the source as
/// it grows; with `hi` pinned it stops at the first record that does not end
/// at or before `hi`.
pub struct RangeIter<'a, S: ?Sized, K, R: ?Sized> {
    source: &'a S,
    key: &'a R,
    upper: &'a K,
    inclusive: bool,
    framing: Framing,
    hi: Option<u64>,
    chunk_size: usize,

    /// Offset of `pending[consumed]`
    pos: u64,
    /// Bytes read ahead; `pending[..consumed]` has already been yielded
    pending: Vec<u8>,
    consumed: usize,
    done: bool,
}

impl<'a, S, K, R> RangeIter<'a, S, K, R>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    fn new(
        source: &'a S,
        key: &'a R,
        upper: &'a K,
        inclusive: bool,
        framing: Framing,
        start: u64,
        opts: &SearchOptions,
    ) -> Self {
        Self {
            source,
            key,
            upper,
            inclusive,
            framing,
            hi: opts.hi,
            chunk_size: opts.chunk_size.max(1),
            pos: start,
            pending: Vec::new(),
            consumed: 0,
            done: false,
        }
    }

    /// Offset of the next record to be examined
    pub fn offset(&self) -> u64 {
        self.pos
    }

    fn unread(&self) -> &[u8] {
        &self.pending[self.consumed..]
    }

    /// Read more bytes after the unread ones; returns false at end of data
    fn fill(&mut self, want: usize) -> Result<bool> {
        if self.consumed > 0 {
            self.pending.drain(..self.consumed);
            self.consumed = 0;
        }

        let from = self.pos + self.pending.len() as u64;
        let chunk = self.source.read_range(from, want.max(self.chunk_size))?;
        if chunk.is_empty() {
            return Ok(false);
        }
        self.pending.extend_from_slice(&chunk);
        Ok(true)
    }

    /// Length of the next complete record, reading as needed
    fn next_record_len(&mut self) -> Result<Option<usize>> {
        match self.framing {
            Framing::Lines { delimiter } => {
                let mut scanned = 0;
                loop {
                    if let Some(i) = memchr(delimiter, &self.unread()[scanned..]) {
                        return Ok(Some(scanned + i + 1));
                    }
                    scanned = self.unread().len();
                    if !self.fill(0)? {
                        // An unterminated final line is still a line
                        return Ok((scanned > 0).then_some(scanned));
                    }
                }
            }
            Framing::Fixed { recsize } => {
                while self.unread().len() < recsize {
                    if !self.fill(recsize - self.unread().len())? {
                        return Ok(None);
                    }
                }
                Ok(Some(recsize))
            }
        }
    }

    fn advance(&mut self) -> Result<Option<Vec<u8>>> {
        if self.hi.is_some_and(|hi| self.pos >= hi) {
            return Ok(None);
        }

        let Some(len) = self.next_record_len()? else {
            return Ok(None);
        };
        if self.hi.is_some_and(|hi| self.pos + len as u64 > hi) {
            return Ok(None);
        }

        let record = &self.unread()[..len];
        let content = match self.framing {
            Framing::Lines { delimiter } if record.last() == Some(&delimiter) => {
                &record[..len - 1]
            }
            _ => record,
        };

        let record_key = extract(self.key, content, self.pos)?;
        let past_end = if self.inclusive {
            record_key > *self.upper
        } else {
            record_key >= *self.upper
        };
        if past_end {
            return Ok(None);
        }

        let record = self.unread()[..len].to_vec();
        self.consumed += len;
        self.pos += len as u64;
        Ok(Some(record))
    }
}

impl<'a, S, K, R> Iterator for RangeIter<'a, S, K, R>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a, S, K, R> FusedIterator for RangeIter<'a, S, K, R>
where
    S: ByteSource + ?Sized,
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
}
