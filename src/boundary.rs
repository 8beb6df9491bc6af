//! Line boundary discovery over a byte source.
//!
//! All scans read `chunk_size` bytes per step and use `memchr` to find the
//! delimiter, so the cost depends on line length, never on file size.

use crate::error::Result;
use crate::options::SearchOptions;
use crate::source::ByteSource;
use memchr::{memchr, memrchr};

/// One line read from a source, delimiter included when present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Offset of the first byte of the line
    pub start: u64,
    pub bytes: Vec<u8>,
}

impl Line {
    /// Offset just past the line (start of the next one)
    pub fn end(&self) -> u64 {
        self.start + self.bytes.len() as u64
    }

    /// Line content without its trailing delimiter
    pub fn content(&self, delimiter: u8) -> &[u8] {
        match self.bytes.split_last() {
            Some((&last, rest)) if last == delimiter => rest,
            _ => &self.bytes,
        }
    }
}

/// Offset of the first byte of the line containing `p`.
///
/// If the byte before `p` is a delimiter, `p` is returned unchanged. At the
/// end of a file that ends with a delimiter this is the end itself.
pub fn line_start<S: ByteSource + ?Sized>(
    source: &S,
    p: u64,
    opts: &SearchOptions,
) -> Result<u64> {
    line_start_above(source, p, 0, opts)
}

/// Like [`line_start`], but never scans below `floor`.
///
/// `floor` must itself be a line start; it is returned when no delimiter is
/// found in `[floor, p)`.
pub(crate) fn line_start_above<S: ByteSource + ?Sized>(
    source: &S,
    p: u64,
    floor: u64,
    opts: &SearchOptions,
) -> Result<u64> {
    let mut end = p;
    while end > floor {
        let start = end.saturating_sub(opts.chunk_size as u64).max(floor);
        let chunk = source.read_range(start, (end - start) as usize)?;
        if let Some(i) = memrchr(opts.delimiter, &chunk) {
            return Ok(start + i as u64 + 1);
        }
        end = start;
    }
    Ok(floor)
}

/// Offset just past the first delimiter at or after `p`, or the end of the
/// data if no delimiter follows.
pub fn next_line_start<S: ByteSource + ?Sized>(
    source: &S,
    p: u64,
    opts: &SearchOptions,
) -> Result<u64> {
    let mut pos = p;
    loop {
        let chunk = source.read_range(pos, opts.chunk_size)?;
        if chunk.is_empty() {
            return Ok(pos);
        }
        if let Some(i) = memchr(opts.delimiter, &chunk) {
            return Ok(pos + i as u64 + 1);
        }
        pos += chunk.len() as u64;
    }
}

/// Read the line beginning at `start`.
pub fn read_line<S: ByteSource + ?Sized>(
    source: &S,
    start: u64,
    opts: &SearchOptions,
) -> Result<Line> {
    let mut bytes = Vec::new();
    let mut pos = start;
    loop {
        let chunk = source.read_range(pos, opts.chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        if let Some(i) = memchr(opts.delimiter, &chunk) {
            bytes.extend_from_slice(&chunk[..=i]);
            break;
        }
        pos += chunk.len() as u64;
        bytes.extend_from_slice(&chunk);
    }
    Ok(Line { start, bytes })
}

/// Read the whole line containing `p`, scanning back no further than `floor`.
///
/// The bytes read during the backward scan are reused as the head of the
/// line, so the forward read starts at `p` instead of at the line start.
pub(crate) fn line_around<S: ByteSource + ?Sized>(
    source: &S,
    p: u64,
    floor: u64,
    opts: &SearchOptions,
) -> Result<Line> {
    let mut head = Vec::new();
    let mut end = p;
    let mut start = floor;

    while end > floor {
        let from = end.saturating_sub(opts.chunk_size as u64).max(floor);
        let mut chunk = source.read_range(from, (end - from) as usize)?;
        match memrchr(opts.delimiter, &chunk) {
            Some(i) => {
                chunk.drain(..=i);
                chunk.extend_from_slice(&head);
                head = chunk;
                start = from + i as u64 + 1;
                break;
            }
            None => {
                chunk.extend_from_slice(&head);
                head = chunk;
                end = from;
            }
        }
    }

    let tail = read_line(source, p, opts)?;
    head.extend_from_slice(&tail.bytes);
    Ok(Line { start, bytes: head })
}
