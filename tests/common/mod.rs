//! Shared helpers for integration tests.
#![allow(dead_code)]

use filebisect::{BisectError, ByteSource, IntegerField, Result};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

/// Byte source wrapper that counts `read_range` calls
pub struct CountingSource<S> {
    inner: S,
    reads: AtomicUsize,
}

impl<S: ByteSource> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.reads.store(0, Ordering::Relaxed);
    }
}

impl<S: ByteSource> ByteSource for CountingSource<S> {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.inner.read_range(start, length)
    }

    fn current_size(&self) -> Result<u64> {
        self.inner.current_size()
    }
}

/// Byte source that cannot report its size, like a pipe
pub struct NoSize<S>(pub S);

impl<S: ByteSource> ByteSource for NoSize<S> {
    fn read_range(&self, start: u64, length: usize) -> Result<Vec<u8>> {
        self.0.read_range(start, length)
    }

    fn current_size(&self) -> Result<u64> {
        Err(BisectError::SizeUnavailable)
    }
}

/// Create a temp file holding `content`
pub fn create_test_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write test content");
    file.flush().expect("Failed to flush test file");
    file
}

/// Key on the leading space-separated integer
pub fn leading_int() -> IntegerField {
    IntegerField::new(0, b' ')
}

/// `"{key} {padding}\n"` lines for each `(key, padding)` pair
pub fn render_lines(records: &[(i64, usize)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(key, pad) in records {
        data.extend_from_slice(format!("{key} {}\n", "p".repeat(pad)).as_bytes());
    }
    data
}

/// Start offset of every line in `data`, plus its parsed leading key
pub fn line_table(data: &[u8]) -> Vec<(u64, i64)> {
    let mut offset = 0u64;
    let mut table = Vec::new();
    for line in data.split_inclusive(|&b| b == b'\n') {
        let text = std::str::from_utf8(line).unwrap();
        let key = text.split(' ').next().unwrap().trim().parse().unwrap();
        table.push((offset, key));
        offset += line.len() as u64;
    }
    table
}

/// Linear-scan reference: first line with key >= x (or > x when `right`)
pub fn linear_bound(table: &[(u64, i64)], end: u64, x: i64, right: bool) -> u64 {
    table
        .iter()
        .find(|&&(_, key)| if right { key > x } else { key >= x })
        .map(|&(offset, _)| offset)
        .unwrap_or(end)
}
