//! Key extraction strategies.
//!
//! The engines are generic over [`RecordKey`]: anything that maps the bytes
//! of one record to an ordered value. Raw byte order ([`Identity`]) is just
//! one strategy among others; closures work directly.
//!
//! Extractors must be deterministic, and the file must be sorted under the
//! key being used. Neither is checked.

use crate::error::{BisectError, KeyError, Result};
use bstr::{BString, ByteSlice};

/// Maps a record to its ordering key.
///
/// Variable-length lines are passed without their trailing delimiter. Fixed
/// records are passed verbatim.
pub trait RecordKey<K: Ord> {
    fn key(&self, record: &[u8]) -> std::result::Result<K, KeyError>;
}

impl<F, K> RecordKey<K> for F
where
    F: Fn(&[u8]) -> std::result::Result<K, KeyError>,
    K: Ord,
{
    fn key(&self, record: &[u8]) -> std::result::Result<K, KeyError> {
        self(record)
    }
}

/// Raw lexicographic byte order over the whole record
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl RecordKey<BString> for Identity {
    fn key(&self, record: &[u8]) -> std::result::Result<BString, KeyError> {
        Ok(BString::from(record))
    }
}

/// One separator-delimited field, compared as raw bytes
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Zero-based field index
    pub index: usize,
    pub separator: u8,
}

impl Field {
    pub fn new(index: usize, separator: u8) -> Self {
        Self { index, separator }
    }
}

impl RecordKey<BString> for Field {
    fn key(&self, record: &[u8]) -> std::result::Result<BString, KeyError> {
        nth_field(record, self.index, self.separator).map(BString::from)
    }
}

/// One separator-delimited field parsed as a signed integer
///
/// ASCII whitespace around the field is ignored, so zero-padded or
/// space-padded numbers in fixed records parse as expected.
#[derive(Debug, Clone, Copy)]
pub struct IntegerField {
    pub index: usize,
    pub separator: u8,
}

impl IntegerField {
    pub fn new(index: usize, separator: u8) -> Self {
        Self { index, separator }
    }
}

impl RecordKey<i64> for IntegerField {
    fn key(&self, record: &[u8]) -> std::result::Result<i64, KeyError> {
        let field = nth_field(record, self.index, self.separator)?;
        Ok(field.to_str()?.trim().parse::<i64>()?)
    }
}

fn nth_field(record: &[u8], index: usize, separator: u8) -> std::result::Result<&[u8], KeyError> {
    record
        .split(|&b| b == separator)
        .nth(index)
        .ok_or_else(|| format!("record has no field {index}: {:?}", record.as_bstr()).into())
}

/// Run `key` on the record at `offset`, attributing any failure to it.
pub(crate) fn extract<K, R>(key: &R, record: &[u8], offset: u64) -> Result<K>
where
    K: Ord,
    R: RecordKey<K> + ?Sized,
{
    key.key(record)
        .map_err(|source| BisectError::key_function(offset, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_raw_bytes() {
        let a = Identity.key(b"apple").unwrap();
        let b = Identity.key(b"banana").unwrap();
        assert!(a < b);
        assert_eq!(a, BString::from("apple"));
    }

    #[test]
    fn test_field_extraction() {
        let field = Field::new(1, b',');
        assert_eq!(field.key(b"x,yz,w").unwrap(), BString::from("yz"));
        assert!(field.key(b"only").is_err());
    }

    #[test]
    fn test_integer_field() {
        let leading = IntegerField::new(0, b' ');
        assert_eq!(leading.key(b"20 b").unwrap(), 20);
        assert_eq!(leading.key(b"0007").unwrap(), 7);
        assert!(leading.key(b"x b").is_err());
    }

    #[test]
    fn test_closure_key_and_failure_offset() {
        let len_key = |record: &[u8]| -> std::result::Result<usize, KeyError> {
            if record.is_empty() {
                return Err("empty record".into());
            }
            Ok(record.len())
        };

        assert_eq!(extract(&len_key, b"abc", 0).unwrap(), 3);
        match extract(&len_key, b"", 17) {
            Err(BisectError::KeyFunction { offset, source }) => {
                assert_eq!(offset, 17);
                assert_eq!(source.to_string(), "empty record");
            }
            other => panic!("Expected KeyFunction error, got {other:?}"),
        }
    }
}
