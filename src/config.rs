//! Defaults for the `fbisect` command line.
//!
//! With the `config` feature enabled, defaults are read from
//! `<config_dir>/filebisect/config.toml`:
//!
//! ```toml
//! delimiter = "\n"
//! field_separator = " "
//! chunk_size = 4096
//! ```
//!
//! Missing keys and a missing file fall back to [`Config::default`].

use crate::error::{BisectError, Result};
use crate::options::{SearchOptions, DEFAULT_CHUNK_SIZE};

/// CLI defaults
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Config {
    /// Line delimiter, a single ASCII character
    pub delimiter: char,
    /// Separator between key fields, a single ASCII character
    pub field_separator: char,
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: '\n',
            field_separator: ' ',
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Line delimiter as a byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        ascii_byte(self.delimiter, "delimiter")
    }

    /// Field separator as a byte
    pub fn separator_byte(&self) -> Result<u8> {
        ascii_byte(self.field_separator, "field_separator")
    }

    /// Search options carrying these defaults
    pub fn search_options(&self) -> Result<SearchOptions> {
        Ok(SearchOptions::new()
            .with_delimiter(self.delimiter_byte()?)
            .with_chunk_size(self.chunk_size))
    }

    /// Load from the per-user config file
    #[cfg(feature = "config")]
    pub fn load() -> Result<Self> {
        match dirs::config_dir() {
            Some(dir) => Self::load_from(&dir.join("filebisect").join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file yields the defaults
    #[cfg(feature = "config")]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(BisectError::source_io(
                    format!("Failed to read config file: {}", path.display()),
                    e,
                ))
            }
        };

        let config: Self = toml::from_str(&text).map_err(|e| {
            BisectError::invalid_argument(format!("Invalid config file {}: {e}", path.display()))
        })?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(BisectError::invalid_argument(format!(
            "{what} must be a single ASCII character, got {c:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Config::default().search_options().unwrap();
        assert_eq!(opts, SearchOptions::default());
    }

    #[test]
    fn test_non_ascii_rejected() {
        let config = Config {
            delimiter: '§',
            ..Config::default()
        };
        assert!(config.delimiter_byte().is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_partial_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "field_separator = \",\"").unwrap();
        writeln!(file, "chunk_size = 512").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.field_separator, ',');
        assert_eq!(config.chunk_size, 512);
        assert_eq!(config.delimiter, '\n');
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(std::path::Path::new("/no/such/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
