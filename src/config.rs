//! Configuration management for convert-crlf.
//!
//! This module provides the [`Config`] struct which controls encoding
//! detection and how the converted file is written back.
//! Configuration can be loaded from:
//! - An explicit TOML file (`--config <FILE>`)
//! - CLI arguments (which override file settings)
//!
//! Nothing is auto-discovered and no environment variables are read.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::encoding::{is_valid_fallback, SniffingDetector};

// Serde default functions
fn default_fallback_encoding() -> String {
    "Shift_JIS".to_string()
}
fn default_true() -> bool {
    true
}

/// How the normalized content replaces the original file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Write a sibling temporary file, then rename it over the original
    #[default]
    Atomic,
    /// Truncate the original and write into it
    Truncate,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atomic" => Ok(WriteMode::Atomic),
            "truncate" => Ok(WriteMode::Truncate),
            other => Err(format!(
                "unknown write mode '{other}' (expected 'atomic' or 'truncate')"
            )),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Atomic => f.write_str("atomic"),
            WriteMode::Truncate => f.write_str("truncate"),
        }
    }
}

/// Main configuration struct for convert-crlf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Legacy encoding used when the content is neither Unicode nor
    /// recognized by the statistical guess (default: `Shift_JIS`)
    #[serde(default = "default_fallback_encoding")]
    pub fallback_encoding: String,

    /// Try a statistical guess before the fallback (default: true)
    #[serde(default = "default_true")]
    pub guess: bool,

    /// How the file is written back (default: atomic)
    #[serde(default)]
    pub write_mode: WriteMode,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub fallback_encoding: Option<String>,
    pub guess: Option<bool>,
    pub write_mode: Option<WriteMode>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fallback_encoding: default_fallback_encoding(),
            guess: true,
            write_mode: WriteMode::Atomic,
        }
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        match Encoding::for_label(self.fallback_encoding.trim().as_bytes()) {
            None => Some(format!(
                "unknown fallback encoding '{}'",
                self.fallback_encoding
            )),
            Some(encoding) if !is_valid_fallback(encoding) => Some(format!(
                "fallback encoding '{}' must be an ASCII-compatible legacy encoding",
                self.fallback_encoding
            )),
            Some(_) => None,
        }
    }

    /// Resolve the fallback label to an encoding
    pub fn fallback(&self) -> anyhow::Result<&'static Encoding> {
        if let Some(error) = self.validate() {
            anyhow::bail!("Invalid configuration: {error}");
        }
        Encoding::for_label(self.fallback_encoding.trim().as_bytes())
            .ok_or_else(|| anyhow::anyhow!("unknown fallback encoding"))
    }

    /// Build the detector described by this configuration
    pub fn detector(&self) -> anyhow::Result<SniffingDetector> {
        Ok(SniffingDetector::new(self.fallback()?, self.guess))
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text, keeping defaults for missing keys
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let partial: PartialConfig = toml::from_str(contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = &partial.fallback_encoding {
            self.fallback_encoding.clone_from(v);
        }
        if let Some(v) = partial.guess {
            self.guess = v;
        }
        if let Some(v) = partial.write_mode {
            self.write_mode = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fallback_encoding, "Shift_JIS");
        assert!(config.guess);
        assert_eq!(config.write_mode, WriteMode::Atomic);
        assert!(config.validate().is_none());
    }

    #[test]
    fn test_config_apply_partial() {
        let mut base = Config::default();

        let partial = PartialConfig {
            write_mode: Some(WriteMode::Truncate),
            ..Default::default()
        };

        base.apply_partial(&partial);
        assert_eq!(base.write_mode, WriteMode::Truncate);
        // Other fields should remain at defaults
        assert_eq!(base.fallback_encoding, "Shift_JIS");
        assert!(base.guess);
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            "fallback_encoding = \"windows-1252\"\nguess = false\nwrite_mode = \"truncate\"\n",
        )
        .unwrap();
        assert_eq!(config.fallback_encoding, "windows-1252");
        assert!(!config.guess);
        assert_eq!(config.write_mode, WriteMode::Truncate);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_keys() {
        assert!(Config::from_toml_str("indent = 4\n").is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("convert-crlf.toml");
        std::fs::write(&path, "guess = false\n").unwrap();
        let config = Config::from_toml_file(&path).unwrap();
        assert!(!config.guess);
        assert_eq!(config.fallback_encoding, "Shift_JIS");
    }

    #[test]
    fn test_validate_unknown_label() {
        let config = Config {
            fallback_encoding: "klingon".to_string(),
            ..Config::default()
        };
        assert!(config.validate().unwrap().contains("klingon"));
        assert!(config.fallback().is_err());
    }

    #[test]
    fn test_validate_rejects_utf16_fallback() {
        let config = Config {
            fallback_encoding: "utf-16le".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_some());
    }

    #[test]
    fn test_fallback_label_aliases() {
        let config = Config {
            fallback_encoding: "latin1".to_string(),
            ..Config::default()
        };
        assert_eq!(config.fallback().unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_write_mode_parse() {
        assert_eq!("Atomic".parse::<WriteMode>(), Ok(WriteMode::Atomic));
        assert_eq!("truncate".parse::<WriteMode>(), Ok(WriteMode::Truncate));
        assert!("append".parse::<WriteMode>().is_err());
        assert_eq!(WriteMode::Truncate.to_string(), "truncate");
    }
}
