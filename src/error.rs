//! Error types and result aliases for convert-crlf.
//!
//! This module defines the error handling infrastructure:
//! - [`Error`]: One variant per way a conversion run can fail
//! - [`Result<T>`]: Type alias used by every pipeline stage
//!
//! Anything that is not one of these kinds (config loading, argument parsing)
//! travels as `anyhow::Error` and is reported as an unexpected error.

use std::io;
use std::path::PathBuf;

use thiserror::Error as ThisError;

/// A terminal failure of one conversion run
#[derive(Debug, ThisError)]
pub enum Error {
    /// No file path was given on the command line
    #[error("file name must be specified")]
    MissingArgument,

    /// The path does not name an existing regular file
    #[error("file does not exist: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Another process holds the file in a conflicting mode
    #[error("file is in use by another process: {}", .path.display())]
    FileInUse {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// No encoding could be chosen that round-trips the file's bytes
    #[error("could not detect the encoding of {}: {reason}", .path.display())]
    EncodingDetection { path: PathBuf, reason: String },

    /// The file could not be read or decoded
    #[error("failed to read {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be encoded or written back
    #[error("failed to write {}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Short label naming the error kind, used in status output
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::MissingArgument => "MissingArgument",
            Error::FileNotFound { .. } => "FileNotFound",
            Error::FileInUse { .. } => "FileInUse",
            Error::EncodingDetection { .. } => "EncodingDetectionError",
            Error::FileRead { .. } => "FileReadError",
            Error::FileWrite { .. } => "FileWriteError",
        }
    }

    /// Whether the error was raised before the target file could be touched
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingArgument | Error::FileNotFound { .. } | Error::FileInUse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Error::MissingArgument.kind_name(), "MissingArgument");
        let err = Error::FileRead {
            path: PathBuf::from("a.txt"),
            source: io::Error::other("boom"),
        };
        assert_eq!(err.kind_name(), "FileReadError");
    }

    #[test]
    fn test_validation_errors() {
        assert!(Error::MissingArgument.is_validation());
        assert!(Error::FileNotFound {
            path: PathBuf::from("x")
        }
        .is_validation());
        assert!(!Error::EncodingDetection {
            path: PathBuf::from("x"),
            reason: "binary".to_string(),
        }
        .is_validation());
    }

    #[test]
    fn test_display_includes_path() {
        let err = Error::FileNotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert!(err.to_string().contains("missing.txt"));
    }
}
