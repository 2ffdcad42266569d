//! convert-crlf - Normalize the line endings of a text file to CRLF
//!
//! Rewrites a single file in place so every line break is CRLF, reading and
//! writing it with the same detected character encoding.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod content;
pub mod encoding;
pub mod error;
pub mod normalize;
pub mod probe;
pub mod process;
pub mod report;
pub mod validate;

// Re-export commonly used types
pub use cli::{build_cli, parse_args_from, try_parse_args, try_parse_args_from, CliArgs};
pub use config::{Config, WriteMode};
pub use encoding::{EncodingDescriptor, EncodingDetector, SniffingDetector};
pub use error::{Error, Result};
pub use normalize::{normalize_line_endings, LineEndingStats};
pub use probe::{Claim, ExclusivityProbe, PlatformProbe};
pub use process::{run, Outcome};
pub use report::Reporter;
