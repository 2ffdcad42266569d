//! File conversion pipeline.
//!
//! This module orchestrates one conversion run:
//!
//! **Validation:**
//! - A path must be given, name a regular file, and not be held by another process
//!
//! **Conversion:**
//! - Detect the encoding and decode the whole file
//! - Rewrite every line terminator as CRLF
//! - Encode with the same encoding and replace the file
//!
//! The main entry point is [`run`], which stops at the first failing stage and
//! returns the error for the caller to report.

pub mod pipeline;

pub use pipeline::{convert, detect_encoding, run, Conversion, Outcome};
