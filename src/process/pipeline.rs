//! Conversion pipeline
//!
//! Runs the stages in order and stops at the first failure:
//! - Validate the arguments and probe for exclusive access
//! - Read the file once
//! - Detect the encoding of those bytes
//! - Decode the same bytes as text
//! - Normalize the line terminators
//! - Write the content back with the same encoding

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::WriteMode;
use crate::content;
use crate::encoding::{EncodingDescriptor, EncodingDetector};
use crate::error::{Error, Result};
use crate::normalize::{normalize_line_endings, LineEndingStats};
use crate::probe::ExclusivityProbe;
use crate::report::Reporter;
use crate::validate::validate_args;

/// Per-run context threaded through the stages
#[derive(Debug, Clone)]
pub struct Conversion {
    /// File being converted
    pub path: PathBuf,
    /// How the result replaces the original
    pub write_mode: WriteMode,
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub path: PathBuf,
    pub encoding: EncodingDescriptor,
    /// Line terminators found before normalization
    pub stats: LineEndingStats,
}

/// Ask `detector` which encoding `bytes`, the contents of `path`, are in
pub fn detect_encoding<D: EncodingDetector + ?Sized>(
    path: &Path,
    bytes: &[u8],
    detector: &D,
) -> Result<EncodingDescriptor> {
    detector
        .detect(bytes)
        .map_err(|e| Error::EncodingDetection {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Convert an already validated file
pub fn convert<D: EncodingDetector + ?Sized, W: Write>(
    conversion: &Conversion,
    detector: &D,
    reporter: &mut Reporter<W>,
) -> Result<Outcome> {
    let path = conversion.path.as_path();

    let bytes = content::read_bytes(path)?;
    let encoding = detect_encoding(path, &bytes, detector)?;
    reporter.detected(&encoding);

    let text = content::decode(path, &bytes, &encoding)?;
    drop(bytes);
    let stats = LineEndingStats::scan(&text);
    log::debug!(
        "{}: {} CRLF, {} LF, {} CR",
        path.display(),
        stats.crlf,
        stats.lf,
        stats.cr
    );

    let normalized = normalize_line_endings(&text);
    drop(text);

    content::write(path, &normalized, &encoding, conversion.write_mode)?;

    Ok(Outcome {
        path: conversion.path.clone(),
        encoding,
        stats,
    })
}

/// Validate `inputs` and convert the file they name
pub fn run<P, D, W>(
    inputs: &[PathBuf],
    write_mode: WriteMode,
    probe: &P,
    detector: &D,
    reporter: &mut Reporter<W>,
) -> Result<Outcome>
where
    P: ExclusivityProbe + ?Sized,
    D: EncodingDetector + ?Sized,
    W: Write,
{
    let path = validate_args(inputs, probe)?;
    log::debug!("converting {} ({write_mode} write)", path.display());

    let conversion = Conversion { path, write_mode };
    convert(&conversion, detector, reporter)
}
