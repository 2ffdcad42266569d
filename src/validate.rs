//! Argument validation.
//!
//! Turns the positional arguments into a path that names an existing regular
//! file nobody else is holding. Nothing here modifies the file.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::probe::{Claim, ExclusivityProbe};

/// Validate the positional arguments and return the target path
///
/// Only the first argument is used; any others are ignored.
pub fn validate_args<P: ExclusivityProbe + ?Sized>(
    inputs: &[PathBuf],
    probe: &P,
) -> Result<PathBuf> {
    let Some(path) = inputs.first() else {
        return Err(Error::MissingArgument);
    };
    if inputs.len() > 1 {
        log::debug!("ignoring {} extra argument(s)", inputs.len() - 1);
    }

    validate_path(path, probe)?;
    Ok(path.clone())
}

/// Check that `path` is an existing regular file that can be claimed
pub fn validate_path<P: ExclusivityProbe + ?Sized>(path: &Path, probe: &P) -> Result<()> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match probe.probe(path) {
        Claim::Available => Ok(()),
        Claim::InUse { reason } => Err(Error::FileInUse {
            path: path.to_path_buf(),
            source: reason,
        }),
    }
}
