//! Reading the target file as text and writing it back.
//!
//! Both directions go through the same [`EncodingDescriptor`], so bytes that
//! are not line breaks come back out exactly as they went in.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::WriteMode;
use crate::encoding::EncodingDescriptor;
use crate::error::{Error, Result};

fn read_error(path: &Path, source: io::Error) -> Error {
    Error::FileRead {
        path: path.to_path_buf(),
        source,
    }
}

fn write_error(path: &Path, source: io::Error) -> Error {
    Error::FileWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the raw bytes of `path`
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| read_error(path, e))
}

/// Decode `bytes`, the contents of `path`, with `encoding`
///
/// Malformed input for the encoding is reported as a read error.
pub fn decode(path: &Path, bytes: &[u8], encoding: &EncodingDescriptor) -> Result<String> {
    encoding.decode(bytes).ok_or_else(|| {
        read_error(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("content is not valid {encoding}"),
            ),
        )
    })
}

/// Encode `text` with `encoding` and replace the contents of `path`
pub fn write(
    path: &Path,
    text: &str,
    encoding: &EncodingDescriptor,
    mode: WriteMode,
) -> Result<()> {
    let bytes = encoding.encode(text).ok_or_else(|| {
        write_error(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("text cannot be represented in {encoding}"),
            ),
        )
    })?;

    match mode {
        WriteMode::Truncate => fs::write(path, &bytes).map_err(|e| write_error(path, e)),
        WriteMode::Atomic => write_atomic(path, &bytes).map_err(|e| write_error(path, e)),
    }
}

/// Directory a sibling temporary file should be created in
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write to a temporary file next to `path`, then rename it over `path`.
///
/// Symlinks are resolved first so the link stays in place and its target is
/// the file that gets replaced. The original is left untouched if anything
/// fails before the rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let permissions = fs::metadata(&target)?.permissions();

    let mut tmp = NamedTempFile::new_in(parent_dir(&target))?;
    tmp.write_all(bytes)?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    log::debug!("renamed temporary file over {}", target.display());
    Ok(())
}
