//! Exclusivity probes: can this file be claimed right now?
//!
//! A probe is advisory. It tells whether another process holds the file open
//! in a conflicting mode at the moment of the call; nothing stops a process
//! from opening it afterwards.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io;
use std::path::Path;

/// Outcome of probing a file
#[derive(Debug)]
pub enum Claim {
    /// Nothing else holds the file in a conflicting mode
    Available,
    /// The file is held by someone else, or could not be claimed at all
    InUse { reason: Option<io::Error> },
}

impl Claim {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Claim::Available)
    }
}

/// Capability check for exclusive access to a path
pub trait ExclusivityProbe {
    fn probe(&self, path: &Path) -> Claim;
}

/// Renames the file onto itself.
///
/// Where open handles carry sharing restrictions (Windows) the rename is
/// refused while another program has the file open. Elsewhere it is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfRenameProbe;

impl ExclusivityProbe for SelfRenameProbe {
    fn probe(&self, path: &Path) -> Claim {
        match fs::rename(path, path) {
            Ok(()) => Claim::Available,
            Err(e) => Claim::InUse { reason: Some(e) },
        }
    }
}

/// Opens the file for writing and tries to take a non-blocking exclusive lock.
///
/// On Windows the handle is opened without sharing, so any other open handle
/// makes the open itself fail. The lock is released as soon as the probe
/// returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockProbe;

/// Open `path` the way a writer would claim it
fn open_for_claim(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true);
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        options.share_mode(0);
    }

    match options.open(path) {
        // A read-only file refuses write handles no matter who else has it open
        Err(e)
            if e.kind() == io::ErrorKind::PermissionDenied
                && fs::metadata(path).is_ok_and(|m| m.permissions().readonly()) =>
        {
            log::debug!("{} is read-only, claiming it for reading", path.display());
            File::open(path)
        }
        result => result,
    }
}

impl ExclusivityProbe for LockProbe {
    fn probe(&self, path: &Path) -> Claim {
        let file = match open_for_claim(path) {
            Ok(file) => file,
            Err(e) => return Claim::InUse { reason: Some(e) },
        };
        match file.try_lock() {
            Ok(()) => Claim::Available,
            Err(TryLockError::WouldBlock) => Claim::InUse { reason: None },
            Err(TryLockError::Error(e)) if e.kind() == io::ErrorKind::Unsupported => {
                log::debug!("file locking unsupported for {}: {e}", path.display());
                Claim::Available
            }
            Err(TryLockError::Error(e)) => Claim::InUse { reason: Some(e) },
        }
    }
}

/// Rename probe followed by lock probe; the file is available only if both agree
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformProbe;

impl ExclusivityProbe for PlatformProbe {
    fn probe(&self, path: &Path) -> Claim {
        let claim = SelfRenameProbe.probe(path);
        if !claim.is_available() {
            return claim;
        }
        LockProbe.probe(path)
    }
}
