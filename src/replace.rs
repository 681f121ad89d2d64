//! Write-replace: put new contents under a file name without ever leaving a
//! half-written file there.
//!
//! Contents go to `<name>.tmp` first. The current file is moved aside to
//! `<name>.old`, the temporary file is renamed into place, and the backup is
//! deleted. If the second rename fails the backup is renamed back. The result
//! is one of three states, see [`ReplaceOutcome`].
//!
//! The two renames are not atomic as a pair: a crash between them leaves the
//! previous contents at `<name>.old` and nothing under the canonical name.
//!
//! All filesystem access goes through [`FileSystem`] so each failure point can
//! be exercised in tests.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::error::ConfigError;

/// The filesystem operations the replace sequence needs.
pub trait FileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove(&self, path: &Path) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// How a write-replace ended.
#[derive(Debug)]
pub enum ReplaceOutcome {
    /// The new contents are in place.
    Replaced,
    /// The new contents could not be put in place. The canonical name holds
    /// what it held before the call (or is still absent).
    RolledBack { source: io::Error },
    /// The new contents could not be put in place and moving the previous
    /// file back failed too. The previous contents are at `backup`.
    Unrecoverable {
        source: io::Error,
        rollback: io::Error,
        backup: PathBuf,
    },
}

impl ReplaceOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, ReplaceOutcome::Replaced)
    }

    /// Map the failure states to [`ConfigError`].
    pub fn into_result(self, target: &Path) -> Result<(), ConfigError> {
        match self {
            ReplaceOutcome::Replaced => Ok(()),
            ReplaceOutcome::RolledBack { source } => Err(ConfigError::ReplaceRolledBack {
                path: target.to_path_buf(),
                source,
            }),
            ReplaceOutcome::Unrecoverable {
                source,
                rollback,
                backup,
            } => Err(ConfigError::ReplaceUnrecoverable {
                path: target.to_path_buf(),
                backup,
                source,
                rollback,
            }),
        }
    }
}

/// `target` with `suffix` appended to its file name.
pub fn sibling(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    target.with_file_name(name)
}

pub fn temp_path(target: &Path) -> PathBuf {
    sibling(target, ".tmp")
}

pub fn backup_path(target: &Path) -> PathBuf {
    sibling(target, ".old")
}

/// Replace the contents of `target` with `contents`.
///
/// Creates parent directories as needed. A backup left by an interrupted
/// earlier call is restored first, so calling it again after any outcome
/// converges on the same final state.
pub fn write_replace(fs: &dyn FileSystem, target: &Path, contents: &[u8]) -> ReplaceOutcome {
    let temp = temp_path(target);
    let backup = backup_path(target);

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
        && let Err(source) = fs.create_dir_all(parent)
    {
        return ReplaceOutcome::RolledBack { source };
    }

    // An earlier call stopped between its two renames: put the previous
    // contents back under the canonical name before starting over.
    if !fs.exists(target)
        && fs.exists(&backup)
        && let Err(source) = fs.rename(&backup, target)
    {
        return ReplaceOutcome::RolledBack { source };
    }

    if let Err(source) = fs.write(&temp, contents) {
        discard(fs, &temp);
        return ReplaceOutcome::RolledBack { source };
    }

    // A backup left behind by an earlier failed call would block the rename
    // on some platforms.
    match fs.remove(&backup) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            discard(fs, &temp);
            return ReplaceOutcome::RolledBack { source };
        }
    }

    let has_backup = match fs.rename(target, &backup) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(source) => {
            discard(fs, &temp);
            return ReplaceOutcome::RolledBack { source };
        }
    };

    match fs.rename(&temp, target) {
        Ok(()) => {
            if has_backup && let Err(e) = fs.remove(&backup) {
                warn!(path = %backup.display(), error = %e, "could not delete backup");
            }
            ReplaceOutcome::Replaced
        }
        Err(source) if !has_backup => {
            discard(fs, &temp);
            ReplaceOutcome::RolledBack { source }
        }
        Err(source) => match fs.rename(&backup, target) {
            Ok(()) => {
                discard(fs, &temp);
                ReplaceOutcome::RolledBack { source }
            }
            Err(rollback) => {
                error!(
                    path = %target.display(),
                    backup = %backup.display(),
                    error = %rollback,
                    "could not restore config file from backup"
                );
                ReplaceOutcome::Unrecoverable {
                    source,
                    rollback,
                    backup,
                }
            }
        },
    }
}

fn discard(fs: &dyn FileSystem, path: &Path) {
    if let Err(e) = fs.remove(path)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "could not delete temporary file");
    }
}
