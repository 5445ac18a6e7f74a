//! Cross-process advisory locking.
//!
//! The lock is taken on a sidecar file next to the memory file
//! (`memory.jsonl` is guarded by `memory.jsonl.lock`) so the data file can be
//! replaced by rename while the lock is held. Mutations take an exclusive
//! lock for the whole load-modify-save cycle; reads take a shared one.
//!
//! Locks are advisory: they coordinate processes that use this crate and do
//! nothing against other writers.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

use kgraph_core::{KgError, KgResult};

/// Lock strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Many readers at once
    Shared,
    /// One writer, no readers
    Exclusive,
}

/// A held advisory lock. Released on drop.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl FileLock {
    /// Sidecar lock path for a data file.
    pub fn lock_path(data_path: &Path) -> PathBuf {
        let mut name = data_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        data_path.with_file_name(name)
    }

    /// Block until the lock guarding `data_path` is held in `mode`.
    ///
    /// An exclusive lock creates the lock file and any missing parent
    /// directories. A shared lock never creates anything: if the lock file
    /// does not exist no writer has run yet, so `Ok(None)` is returned. The
    /// same applies when the lock file cannot be opened for lack of
    /// permission.
    pub fn acquire(data_path: &Path, mode: LockMode) -> KgResult<Option<FileLock>> {
        let path = Self::lock_path(data_path);

        let file = match mode {
            LockMode::Exclusive => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        KgError::storage(
                            format!("failed to create directory {}", parent.display()),
                            e,
                        )
                    })?;
                }
                open_lock_file(&path, true)
                    .map_err(|e| KgError::storage(format!("failed to open {}", path.display()), e))?
            }
            LockMode::Shared => match open_lock_file(&path, false) {
                Ok(file) => file,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                    ) =>
                {
                    trace!(path = %path.display(), error = %e, "Reading without a lock");
                    return Ok(None);
                }
                Err(e) => {
                    return Err(KgError::storage(
                        format!("failed to open {}", path.display()),
                        e,
                    ))
                }
            },
        };

        let locked = match mode {
            LockMode::Shared => FileExt::lock_shared(&file),
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
        };
        locked.map_err(|e| KgError::storage(format!("failed to lock {}", path.display()), e))?;

        trace!(path = %path.display(), ?mode, "Lock acquired");
        Ok(Some(FileLock { file, path, mode }))
    }

    /// The sidecar file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the lock is held.
    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "Failed to release lock");
        }
    }
}

fn open_lock_file(path: &Path, create: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);
    if create {
        options.write(true).create(true).truncate(false);
    }
    options.open(path)
}
