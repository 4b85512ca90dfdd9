//! The on-disk Caddyfile.
//!
//! Reads always hit the disk. Updates go through a staged sibling file that
//! is renamed over the target only once the control API has accepted the
//! new document, so readers never see a partially written file.

use axum::body::Bytes;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Errors from the configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", dir.display())]
    Stage {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What bootstrap found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The file already existed; holds its size in bytes.
    Existing(usize),
    /// The file was missing and an empty one was created.
    Created,
}

/// Proof that the caller holds the single-writer update lock.
pub struct UpdatePermit<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// A candidate document written next to the target but not yet visible.
///
/// Dropping it without [`StagedCaddyfile::commit`] deletes the temporary
/// file and leaves the active Caddyfile untouched.
#[derive(Debug)]
pub struct StagedCaddyfile {
    file: NamedTempFile,
    target: PathBuf,
    dir: PathBuf,
}

impl StagedCaddyfile {
    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically replace the target with the staged contents.
    ///
    /// The directory is synced after the rename so the new entry survives a
    /// crash.
    pub async fn commit(self) -> Result<(), StoreError> {
        let StagedCaddyfile { file, target, dir } = self;
        let persist_target = target.clone();

        tokio::task::spawn_blocking(move || {
            file.persist(&persist_target).map_err(|e| e.error)?;
            sync_dir(&dir)
        })
        .await
        .map_err(io::Error::other)
        .and_then(|res| res)
        .map_err(|source| StoreError::Commit {
            path: target,
            source,
        })
    }
}

/// Access to the single managed Caddyfile.
#[derive(Debug)]
pub struct CaddyfileStore {
    path: PathBuf,
    update_lock: Mutex<()>,
}

impl CaddyfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            update_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the file exists before serving.
    ///
    /// A missing file (and missing parent directories) is created empty.
    /// Any other read failure is returned.
    pub async fn bootstrap(&self) -> Result<BootstrapOutcome, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(contents) => Ok(BootstrapOutcome::Existing(contents.len())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.create_empty().await?;
                Ok(BootstrapOutcome::Created)
            }
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn create_empty(&self) -> Result<(), StoreError> {
        let create_err = |source| StoreError::Create {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.parent_dir() {
            tokio::fs::create_dir_all(parent).await.map_err(create_err)?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(false);
        #[cfg(unix)]
        options.mode(FILE_MODE);
        options.open(&self.path).await.map_err(create_err)?;
        Ok(())
    }

    /// Read the whole document.
    pub async fn read(&self) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })
    }

    /// Wait for the single-writer lock. Updates are strictly ordered;
    /// reads never wait on this.
    pub async fn lock_for_update(&self) -> UpdatePermit<'_> {
        UpdatePermit {
            _guard: self.update_lock.lock().await,
        }
    }

    /// Write `contents` to a temporary file beside the target.
    pub async fn stage(
        &self,
        _permit: &UpdatePermit<'_>,
        contents: Bytes,
    ) -> Result<StagedCaddyfile, StoreError> {
        let dir = self
            .parent_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let prefix = format!(
            ".{}.",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("Caddyfile")
        );

        let stage_dir = dir.clone();
        let file = tokio::task::spawn_blocking(move || write_staged(&stage_dir, &prefix, &contents))
            .await
            .map_err(io::Error::other)
            .and_then(|res| res)
            .map_err(|source| StoreError::Stage {
                dir: dir.clone(),
                source,
            })?;

        Ok(StagedCaddyfile {
            file,
            target: self.path.clone(),
            dir,
        })
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

fn write_staged(dir: &Path, prefix: &str, contents: &[u8]) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;

    file.write_all(contents)?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(FILE_MODE))?;
    }

    file.as_file().sync_all()?;
    Ok(file)
}

/// Flush the directory entry so a completed rename is durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
