//! Scratch directory for transient plaintext artifacts
//!
//! Every decrypted (or spooled upload) artifact lives behind a
//! [`PlaintextGuard`]: dropping the guard removes the file, so the purge
//! happens on every exit path out of a request, including cancellation
//! (the future being dropped mid-pipeline). Explicit [`PlaintextGuard::purge`]
//! reports the failure; the Drop fallback can only log it. Either way a
//! failed purge is an error-level event: it means sensitive plaintext is
//! still on disk.

use std::path::{Path, PathBuf};
use tracing::{debug, error};

use billbox_core::DocumentId;

use crate::error::PipelineError;

#[derive(Debug, Clone)]
pub struct ScratchDir {
    dir: PathBuf,
}

impl ScratchDir {
    /// Open (creating if needed) the scratch directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Materialize plaintext bytes as a guarded scratch file.
    pub async fn spool(
        &self,
        id: DocumentId,
        plaintext: &[u8],
    ) -> Result<PlaintextGuard, PipelineError> {
        let path = self.dir.join(format!("{id}.plain"));
        tokio::fs::write(&path, plaintext).await?;
        debug!(id = %id, bytes = plaintext.len(), "plaintext spooled to scratch");
        Ok(PlaintextGuard { path, armed: true })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Owns one on-disk plaintext artifact; removing it is guaranteed.
#[derive(Debug)]
pub struct PlaintextGuard {
    path: PathBuf,
    armed: bool,
}

impl PlaintextGuard {
    /// Take ownership of an existing plaintext file (e.g. a spooled upload).
    pub fn adopt(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// The guarded artifact, for collaborators that read it from disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the artifact now, surfacing the failure to the caller.
    ///
    /// The failure is also logged here so it cannot be silently swallowed
    /// by a caller that discards the Result.
    pub fn purge(mut self) -> Result<(), PipelineError> {
        self.armed = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "plaintext artifact purged");
                Ok(())
            }
            Err(source) => {
                error!(
                    path = %self.path.display(),
                    error = %source,
                    "plaintext purge FAILED; residual sensitive data on storage"
                );
                Err(PipelineError::Purge {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

impl Drop for PlaintextGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                error!(
                    path = %self.path.display(),
                    error = %e,
                    "plaintext purge FAILED on drop; residual sensitive data on storage"
                );
            }
        }
    }
}
