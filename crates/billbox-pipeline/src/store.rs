//! Durable container store: one file per encrypted container
//!
//! Containers are keyed by [`DocumentId`] and written atomically (temp file
//! in the same directory, then rename) so a crash mid-write never leaves a
//! half-written container behind. Unique IDs make path collisions between
//! concurrent requests impossible.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use billbox_core::DocumentId;

use crate::error::PipelineError;

/// Filename extension for persisted containers
const CONTAINER_EXT: &str = "bbx";

#[derive(Debug, Clone)]
pub struct ContainerStore {
    dir: PathBuf,
}

impl ContainerStore {
    /// Open (creating if needed) the container directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn container_path(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!("{id}.{CONTAINER_EXT}"))
    }

    /// Atomically persist a container under its unique name.
    pub async fn persist(&self, id: DocumentId, container: &[u8]) -> Result<(), PipelineError> {
        let path = self.container_path(id);
        let tmp = self.dir.join(format!("{id}.{CONTAINER_EXT}.tmp"));

        tokio::fs::write(&tmp, container).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(id = %id, bytes = container.len(), "container persisted");
        Ok(())
    }

    /// Read a container back. Missing containers map to
    /// [`PipelineError::NotFound`].
    pub async fn read(&self, id: DocumentId) -> Result<Vec<u8>, PipelineError> {
        match tokio::fs::read(self.container_path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PipelineError::NotFound(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a persisted container (end of its consume-once lifecycle).
    pub async fn remove(&self, id: DocumentId) -> Result<(), PipelineError> {
        match tokio::fs::remove_file(self.container_path(id)).await {
            Ok(()) => {
                debug!(id = %id, "container removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PipelineError::NotFound(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every container older than `max_age`, returning how many
    /// were removed.
    ///
    /// Containers expire by file modification time; stale temp files from
    /// interrupted writes are swept on the same basis. Individual deletion
    /// failures are logged and skipped so one bad entry cannot stall the
    /// sweep.
    pub async fn sweep_expired(&self, max_age: Duration) -> Result<usize, PipelineError> {
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let expired = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .is_some_and(|age| age >= max_age);
            if !expired {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => {
                    removed += 1;
                    info!(path = %entry.path().display(), "expired container removed");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "failed to remove expired container");
                }
            }
        }
        Ok(removed)
    }

    pub async fn contains(&self, id: DocumentId) -> bool {
        tokio::fs::try_exists(self.container_path(id))
            .await
            .unwrap_or(false)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
