//! Document lifecycle orchestration
//!
//! Per-request state machine:
//! `Received → Encrypted → Persisted → Decrypted → Extracted → Analyzed → Purged`
//! with a typed failure reachable from every state. The master secret is
//! injected at construction — never read from ambient global state — so
//! tests can run pipelines with distinct secrets side by side.

use std::path::Path;
use std::sync::Arc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use billbox_core::types::Stage;
use billbox_core::{BillboxConfig, ContainerFormat, DocumentId, FeeReport};
use billbox_crypto::{container, MasterSecret};

use crate::analyze::{AnalysisPool, FeeAnalyzer};
use crate::error::PipelineError;
use crate::extract::TextExtractor;
use crate::scratch::{PlaintextGuard, ScratchDir};
use crate::store::ContainerStore;

/// Outcome of one scan request.
///
/// `report` is `None` exactly when analysis failed after successful
/// extraction; the request is then partial, not failed.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub document_id: DocumentId,
    pub text_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<FeeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

impl ScanReport {
    pub fn is_partial(&self) -> bool {
        self.report.is_none()
    }
}

pub struct DocumentPipeline {
    secret: Arc<MasterSecret>,
    kdf_iterations: u32,
    write_format: ContainerFormat,
    retention: std::time::Duration,
    store: ContainerStore,
    scratch: ScratchDir,
    extractor: Arc<dyn TextExtractor>,
    pool: AnalysisPool,
}

impl DocumentPipeline {
    pub async fn new(
        config: &BillboxConfig,
        secret: MasterSecret,
        extractor: Arc<dyn TextExtractor>,
        analyzer: Arc<dyn FeeAnalyzer>,
    ) -> Result<Self, PipelineError> {
        let store = ContainerStore::open(&config.storage.data_dir).await?;
        let scratch = ScratchDir::open(&config.storage.scratch_dir).await?;
        let pool = AnalysisPool::new(
            analyzer,
            config.analysis.workers,
            std::time::Duration::from_secs(config.analysis.timeout_secs),
        );

        Ok(Self {
            secret: Arc::new(secret),
            kdf_iterations: config.crypto.kdf_iterations,
            write_format: config.crypto.write_format,
            retention: std::time::Duration::from_secs(config.storage.retention_minutes * 60),
            store,
            scratch,
            extractor,
            pool,
        })
    }

    /// Encrypt uploaded bytes and persist the container under a fresh ID.
    pub async fn ingest(&self, plaintext: &[u8]) -> Result<DocumentId, PipelineError> {
        let id = DocumentId::generate();
        debug!(id = %id, stage = Stage::Received.as_str(), bytes = plaintext.len(), "upload received");

        let encrypted = match self.write_format {
            ContainerFormat::Sealed => {
                container::seal(plaintext, &self.secret, self.kdf_iterations)
            }
            ContainerFormat::LegacyCbc => {
                container::encrypt(plaintext, &self.secret, self.kdf_iterations)
            }
        }
        .map_err(PipelineError::Encrypt)?;
        debug!(id = %id, stage = Stage::Encrypted.as_str(), "document encrypted");

        self.store.persist(id, &encrypted).await?;
        info!(id = %id, stage = Stage::Persisted.as_str(), "container persisted");
        Ok(id)
    }

    /// Ingest a spooled upload file.
    ///
    /// The plaintext spool is deleted as soon as the container exists,
    /// regardless of downstream outcome; a failed deletion is logged as a
    /// purge failure but does not fail the request.
    pub async fn ingest_upload(&self, path: &Path) -> Result<DocumentId, PipelineError> {
        let guard = PlaintextGuard::adopt(path.to_path_buf());
        let plaintext = tokio::fs::read(path).await?;
        let id = self.ingest(&plaintext).await?;

        if let Err(e) = guard.purge() {
            warn!(id = %id, error = %e, "upload spool purge failed after persist");
        }
        Ok(id)
    }

    /// Decrypt a persisted container, extract its text, and analyze it.
    ///
    /// The decrypted bytes are spooled to a scratch file and the extractor
    /// reads from that path. The artifact is deleted unconditionally right
    /// after extraction is attempted; cancellation mid-scan purges it via
    /// the guard's drop. On decrypt failure the container is left in place
    /// (it is the durable record) and no plaintext is retained.
    pub async fn scan(
        &self,
        id: DocumentId,
        cancel: &CancellationToken,
    ) -> Result<ScanReport, PipelineError> {
        let encrypted = self.store.read(id).await?;
        let plaintext = container::open(&encrypted, &self.secret, self.kdf_iterations)
            .map_err(PipelineError::Decrypt)?;
        debug!(id = %id, stage = Stage::Decrypted.as_str(), bytes = plaintext.len(), "container decrypted");

        let guard = self.scratch.spool(id, &plaintext).await?;
        let extracted = self.extractor.extract(guard.path());
        // Unconditional purge: extraction success or failure alike.
        if let Err(e) = guard.purge() {
            warn!(id = %id, error = %e, "plaintext purge failed after extraction");
        }

        let text = extracted?;
        debug!(id = %id, stage = Stage::Extracted.as_str(), chars = text.len(), "text extracted");

        match self.pool.analyze(text.clone(), cancel).await {
            Ok(report) => {
                info!(id = %id, stage = Stage::Analyzed.as_str(), fees = report.detected_fees.len(), "analysis complete");
                Ok(ScanReport {
                    document_id: id,
                    text_chars: text.chars().count(),
                    report: Some(report),
                    analysis_error: None,
                })
            }
            Err(PipelineError::Cancelled) => Err(PipelineError::Cancelled),
            Err(e @ (PipelineError::Analysis(_) | PipelineError::AnalysisTimeout(_))) => {
                // Extraction succeeded; report partial status instead of a
                // bare failure.
                warn!(id = %id, error = %e, "analysis failed; returning partial result");
                Ok(ScanReport {
                    document_id: id,
                    text_chars: text.chars().count(),
                    report: None,
                    analysis_error: Some(e.to_string()),
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Delete the persisted container, completing its consume-once cycle.
    pub async fn purge(&self, id: DocumentId) -> Result<(), PipelineError> {
        self.store.remove(id).await?;
        info!(id = %id, stage = Stage::Purged.as_str(), "container purged");
        Ok(())
    }

    /// Remove containers older than the configured retention window.
    ///
    /// Backstop for clients that crashed or never called [`purge`](Self::purge);
    /// run periodically or before batches of work.
    pub async fn sweep_expired(&self) -> Result<usize, PipelineError> {
        let removed = self.store.sweep_expired(self.retention).await?;
        if removed > 0 {
            info!(removed, "retention sweep removed expired containers");
        }
        Ok(removed)
    }

    pub fn store(&self) -> &ContainerStore {
        &self.store
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }
}
