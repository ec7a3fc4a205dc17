use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use billbox_core::DocumentId;
use billbox_crypto::CryptoError;

/// Extraction collaborator failure. Recoverable: the pipeline still purges
/// plaintext and surfaces it as [`PipelineError::Extraction`].
#[derive(Debug, Error)]
#[error("extraction failed: {0}")]
pub struct ExtractionFailure(pub String);

/// Analysis collaborator failure. The request still reports partial status
/// (extraction succeeded) rather than a bare failure.
#[derive(Debug, Error)]
#[error("analysis failed: {0}")]
pub struct AnalysisFailure(pub String);

/// Failures across the document lifecycle. Each variant maps to a distinct
/// user-visible status; nothing downgrades to a generic success.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("encryption failed: {0}")]
    Encrypt(#[source] CryptoError),

    #[error("container not found: {0}")]
    NotFound(DocumentId),

    /// Wraps corrupt-container errors plus I/O failures reading it back
    #[error("decryption failed: {0}")]
    Decrypt(#[source] CryptoError),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    #[error(transparent)]
    Analysis(#[from] AnalysisFailure),

    #[error("analysis timed out after {0:?}")]
    AnalysisTimeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    /// Deletion of a transient plaintext artifact failed. Logged at error
    /// level where it occurs; this is a plaintext-retention risk.
    #[error("purge failed for {path}: {source}")]
    Purge {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
