use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one persisted encrypted container.
///
/// Generated fresh (UUIDv4) at ingest so concurrent requests can never
/// collide on a storage path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// On-disk container format selection for newly written containers.
///
/// `Sealed` is the authenticated default. `LegacyCbc` writes the headerless
/// `salt || iv || ciphertext` layout kept for compatibility with containers
/// produced by older deployments; readers handle both regardless of this
/// setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerFormat {
    Sealed,
    LegacyCbc,
}

impl Default for ContainerFormat {
    fn default() -> Self {
        Self::Sealed
    }
}

/// Stage a document request has reached in the lifecycle pipeline.
///
/// Used for structured logging and for reporting how far a failed request
/// progressed; transitions are driven by the pipeline crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Received,
    Encrypted,
    Persisted,
    Decrypted,
    Extracted,
    Analyzed,
    Purged,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Encrypted => "encrypted",
            Stage::Persisted => "persisted",
            Stage::Decrypted => "decrypted",
            Stage::Extracted => "extracted",
            Stage::Analyzed => "analyzed",
            Stage::Purged => "purged",
        }
    }
}
