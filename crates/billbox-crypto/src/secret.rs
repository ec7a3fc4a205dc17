//! Master secret: process-wide symmetric secret, provisioned once at startup
//!
//! Provisioning chain (in order of precedence):
//!   1. BILLBOX_SECRET env var (literal secret content)
//!   2. Configured secret file path
//!   3. Ephemeral random secret for the process lifetime
//!
//! An ephemeral secret makes containers persisted by a previous process
//! unreadable; provisioning logs a warning when it falls back to one.

use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// The process-wide master secret. Never persisted, never rotated during
/// the process lifetime, zeroized on drop.
#[derive(Clone)]
pub struct MasterSecret {
    bytes: Vec<u8>,
}

impl MasterSecret {
    /// Wrap raw secret bytes. Fails on an empty secret.
    pub fn new(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::InvalidInput("secret must not be empty".into()));
        }
        Ok(Self { bytes })
    }

    /// Wrap a passphrase-style secret.
    pub fn from_passphrase(passphrase: &SecretString) -> Result<Self, CryptoError> {
        Self::new(passphrase.expose_secret().as_bytes().to_vec())
    }

    /// Generate a random 32-byte secret valid for this process only.
    pub fn ephemeral() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for MasterSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Resolve the master secret from the environment, a configured secret
/// file, or an ephemeral fallback.
pub fn provision(secret_file: Option<&Path>) -> Result<MasterSecret, CryptoError> {
    if let Ok(value) = std::env::var("BILLBOX_SECRET") {
        let passphrase = SecretString::from(value);
        tracing::info!(source = "env", "master secret loaded");
        return MasterSecret::from_passphrase(&passphrase);
    }

    if let Some(path) = secret_file {
        let bytes = std::fs::read(path).map_err(|e| {
            CryptoError::InvalidInput(format!("reading secret file {}: {e}", path.display()))
        })?;
        tracing::info!(source = %path.display(), "master secret loaded");
        return MasterSecret::new(bytes);
    }

    tracing::warn!(
        "no master secret configured; using an ephemeral secret. Containers \
         persisted by earlier runs are unreadable and this run's containers \
         will not survive a restart"
    );
    Ok(MasterSecret::ephemeral())
}
