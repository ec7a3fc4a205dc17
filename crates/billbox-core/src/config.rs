use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::ContainerFormat;

/// Default PBKDF2-HMAC-SHA256 iteration count.
///
/// The deliberate cost factor resisting brute-force key search; lower it
/// only in tests. The single source for both the config default and the
/// crypto crate.
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Top-level configuration (loaded from billbox.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboxConfig {
    pub storage: StorageConfig,
    pub crypto: CryptoConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding persisted encrypted containers
    pub data_dir: PathBuf,
    /// Directory for transient plaintext artifacts (purged per request)
    pub scratch_dir: PathBuf,
    /// Minutes a persisted container survives before the retention sweep
    /// removes it (default: 60)
    pub retention_minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default:
    /// [`DEFAULT_KDF_ITERATIONS`])
    pub kdf_iterations: u32,
    /// Container format for newly written containers (default: sealed)
    pub write_format: ContainerFormat,
    /// Optional file holding the master secret; BILLBOX_SECRET env takes
    /// precedence, and an ephemeral secret is generated when both are absent
    pub secret_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bounded worker pool size for analysis calls (default: 5)
    pub workers: usize,
    /// Per-call analysis timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/billbox/containers"),
            scratch_dir: PathBuf::from("/var/lib/billbox/scratch"),
            retention_minutes: 60,
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            write_format: ContainerFormat::Sealed,
            secret_file: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[storage]
data_dir = "/srv/billbox/containers"
scratch_dir = "/srv/billbox/scratch"
retention_minutes = 15

[crypto]
kdf_iterations = 200000
write_format = "legacy-cbc"
secret_file = "/etc/billbox/secret"

[analysis]
workers = 8
timeout_secs = 60
"#;
        let config: BillboxConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(
            config.storage.data_dir,
            PathBuf::from("/srv/billbox/containers")
        );
        assert_eq!(config.storage.retention_minutes, 15);
        assert_eq!(config.crypto.kdf_iterations, 200_000);
        assert_eq!(config.crypto.write_format, ContainerFormat::LegacyCbc);
        assert_eq!(
            config.crypto.secret_file,
            Some(PathBuf::from("/etc/billbox/secret"))
        );
        assert_eq!(config.analysis.workers, 8);
        assert_eq!(config.analysis.timeout_secs, 60);
    }

    #[test]
    fn test_parse_defaults() {
        let config: BillboxConfig = toml::from_str("").unwrap();

        assert_eq!(
            config.storage.data_dir,
            PathBuf::from("/var/lib/billbox/containers")
        );
        assert_eq!(config.storage.retention_minutes, 60);
        assert_eq!(config.crypto.kdf_iterations, 100_000);
        assert_eq!(config.crypto.write_format, ContainerFormat::Sealed);
        assert!(config.crypto.secret_file.is_none());
        assert_eq!(config.analysis.workers, 5);
        assert_eq!(config.analysis.timeout_secs, 30);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[analysis]
workers = 2
"#;
        let config: BillboxConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.analysis.workers, 2);
        // Defaults
        assert_eq!(config.analysis.timeout_secs, 30);
        assert_eq!(config.crypto.kdf_iterations, 100_000);
    }

    #[test]
    fn test_default_iterations_follow_constant() {
        assert_eq!(
            CryptoConfig::default().kdf_iterations,
            DEFAULT_KDF_ITERATIONS
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = BillboxConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BillboxConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.storage.data_dir, parsed.storage.data_dir);
        assert_eq!(config.crypto.kdf_iterations, parsed.crypto.kdf_iterations);
        assert_eq!(config.analysis.workers, parsed.analysis.workers);
    }
}
