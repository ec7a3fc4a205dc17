//! Key derivation: PBKDF2-HMAC-SHA256 (master secret, salt) → container key

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::{KEY_SIZE, SALT_SIZE};

/// A 256-bit key derived for exactly one encrypt or decrypt operation.
///
/// Recomputed on demand — never cached, never persisted — and zeroized on
/// drop so key material does not linger in memory.
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from the master secret and a per-container salt.
///
/// The salt is 16 bytes, randomly generated per encryption and stored
/// alongside the ciphertext (it does not need to be secret). The iteration
/// count is the brute-force cost factor; keep it at
/// [`crate::DEFAULT_KDF_ITERATIONS`] or above outside tests.
pub fn derive_key(secret: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey, CryptoError> {
    if secret.is_empty() {
        return Err(CryptoError::InvalidInput("secret must not be empty".into()));
    }
    if salt.len() != SALT_SIZE {
        return Err(CryptoError::InvalidInput(format!(
            "salt must be {SALT_SIZE} bytes, got {}",
            salt.len()
        )));
    }
    if iterations == 0 {
        return Err(CryptoError::InvalidInput(
            "iteration count must be non-zero".into(),
        ));
    }

    let mut bytes = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(secret, salt, iterations, &mut bytes);
    Ok(DerivedKey { bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keep test iteration counts low; production cost lives in config.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn test_kdf_deterministic() {
        let key1 = derive_key(b"test-secret", &[1u8; 16], TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"test-secret", &[1u8; 16], TEST_ITERATIONS).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_secrets() {
        let key1 = derive_key(b"secret-a", &[1u8; 16], TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"secret-b", &[1u8; 16], TEST_ITERATIONS).unwrap();
        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different secrets must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let key1 = derive_key(b"same-secret", &[1u8; 16], TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"same-secret", &[2u8; 16], TEST_ITERATIONS).unwrap();
        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_kdf_iteration_count_changes_key() {
        let key1 = derive_key(b"same-secret", &[1u8; 16], TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"same-secret", &[1u8; 16], TEST_ITERATIONS + 1).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_rejects_empty_secret() {
        let result = derive_key(b"", &[1u8; 16], TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::InvalidInput(_))));
    }

    #[test]
    fn test_kdf_rejects_wrong_salt_length() {
        let result = derive_key(b"secret", &[1u8; 8], TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::InvalidInput(_))));

        let result = derive_key(b"secret", &[1u8; 17], TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::InvalidInput(_))));
    }

    #[test]
    fn test_debug_redacted() {
        let key = derive_key(b"secret", &[1u8; 16], TEST_ITERATIONS).unwrap();
        assert!(!format!("{key:?}").contains("bytes: ["));
    }
}
