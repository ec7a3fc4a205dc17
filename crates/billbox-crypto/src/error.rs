use thiserror::Error;

/// Failures from key derivation and the container codecs.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed derivation inputs (empty secret, wrong salt length)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Container too short, bad ciphertext length, bad padding, or a failed
    /// authentication tag. A wrong master secret surfaces here: CBC padding
    /// validation rejects it with overwhelming probability, the sealed
    /// format rejects it unconditionally.
    #[error("corrupt container: {0}")]
    CorruptData(String),

    /// Cipher setup failure during encryption
    #[error("encryption failed: {0}")]
    Encrypt(String),
}
