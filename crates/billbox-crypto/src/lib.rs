//! billbox-crypto: at-rest encryption for uploaded documents
//!
//! Container formats (binary):
//! ```text
//! legacy:  [16 bytes: salt][16 bytes: IV][N bytes: AES-256-CBC ciphertext]
//!          N is a multiple of 16 (PKCS#7 padding); no header, no tag
//! sealed:  [4 bytes: "BBX1"][16 bytes: salt][24 bytes: nonce][ciphertext + 16-byte tag]
//!          XChaCha20-Poly1305; tampering is detected
//! ```
//!
//! Both formats derive their 256-bit key per container via
//! PBKDF2-HMAC-SHA256(master secret, salt) with a high iteration count.
//! The salt is fresh per encryption, so derived keys are never reused
//! across plaintexts and identical inputs produce distinct containers.

pub mod container;
pub mod error;
pub mod kdf;
pub mod secret;

pub use container::{decrypt, encrypt, open, seal};
pub use error::CryptoError;
pub use kdf::{derive_key, DerivedKey};
pub use secret::MasterSecret;

/// Size of a derived symmetric key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the per-container random salt
pub const SALT_SIZE: usize = 16;

/// AES block size / CBC initialization vector size
pub const BLOCK_SIZE: usize = 16;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Magic prefix identifying a sealed (authenticated, versioned) container
pub const SEALED_MAGIC: &[u8; 4] = b"BBX1";

// Shared with the config default so the two cannot drift.
pub use billbox_core::DEFAULT_KDF_ITERATIONS;
