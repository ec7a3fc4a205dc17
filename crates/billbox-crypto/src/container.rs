//! Container codecs: legacy AES-256-CBC and sealed XChaCha20-Poly1305
//!
//! `encrypt`/`decrypt` implement the headerless legacy layout
//! `[salt(16)][iv(16)][ciphertext]` with PKCS#7 padding. CBC carries no
//! authentication tag, so tampering is only caught when it happens to break
//! the padding; `seal`/`open` produce the versioned authenticated layout
//! `["BBX1"][salt(16)][nonce(24)][ciphertext + tag(16)]` and are the
//! default for newly written containers. `open` reads both layouts.
//!
//! Encrypting the same plaintext twice yields different containers: salt,
//! IV, and nonce are drawn fresh from the CSPRNG on every call.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::error::CryptoError;
use crate::kdf::derive_key;
use crate::secret::MasterSecret;
use crate::{BLOCK_SIZE, NONCE_SIZE, SALT_SIZE, SEALED_MAGIC, TAG_SIZE};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encrypt plaintext into a legacy CBC container.
///
/// Output layout: `[salt(16)][iv(16)][ciphertext]`, where the ciphertext is
/// the PKCS#7-padded plaintext, so the container length is always
/// `32 + (len - len % 16 + 16)`.
pub fn encrypt(
    plaintext: &[u8],
    secret: &MasterSecret,
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut iv = [0u8; BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut iv);

    let key = derive_key(secret.as_bytes(), &salt, iterations)?;
    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), (&iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut container = Vec::with_capacity(SALT_SIZE + BLOCK_SIZE + ciphertext.len());
    container.extend_from_slice(&salt);
    container.extend_from_slice(&iv);
    container.extend_from_slice(&ciphertext);
    Ok(container)
}

/// Decrypt a legacy CBC container.
///
/// Pure and repeatable for a fixed container. A wrong secret produces
/// garbage padding and is rejected as [`CryptoError::CorruptData`] with
/// overwhelming probability; it is not a cryptographic guarantee (see
/// [`open`] for the authenticated path).
pub fn decrypt(
    container: &[u8],
    secret: &MasterSecret,
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    // Minimum: salt + IV + one padded block.
    if container.len() < SALT_SIZE + BLOCK_SIZE + BLOCK_SIZE {
        return Err(CryptoError::CorruptData(format!(
            "container too short: {} bytes (minimum {})",
            container.len(),
            SALT_SIZE + BLOCK_SIZE + BLOCK_SIZE
        )));
    }

    let (salt, rest) = container.split_at(SALT_SIZE);
    let (iv, ciphertext) = rest.split_at(BLOCK_SIZE);

    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::CorruptData(format!(
            "ciphertext length {} is not a multiple of the block size",
            ciphertext.len()
        )));
    }

    let key = derive_key(secret.as_bytes(), salt, iterations)?;
    let decryptor = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| CryptoError::CorruptData(format!("cipher init: {e}")))?;

    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::CorruptData("bad padding: wrong secret or corrupted data".into()))
}

/// Encrypt plaintext into a sealed (authenticated, versioned) container.
///
/// Output layout: `["BBX1"][salt(16)][nonce(24)][ciphertext + tag(16)]`.
pub fn seal(
    plaintext: &[u8],
    secret: &MasterSecret,
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let key = derive_key(secret.as_bytes(), &salt, iterations)?;
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Encrypt(format!("sealing failed: {e}")))?;

    let mut container =
        Vec::with_capacity(SEALED_MAGIC.len() + SALT_SIZE + NONCE_SIZE + ciphertext.len());
    container.extend_from_slice(SEALED_MAGIC);
    container.extend_from_slice(&salt);
    container.extend_from_slice(&nonce_bytes);
    container.extend_from_slice(&ciphertext);
    Ok(container)
}

/// Decrypt a container of either layout.
///
/// Sealed containers are recognized by the magic prefix; anything else is
/// treated as legacy CBC. A legacy container whose random salt happens to
/// start with the magic bytes would be misrouted, at odds of 2^-32.
pub fn open(
    container: &[u8],
    secret: &MasterSecret,
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    if container.starts_with(SEALED_MAGIC) {
        open_sealed(container, secret, iterations)
    } else {
        decrypt(container, secret, iterations)
    }
}

fn open_sealed(
    container: &[u8],
    secret: &MasterSecret,
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    let min = SEALED_MAGIC.len() + SALT_SIZE + NONCE_SIZE + TAG_SIZE;
    if container.len() < min {
        return Err(CryptoError::CorruptData(format!(
            "sealed container too short: {} bytes (minimum {min})",
            container.len()
        )));
    }

    let body = &container[SEALED_MAGIC.len()..];
    let (salt, rest) = body.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);
    let nonce = XNonce::from_slice(nonce_bytes);

    let key = derive_key(secret.as_bytes(), salt, iterations)?;
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher.decrypt(nonce, ciphertext).map_err(|_| {
        CryptoError::CorruptData("authentication failed: wrong secret or corrupted data".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ITERATIONS: u32 = 1_000;

    fn secret(bytes: &[u8]) -> MasterSecret {
        MasterSecret::new(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_cbc_roundtrip() {
        let s = secret(b"test-secret");
        for plaintext in [
            &b""[..],
            b"a",
            b"exactly 16 bytes",
            b"seventeen bytes..",
            b"hello world",
        ] {
            let container = encrypt(plaintext, &s, TEST_ITERATIONS).unwrap();
            let recovered = decrypt(&container, &s, TEST_ITERATIONS).unwrap();
            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn test_cbc_container_length() {
        let s = secret(b"test-secret");

        // Padding always rounds up to the next full block.
        for (plain_len, padded_len) in [(0, 16), (11, 16), (16, 32), (17, 32)] {
            let container = encrypt(&vec![0x42; plain_len], &s, TEST_ITERATIONS).unwrap();
            assert_eq!(container.len(), SALT_SIZE + BLOCK_SIZE + padded_len);
            assert_eq!((container.len() - 32) % BLOCK_SIZE, 0);
        }
    }

    #[test]
    fn test_cbc_nondeterministic() {
        let s = secret(b"test-secret");
        let a = encrypt(b"same plaintext", &s, TEST_ITERATIONS).unwrap();
        let b = encrypt(b"same plaintext", &s, TEST_ITERATIONS).unwrap();

        assert_ne!(a, b, "fresh salt/IV must yield distinct containers");
        assert_eq!(decrypt(&a, &s, TEST_ITERATIONS).unwrap(), b"same plaintext");
        assert_eq!(decrypt(&b, &s, TEST_ITERATIONS).unwrap(), b"same plaintext");
    }

    #[test]
    fn test_cbc_wrong_secret() {
        let container = encrypt(b"hello world", &secret(b"test-secret"), TEST_ITERATIONS).unwrap();
        let result = decrypt(&container, &secret(b"wrong-secret"), TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::CorruptData(_))));
    }

    #[test]
    fn test_cbc_truncated_container() {
        let s = secret(b"test-secret");
        let container = encrypt(b"hello world", &s, TEST_ITERATIONS).unwrap();

        for len in [0, 1, 16, 31, 32] {
            let result = decrypt(&container[..len], &s, TEST_ITERATIONS);
            assert!(
                matches!(result, Err(CryptoError::CorruptData(_))),
                "truncation to {len} bytes must fail"
            );
        }
    }

    #[test]
    fn test_cbc_ragged_ciphertext_length() {
        let s = secret(b"test-secret");
        let mut container = encrypt(b"hello world", &s, TEST_ITERATIONS).unwrap();
        container.push(0);
        let result = decrypt(&container, &s, TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::CorruptData(_))));
    }

    /// 11 bytes pad to one block: 16 salt + 16 IV + 16 ciphertext = 48.
    #[test]
    fn test_cbc_hello_world_scenario() {
        let s = secret(b"test-secret");
        let container = encrypt(b"hello world", &s, TEST_ITERATIONS).unwrap();
        assert_eq!(container.len(), 48);
        assert_eq!(decrypt(&container, &s, TEST_ITERATIONS).unwrap(), b"hello world");

        let result = decrypt(&container, &secret(b"wrong-secret"), TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::CorruptData(_))));
    }

    #[test]
    fn test_sealed_roundtrip() {
        let s = secret(b"test-secret");
        for plaintext in [&b""[..], b"hello world", &[0u8; 1000]] {
            let container = seal(plaintext, &s, TEST_ITERATIONS).unwrap();
            assert!(container.starts_with(SEALED_MAGIC));
            let recovered = open(&container, &s, TEST_ITERATIONS).unwrap();
            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn test_sealed_wrong_secret() {
        let container = seal(b"hello world", &secret(b"test-secret"), TEST_ITERATIONS).unwrap();
        let result = open(&container, &secret(b"wrong-secret"), TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::CorruptData(_))));
    }

    #[test]
    fn test_sealed_tamper_detected() {
        let s = secret(b"test-secret");
        let mut container = seal(b"hello world", &s, TEST_ITERATIONS).unwrap();
        let last = container.len() - 1;
        container[last] ^= 0xFF;

        let result = open(&container, &s, TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::CorruptData(_))));
    }

    #[test]
    fn test_sealed_truncated() {
        let s = secret(b"test-secret");
        let container = seal(b"hello world", &s, TEST_ITERATIONS).unwrap();
        let result = open(&container[..SEALED_MAGIC.len() + SALT_SIZE], &s, TEST_ITERATIONS);
        assert!(matches!(result, Err(CryptoError::CorruptData(_))));
    }

    #[test]
    fn test_open_handles_legacy() {
        let s = secret(b"test-secret");
        let legacy = encrypt(b"pre-upgrade document", &s, TEST_ITERATIONS).unwrap();
        assert_eq!(
            open(&legacy, &s, TEST_ITERATIONS).unwrap(),
            b"pre-upgrade document"
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_cbc_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..512)) {
                let s = secret(b"prop-secret");
                let container = encrypt(&plaintext, &s, 100).unwrap();
                prop_assert_eq!((container.len() - 32) % BLOCK_SIZE, 0);
                prop_assert_eq!(decrypt(&container, &s, 100).unwrap(), plaintext);
            }

            #[test]
            fn prop_sealed_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..512)) {
                let s = secret(b"prop-secret");
                let container = seal(&plaintext, &s, 100).unwrap();
                prop_assert_eq!(open(&container, &s, 100).unwrap(), plaintext);
            }
        }
    }
}
