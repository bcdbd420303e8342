//! AES-256-CBC with PKCS#7 padding
//!
//! Used for both layers of an item: the content under its per-item key,
//! and the per-item key under the account master key. Integrity comes from
//! the HMAC in [`crate::envelope`], never from this layer.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::{CryptoError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// 256-bit key (32 bytes)
pub const KEY_SIZE: usize = 32;
/// 128-bit IV (16 bytes)
pub const IV_SIZE: usize = 16;

/// Generate a cryptographically secure random key
pub fn generate_key() -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(&mut key[..]);
    key
}

/// Generate a random IV. Every encryption needs a fresh one.
pub fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

fn check_sizes(key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        });
    }
    if iv.len() != IV_SIZE {
        return Err(CryptoError::MalformedEnvelope(format!(
            "iv must be {IV_SIZE} bytes, got {}",
            iv.len()
        )));
    }
    Ok(())
}

/// Encrypt and pad `plaintext`. Returns the raw ciphertext without the IV.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    check_sizes(key, iv)?;
    let cipher =
        Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CryptoError::EncryptionFailed)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt and unpad output of [`encrypt`]
pub fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    check_sizes(key, iv)?;
    let cipher =
        Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CryptoError::DecryptionFailed)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::DecryptionFailed)
}
