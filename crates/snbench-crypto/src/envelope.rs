//! Sealed string envelope, protocol version 003
//!
//! Layout: `003:<auth hash hex>:<uuid>:<iv hex>:<base64 ciphertext>`
//!
//! The auth hash is HMAC-SHA256 over `003:<uuid>:<iv hex>:<base64
//! ciphertext>`. It is checked before anything is decrypted. The uuid must
//! match the item the envelope is attached to, so an envelope copied onto
//! another item fails to open.
//!
//! Items stored unencrypted carry `000<base64 json>` instead; see
//! [`decode_plain`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::hmac;
use zeroize::Zeroizing;

use crate::cipher::{self, IV_SIZE};
use crate::{CryptoError, Result};

pub const VERSION: &str = "003";
/// Prefix of unencrypted payloads
pub const PLAIN_VERSION: &str = "000";

fn auth_message(uuid: &str, iv: &str, ciphertext: &str) -> String {
    format!("{VERSION}:{uuid}:{iv}:{ciphertext}")
}

/// Encrypt `plaintext` under `encryption_key` and MAC it with `auth_key`.
pub fn seal(
    encryption_key: &[u8],
    auth_key: &[u8],
    uuid: &str,
    plaintext: &[u8],
) -> Result<String> {
    seal_with_iv(encryption_key, auth_key, uuid, &cipher::generate_iv(), plaintext)
}

fn seal_with_iv(
    encryption_key: &[u8],
    auth_key: &[u8],
    uuid: &str,
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
) -> Result<String> {
    let ciphertext = STANDARD.encode(cipher::encrypt(encryption_key, iv, plaintext)?);
    let iv = hex::encode(iv);

    let mac_key = hmac::Key::new(hmac::HMAC_SHA256, auth_key);
    let tag = hmac::sign(&mac_key, auth_message(uuid, &iv, &ciphertext).as_bytes());

    Ok(format!(
        "{VERSION}:{}:{uuid}:{iv}:{ciphertext}",
        hex::encode(tag.as_ref())
    ))
}

/// Verify and decrypt an envelope sealed for item `uuid`.
pub fn open(
    encryption_key: &[u8],
    auth_key: &[u8],
    uuid: &str,
    sealed: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    let fields: Vec<&str> = sealed.splitn(5, ':').collect();
    let [version, hash, found_uuid, iv, ciphertext] = fields[..] else {
        let prefix = sealed.get(..3).unwrap_or_default();
        if prefix != VERSION && prefix.len() == 3 && prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CryptoError::UnsupportedVersion(prefix.to_string()));
        }
        return Err(CryptoError::MalformedEnvelope(
            "expected five ':'-separated fields".into(),
        ));
    };

    if version != VERSION {
        return Err(CryptoError::UnsupportedVersion(version.to_string()));
    }
    if found_uuid != uuid {
        return Err(CryptoError::UuidMismatch {
            expected: uuid.to_string(),
            found: found_uuid.to_string(),
        });
    }

    let tag = hex::decode(hash)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("auth hash: {e}")))?;
    let mac_key = hmac::Key::new(hmac::HMAC_SHA256, auth_key);
    hmac::verify(&mac_key, auth_message(uuid, iv, ciphertext).as_bytes(), &tag)
        .map_err(|_| CryptoError::AuthHashMismatch)?;

    let iv = hex::decode(iv).map_err(|e| CryptoError::MalformedEnvelope(format!("iv: {e}")))?;
    let ciphertext = STANDARD
        .decode(ciphertext)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("ciphertext: {e}")))?;

    cipher::decrypt(encryption_key, &iv, &ciphertext)
}

/// Whether `payload` is an unencrypted `000` payload
pub fn is_plain(payload: &str) -> bool {
    payload.starts_with(PLAIN_VERSION)
}

/// Decode a `000<base64>` payload
pub fn decode_plain(payload: &str) -> Result<Zeroizing<Vec<u8>>> {
    let body = payload
        .strip_prefix(PLAIN_VERSION)
        .ok_or_else(|| CryptoError::UnsupportedVersion(payload.chars().take(3).collect()))?;
    STANDARD
        .decode(body)
        .map(Zeroizing::new)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("plain payload: {e}")))
}
