//! snbench Crypto - item encryption for the sync benchmark
//!
//! This crate provides:
//! - Account key derivation (PBKDF2-SHA512 split into server password,
//!   master key and auth key)
//! - Random per-item keys
//! - AES-256-CBC encryption
//! - The `003` sealed string envelope (HMAC-SHA256 over the IV and
//!   ciphertext) stored in item `content` / `enc_item_key`
//!
//! No network I/O happens here. Everything is a pure transform over key
//! material handed in by the caller.

pub mod cipher;
pub mod envelope;
pub mod keys;

pub use keys::{derive_keys, password_salt, DerivedKeys, ItemKey, KeySet};

/// Errors that can occur in cryptographic operations
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed - data may be corrupted or tampered")]
    DecryptionFailed,

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(String),

    #[error("Envelope belongs to item {found}, expected {expected}")]
    UuidMismatch { expected: String, found: String },

    #[error("Auth hash mismatch")]
    AuthHashMismatch,

    #[error("Malformed item payload: {0}")]
    MalformedPayload(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
