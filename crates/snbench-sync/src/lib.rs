//! snbench Sync - talking to the notes sync server
//!
//! The benchmark core only ever sees the [`SyncService`] trait. The HTTP
//! implementation here speaks the Standard Notes style REST API:
//! `auth/params`, `auth/sign_in` and `items/sync`.

pub mod client;
pub mod item;
pub mod service;
pub mod session;

pub use client::HttpSyncClient;
pub use item::EncryptedItem;
pub use service::SyncService;
pub use session::{Credentials, Session, DEFAULT_SERVER};

use snbench_crypto::CryptoError;

/// Errors from the sync server or the path to it
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Server rejected {count} item(s)")]
    Rejected { count: usize },

    #[error("Key derivation failed: {0}")]
    Crypto(#[from] CryptoError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
