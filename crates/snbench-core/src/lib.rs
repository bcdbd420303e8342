//! snbench Core - the measured sync-and-purge cycle
//!
//! Authenticate, generate a deterministic batch of notes, encrypt, push,
//! and optionally purge. Everything remote goes through
//! [`snbench_sync::SyncService`]; everything cryptographic goes through
//! [`codec`].

pub mod bench;
pub mod codec;
pub mod config;
pub mod filter;
pub mod generator;
pub mod model;
pub mod purge;
pub mod report;
pub mod session;

pub use bench::Benchmark;
pub use config::BenchConfig;
pub use filter::{Filter, FilterSet, MatchMode};
pub use generator::generate_batch;
pub use model::{Content, ContentType, Item, NoteContent, TagContent};
pub use purge::purge;
pub use report::{OperationKind, Report, TimingSample};
pub use session::SessionProvider;

use std::fmt;

use snbench_crypto::CryptoError;
use snbench_sync::SyncError;

/// Purge stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeStep {
    Retrieve,
    Decrypt,
    Encrypt,
    Submit,
}

impl PurgeStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Decrypt => "decrypt",
            Self::Encrypt => "encrypt",
            Self::Submit => "submit",
        }
    }

    pub(crate) fn wrap(self, source: CoreError) -> CoreError {
        CoreError::Purge {
            step: self,
            source: Box::new(source),
        }
    }
}

impl fmt::Display for PurgeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core errors
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(#[source] SyncError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Transport error: {0}")]
    Transport(#[source] SyncError),

    #[error("Purge failed at {step} step: {source}")]
    Purge {
        step: PurgeStep,
        #[source]
        source: Box<CoreError>,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
