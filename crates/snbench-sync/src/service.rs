//! The seam between the benchmark core and the server

use async_trait::async_trait;

use crate::{Credentials, EncryptedItem, Result, Session};

/// Remote operations the benchmark drives.
///
/// Only [`EncryptedItem`]s cross this boundary, so nothing reaches the
/// server in plaintext.
#[async_trait]
pub trait SyncService: Send + Sync {
    /// Authenticate and derive the session's key material
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;

    /// Fetch every item stored for the session's account
    async fn get_items(&self, session: &Session) -> Result<Vec<EncryptedItem>>;

    /// Upload items; succeeds only if the server saved all of them
    async fn put_items(&self, session: &Session, items: &[EncryptedItem]) -> Result<()>;
}
