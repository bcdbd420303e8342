//! Session provider

use secrecy::ExposeSecret;
use snbench_sync::{Credentials, Session, SyncService};
use tracing::debug;

use crate::{CoreError, Result};

/// Turns a fixed set of credentials into fresh sessions, one sign-in per
/// call.
pub struct SessionProvider<'a, S: SyncService + ?Sized> {
    service: &'a S,
    credentials: Credentials,
}

impl<'a, S: SyncService + ?Sized> SessionProvider<'a, S> {
    pub fn new(service: &'a S, credentials: Credentials) -> Self {
        Self {
            service,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Check credentials, then sign in. Incomplete credentials fail with
    /// [`CoreError::Config`] without touching the network.
    pub async fn authenticate(&self) -> Result<Session> {
        validate(&self.credentials)?;
        debug!(server = %self.credentials.server, "signing in");
        self.service
            .sign_in(&self.credentials)
            .await
            .map_err(CoreError::Auth)
    }
}

fn validate(credentials: &Credentials) -> Result<()> {
    if credentials.email.trim().is_empty() {
        return Err(CoreError::Config("account email is required".into()));
    }
    if credentials.password.expose_secret().is_empty() {
        return Err(CoreError::Config("account password is required".into()));
    }
    if credentials.server.trim().is_empty() {
        return Err(CoreError::Config("server URL is required".into()));
    }
    Ok(())
}
