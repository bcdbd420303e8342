//! Credentials in, session out

use secrecy::SecretString;
use snbench_crypto::KeySet;

/// Canonical sync endpoint used when no override is configured
pub const DEFAULT_SERVER: &str = "https://sync.standardnotes.org";

/// What is needed to sign in
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
    pub server: String,
}

impl Credentials {
    /// Build credentials, falling back to [`DEFAULT_SERVER`] when `server`
    /// is absent or blank.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        server: Option<String>,
    ) -> Self {
        let server = server
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
            server,
        }
    }
}

/// An authenticated session. Immutable once created; lives for one
/// benchmark iteration and is never persisted.
#[derive(Debug)]
pub struct Session {
    server: String,
    token: SecretString,
    keys: KeySet,
}

impl Session {
    pub fn new(server: impl Into<String>, token: impl Into<String>, keys: KeySet) -> Self {
        Self {
            server: server.into(),
            token: SecretString::new(token.into()),
            keys,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }
}
