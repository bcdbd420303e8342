//! HTTP client for the sync server

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use snbench_crypto::{derive_keys, password_salt};
use tracing::{debug, warn};

use crate::{Credentials, EncryptedItem, Result, Session, SyncError, SyncService};

/// API revision sent with every request
const API_VERSION: &str = "20190520";
/// The server refuses sync requests carrying more items than this
pub const PUT_BATCH_LIMIT: usize = 150;
/// Page size requested when downloading
const PAGE_LIMIT: usize = 150;

#[derive(Debug, Deserialize)]
struct AuthParams {
    identifier: Option<String>,
    pw_cost: u32,
    pw_nonce: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    api: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    api: &'a str,
    items: &'a [EncryptedItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor_token: Option<&'a str>,
    limit: usize,
}

#[derive(Debug, Default, Deserialize)]
struct SyncResponse {
    #[serde(default)]
    retrieved_items: Vec<EncryptedItem>,
    #[serde(default)]
    saved_items: Vec<EncryptedItem>,
    #[serde(default)]
    unsaved: Vec<serde_json::Value>,
    cursor_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Sync client over reqwest. One instance can serve many sessions.
#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    client: reqwest::Client,
}

impl Default for HttpSyncClient {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl HttpSyncClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose requests fail once `timeout` elapses
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn sync_request(
        &self,
        session: &Session,
        body: &SyncRequest<'_>,
    ) -> Result<SyncResponse> {
        let resp = self
            .client
            .post(format!("{}/items/sync", session.server()))
            .bearer_auth(session.token().expose_secret())
            .json(body)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

/// Turn a non-2xx response into [`SyncError::Status`], keeping the server's
/// error message when it sent one.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error.message)
        .unwrap_or(text);
    Err(SyncError::Status {
        status: status.as_u16(),
        message,
    })
}

fn auth_failure(err: SyncError) -> SyncError {
    match err {
        SyncError::Status { message, .. } => SyncError::Auth(message),
        other => other,
    }
}

#[async_trait]
impl SyncService for HttpSyncClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let server = credentials.server.trim_end_matches('/');

        let resp = self
            .client
            .get(format!("{server}/auth/params"))
            .query(&[("email", credentials.email.as_str()), ("api", API_VERSION)])
            .send()
            .await?;
        let params: AuthParams = check_status(resp)
            .await
            .map_err(auth_failure)?
            .json()
            .await?;
        debug!(version = %params.version, cost = params.pw_cost, "fetched auth params");

        if params.pw_cost == 0 {
            return Err(SyncError::Auth("server sent a zero password cost".into()));
        }
        if let Some(identifier) = &params.identifier {
            if identifier != &credentials.email {
                warn!(%identifier, "server returned auth params for a different identifier");
            }
        }

        let salt = password_salt(
            &credentials.email,
            &params.version,
            params.pw_cost,
            &params.pw_nonce,
        );
        let derived = derive_keys(credentials.password.expose_secret(), &salt, params.pw_cost)?;

        let resp = self
            .client
            .post(format!("{server}/auth/sign_in"))
            .json(&SignInRequest {
                api: API_VERSION,
                email: &credentials.email,
                password: &derived.server_password,
            })
            .send()
            .await?;
        let signed_in: SignInResponse = check_status(resp)
            .await
            .map_err(auth_failure)?
            .json()
            .await?;

        Ok(Session::new(server, signed_in.token, derived.keys))
    }

    async fn get_items(&self, session: &Session) -> Result<Vec<EncryptedItem>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen: HashSet<String> = HashSet::new();

        loop {
            let page = self
                .sync_request(
                    session,
                    &SyncRequest {
                        api: API_VERSION,
                        items: &[],
                        cursor_token: cursor.as_deref(),
                        limit: PAGE_LIMIT,
                    },
                )
                .await?;
            debug!(count = page.retrieved_items.len(), "retrieved page");
            items.extend(page.retrieved_items);

            let Some(next) = page.cursor_token.filter(|c| !c.is_empty()) else {
                break;
            };
            if !seen.insert(next.clone()) {
                warn!(cursor = %next, "server revisited a cursor token, stopping pagination");
                break;
            }
            cursor = Some(next);
        }

        Ok(items)
    }

    async fn put_items(&self, session: &Session, items: &[EncryptedItem]) -> Result<()> {
        for chunk in items.chunks(PUT_BATCH_LIMIT) {
            let resp = self
                .sync_request(
                    session,
                    &SyncRequest {
                        api: API_VERSION,
                        items: chunk,
                        cursor_token: None,
                        limit: PAGE_LIMIT,
                    },
                )
                .await?;

            if !resp.unsaved.is_empty() {
                return Err(SyncError::Rejected {
                    count: resp.unsaved.len(),
                });
            }
            debug!(sent = chunk.len(), saved = resp.saved_items.len(), "pushed batch");
        }
        Ok(())
    }
}
