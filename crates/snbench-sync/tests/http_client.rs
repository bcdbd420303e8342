//! HttpSyncClient against an in-process server speaking the sync API

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use snbench_crypto::{derive_keys, password_salt};
use snbench_sync::client::PUT_BATCH_LIMIT;
use snbench_sync::{Credentials, EncryptedItem, HttpSyncClient, SyncError, SyncService};
use uuid::Uuid;

const EMAIL: &str = "bench@example.com";
const PASSWORD: &str = "correct horse";
const COST: u32 = 1000;
const NONCE: &str = "5f0a8c1e";
const TOKEN: &str = "session-token";
const PAGE_SIZE: usize = 3;

#[derive(Default)]
struct ServerState {
    items: Vec<EncryptedItem>,
    put_batches: Vec<usize>,
    sync_calls: usize,
    /// Hand this cursor back instead of ending the listing
    wrap_cursor: Option<String>,
}

type Shared = Arc<Mutex<ServerState>>;

fn expected_server_password() -> String {
    let salt = password_salt(EMAIL, "003", COST, NONCE);
    derive_keys(PASSWORD, &salt, COST)
        .unwrap()
        .server_password
        .to_string()
}

async fn auth_params(Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if q.get("email").map(String::as_str) != Some(EMAIL) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"message": "No account with that email."}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "identifier": EMAIL,
            "pw_cost": COST,
            "pw_nonce": NONCE,
            "version": "003"
        })),
    )
}

async fn sign_in(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == EMAIL && body["password"] == expected_server_password() {
        (
            StatusCode::OK,
            Json(json!({"token": TOKEN, "user": {"email": EMAIL}})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid email or password."}})),
        )
    }
}

async fn sync(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid login credentials."}})),
        );
    }

    let mut state = state.lock().unwrap();
    state.sync_calls += 1;

    let incoming: Vec<EncryptedItem> = serde_json::from_value(body["items"].clone()).unwrap();
    if !incoming.is_empty() {
        state.put_batches.push(incoming.len());
        for item in &incoming {
            state.items.retain(|i| i.uuid != item.uuid);
            state.items.push(item.clone());
        }
        return (
            StatusCode::OK,
            Json(json!({"retrieved_items": [], "saved_items": incoming, "unsaved": []})),
        );
    }

    let offset: usize = body["cursor_token"]
        .as_str()
        .map(|c| c.parse().unwrap())
        .unwrap_or(0);
    let page: Vec<EncryptedItem> = state
        .items
        .iter()
        .skip(offset)
        .take(PAGE_SIZE)
        .cloned()
        .collect();
    let next = offset + page.len();
    let cursor = if next < state.items.len() {
        Value::String(next.to_string())
    } else {
        state.wrap_cursor.clone().map_or(Value::Null, Value::String)
    };
    (
        StatusCode::OK,
        Json(json!({"retrieved_items": page, "saved_items": [], "cursor_token": cursor})),
    )
}

async fn start_server() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(ServerState::default()));
    let app = Router::new()
        .route("/auth/params", get(auth_params))
        .route("/auth/sign_in", post(sign_in))
        .route("/items/sync", post(sync))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn fake_item() -> EncryptedItem {
    EncryptedItem {
        uuid: Uuid::new_v4(),
        content: Some("003:00:opaque".into()),
        content_type: "Note".into(),
        enc_item_key: Some("003:00:opaque".into()),
        deleted: false,
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn test_sign_in_derives_matching_keys() {
    let (server, _) = start_server().await;
    let client = HttpSyncClient::new();

    let session = client
        .sign_in(&Credentials::new(EMAIL, PASSWORD, Some(format!("{server}/"))))
        .await
        .unwrap();

    let salt = password_salt(EMAIL, "003", COST, NONCE);
    let expected = derive_keys(PASSWORD, &salt, COST).unwrap();
    assert_eq!(session.keys().master_key(), expected.keys.master_key());
    assert_eq!(session.server(), server);
}

#[tokio::test]
async fn test_wrong_password_is_auth_error() {
    let (server, _) = start_server().await;
    let client = HttpSyncClient::new();

    let err = client
        .sign_in(&Credentials::new(EMAIL, "wrong", Some(server)))
        .await
        .unwrap_err();

    match err {
        SyncError::Auth(message) => assert!(message.contains("Invalid email or password")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_account_is_auth_error() {
    let (server, _) = start_server().await;
    let err = HttpSyncClient::new()
        .sign_in(&Credentials::new("nobody@example.com", PASSWORD, Some(server)))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Auth(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpSyncClient::new()
        .sign_in(&Credentials::new(EMAIL, PASSWORD, Some(format!("http://{addr}"))))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
}

#[tokio::test]
async fn test_put_splits_into_server_sized_batches() {
    let (server, state) = start_server().await;
    let client = HttpSyncClient::new();
    let session = client
        .sign_in(&Credentials::new(EMAIL, PASSWORD, Some(server)))
        .await
        .unwrap();

    let items: Vec<EncryptedItem> = (0..PUT_BATCH_LIMIT + 10).map(|_| fake_item()).collect();
    client.put_items(&session, &items).await.unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.put_batches, vec![PUT_BATCH_LIMIT, 10]);
    assert_eq!(state.items.len(), PUT_BATCH_LIMIT + 10);
}

#[tokio::test]
async fn test_get_follows_cursor_pages() {
    let (server, state) = start_server().await;
    let client = HttpSyncClient::new();
    let session = client
        .sign_in(&Credentials::new(EMAIL, PASSWORD, Some(server)))
        .await
        .unwrap();

    let items: Vec<EncryptedItem> = (0..8).map(|_| fake_item()).collect();
    client.put_items(&session, &items).await.unwrap();

    let fetched = client.get_items(&session).await.unwrap();
    assert_eq!(fetched, items);

    // one put plus ceil(8 / 3) pages
    assert_eq!(state.lock().unwrap().sync_calls, 1 + 3);
}

#[tokio::test]
async fn test_get_stops_when_cursors_cycle() {
    let (server, state) = start_server().await;
    let client = HttpSyncClient::new();
    let session = client
        .sign_in(&Credentials::new(EMAIL, PASSWORD, Some(server)))
        .await
        .unwrap();

    let items: Vec<EncryptedItem> = (0..8).map(|_| fake_item()).collect();
    client.put_items(&session, &items).await.unwrap();
    // after the last page the server points back at the second page
    state.lock().unwrap().wrap_cursor = Some(PAGE_SIZE.to_string());

    let fetched = client.get_items(&session).await.unwrap();
    assert_eq!(fetched, items);
    assert_eq!(state.lock().unwrap().sync_calls, 1 + 3);
}

#[tokio::test]
async fn test_get_on_empty_account() {
    let (server, _) = start_server().await;
    let client = HttpSyncClient::new();
    let session = client
        .sign_in(&Credentials::new(EMAIL, PASSWORD, Some(server)))
        .await
        .unwrap();

    assert!(client.get_items(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_token_is_status_error() {
    let (server, _) = start_server().await;
    let client = HttpSyncClient::new();
    let session = snbench_sync::Session::new(server, "stale", snbench_crypto::KeySet::generate());

    let err = client.get_items(&session).await.unwrap_err();
    match err {
        SyncError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid login credentials.");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
