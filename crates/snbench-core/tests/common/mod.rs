//! In-memory sync server for exercising the core without a network

#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use snbench_core::codec::encrypt_all;
use snbench_core::Item;
use snbench_crypto::{envelope, ItemKey, KeySet};
use snbench_sync::{Credentials, EncryptedItem, Result, Session, SyncError, SyncService};

pub const EMAIL: &str = "bench@example.com";
pub const PASSWORD: &str = "correct horse";
pub const SERVER: &str = "http://sync.invalid";

#[derive(Default)]
pub struct Calls {
    pub sign_in: usize,
    pub get: usize,
    /// Size of every put, in order
    pub puts: Vec<usize>,
    /// Items of the most recent put, as uploaded
    pub last_put: Vec<EncryptedItem>,
}

#[derive(Default)]
pub struct Failures {
    pub get: bool,
    pub put: bool,
    /// Fail puts made after this many successful ones
    pub put_after: Option<usize>,
}

/// Stores what it is given. Deleted items are kept as stripped tombstones,
/// the way the real server reports them.
pub struct MemoryService {
    keys: KeySet,
    items: Mutex<Vec<EncryptedItem>>,
    calls: Mutex<Calls>,
    pub failures: Mutex<Failures>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self {
            keys: KeySet::generate(),
            items: Mutex::new(Vec::new()),
            calls: Mutex::new(Calls::default()),
            failures: Mutex::new(Failures::default()),
        }
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    /// Seed the store as if another client had uploaded `items`
    pub fn seed(&self, items: &[Item]) {
        let encrypted = encrypt_all(items, &self.keys).unwrap();
        self.items.lock().unwrap().extend(encrypted);
    }

    /// Seed an item whose decrypted content is exactly `json`, the way an
    /// official client holding the same account keys would write it
    pub fn seed_json(&self, content_type: &str, json: &str) -> EncryptedItem {
        let item = seal_json(&self.keys, content_type, json);
        self.seed_raw(item.clone());
        item
    }

    pub fn seed_raw(&self, item: EncryptedItem) {
        self.items.lock().unwrap().push(item);
    }

    pub fn stored(&self) -> Vec<EncryptedItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn live_count(&self, content_type: &str) -> usize {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| !i.deleted && i.content_type == content_type)
            .count()
    }

    pub fn calls(&self) -> MutexGuard<'_, Calls> {
        self.calls.lock().unwrap()
    }

    pub fn session(&self) -> Session {
        Session::new(SERVER, "token", self.keys.clone())
    }
}

pub fn seal_json(keys: &KeySet, content_type: &str, json: &str) -> EncryptedItem {
    let uuid = uuid::Uuid::new_v4();
    let id = uuid.to_string();
    let item_key = ItemKey::generate();
    let content =
        envelope::seal(item_key.encryption_key(), item_key.auth_key(), &id, json.as_bytes())
            .unwrap();
    let enc_item_key = envelope::seal(
        keys.master_key(),
        keys.auth_key(),
        &id,
        item_key.to_hex().as_bytes(),
    )
    .unwrap();
    EncryptedItem {
        uuid,
        content: Some(content),
        content_type: content_type.to_string(),
        enc_item_key: Some(enc_item_key),
        deleted: false,
        created_at: None,
        updated_at: None,
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(EMAIL, PASSWORD, Some(SERVER.to_string()))
}

#[async_trait]
impl SyncService for MemoryService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        self.calls.lock().unwrap().sign_in += 1;
        if credentials.email != EMAIL || credentials.password.expose_secret() != PASSWORD {
            return Err(SyncError::Auth("Invalid email or password.".into()));
        }
        Ok(self.session())
    }

    async fn get_items(&self, _session: &Session) -> Result<Vec<EncryptedItem>> {
        self.calls.lock().unwrap().get += 1;
        if self.failures.lock().unwrap().get {
            return Err(SyncError::Status {
                status: 500,
                message: "get failed".into(),
            });
        }
        Ok(self.stored())
    }

    async fn put_items(&self, _session: &Session, items: &[EncryptedItem]) -> Result<()> {
        let done = {
            let mut calls = self.calls.lock().unwrap();
            calls.puts.push(items.len());
            calls.last_put = items.to_vec();
            calls.puts.len() - 1
        };
        let failures = self.failures.lock().unwrap();
        if failures.put || failures.put_after.map_or(false, |n| done >= n) {
            return Err(SyncError::Rejected { count: items.len() });
        }
        drop(failures);

        let mut stored = self.items.lock().unwrap();
        for item in items {
            stored.retain(|i| i.uuid != item.uuid);
            let mut saved = item.clone();
            if saved.deleted {
                saved.content = None;
                saved.enc_item_key = None;
            }
            stored.push(saved);
        }
        Ok(())
    }
}
