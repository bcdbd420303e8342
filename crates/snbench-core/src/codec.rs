//! Encryption adapter between plaintext [`Item`]s and wire [`EncryptedItem`]s
//!
//! Each item gets a fresh random [`ItemKey`]. The content JSON is sealed
//! under the item key, and the item key (as hex) is sealed under the account
//! master and auth keys. Both envelopes are bound to the item uuid.
//!
//! Batch calls are all-or-nothing: the first failure discards everything.

use snbench_crypto::{envelope, CryptoError, ItemKey, KeySet};
use snbench_sync::EncryptedItem;

use crate::model::{Content, ContentType, Item};
use crate::Result;

fn malformed_payload(uuid: &str, err: serde_json::Error) -> CryptoError {
    CryptoError::MalformedPayload(format!("item {uuid}: {err}"))
}

pub fn encrypt_item(item: &Item, keys: &KeySet) -> Result<EncryptedItem> {
    let uuid = item.uuid.to_string();
    let item_key = ItemKey::generate();

    let plaintext = item
        .content
        .to_json()
        .map_err(|e| malformed_payload(&uuid, e))?;
    let content = envelope::seal(
        item_key.encryption_key(),
        item_key.auth_key(),
        &uuid,
        &plaintext,
    )?;
    let enc_item_key = envelope::seal(
        keys.master_key(),
        keys.auth_key(),
        &uuid,
        item_key.to_hex().as_bytes(),
    )?;

    Ok(EncryptedItem {
        uuid: item.uuid,
        content: Some(content),
        content_type: item.content_type.as_str().to_string(),
        enc_item_key: Some(enc_item_key),
        deleted: item.deleted,
        created_at: item.created_at,
        updated_at: item.updated_at,
    })
}

pub fn decrypt_item(item: &EncryptedItem, keys: &KeySet) -> Result<Item> {
    let uuid = item.uuid.to_string();
    let content_type = ContentType::from(item.content_type.as_str());

    let plaintext = match (&item.content, &item.enc_item_key) {
        (Some(content), _) if envelope::is_plain(content) => {
            Some(envelope::decode_plain(content)?)
        }
        (Some(content), Some(enc_item_key)) => {
            let key_hex = envelope::open(keys.master_key(), keys.auth_key(), &uuid, enc_item_key)?;
            let item_key = ItemKey::from_hex(&key_hex)?;
            Some(envelope::open(
                item_key.encryption_key(),
                item_key.auth_key(),
                &uuid,
                content,
            )?)
        }
        // Server-side tombstones come back stripped
        (None, _) if item.deleted => None,
        (None, _) => {
            return Err(
                CryptoError::MalformedEnvelope(format!("item {uuid} has no content")).into(),
            );
        }
        (Some(_), None) => {
            return Err(
                CryptoError::MalformedEnvelope(format!("item {uuid} has no item key")).into(),
            );
        }
    };

    let content = match plaintext {
        Some(bytes) => {
            Content::from_json(&content_type, &bytes).map_err(|e| malformed_payload(&uuid, e))?
        }
        None => Content::empty(&content_type),
    };

    Ok(Item {
        uuid: item.uuid,
        content_type,
        content,
        deleted: item.deleted,
        created_at: item.created_at,
        updated_at: item.updated_at,
    })
}

/// Encrypt every item, preserving order
pub fn encrypt_all(items: &[Item], keys: &KeySet) -> Result<Vec<EncryptedItem>> {
    items.iter().map(|item| encrypt_item(item, keys)).collect()
}

/// Decrypt every item, preserving order
pub fn decrypt_all(items: &[EncryptedItem], keys: &KeySet) -> Result<Vec<Item>> {
    items.iter().map(|item| decrypt_item(item, keys)).collect()
}
