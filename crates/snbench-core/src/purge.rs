//! Purge engine
//!
//! Deletion on the sync server is an update: the item goes back up with an
//! empty payload of its own type and `deleted` set. Per item:
//!
//! ```text
//! Remote -> Decrypted -> Matched   -> Tombstoned -> Encrypted -> Resubmitted
//!                     -> Unmatched (dropped, never resubmitted)
//! ```

use snbench_sync::{Session, SyncService};
use tracing::{debug, info};

use crate::codec::{decrypt_all, encrypt_all};
use crate::filter::FilterSet;
use crate::model::Item;
use crate::{CoreError, PurgeStep, Result};

/// Tombstone every remote item matched by `filters`. Returns how many items
/// were deleted. No write is issued when nothing matches.
pub async fn purge<S>(service: &S, session: &Session, filters: &FilterSet) -> Result<usize>
where
    S: SyncService + ?Sized,
{
    let remote = service
        .get_items(session)
        .await
        .map_err(|e| PurgeStep::Retrieve.wrap(CoreError::Transport(e)))?;

    let decrypted = decrypt_all(&remote, session.keys()).map_err(|e| PurgeStep::Decrypt.wrap(e))?;

    let tombstones: Vec<Item> = decrypted
        .iter()
        .filter(|item| filters.matches(item))
        .map(Item::tombstone)
        .collect();

    if tombstones.is_empty() {
        debug!(retrieved = remote.len(), "nothing to purge");
        return Ok(0);
    }

    let encrypted =
        encrypt_all(&tombstones, session.keys()).map_err(|e| PurgeStep::Encrypt.wrap(e))?;

    service
        .put_items(session, &encrypted)
        .await
        .map_err(|e| PurgeStep::Submit.wrap(CoreError::Transport(e)))?;

    info!(
        retrieved = remote.len(),
        deleted = tombstones.len(),
        "purge complete"
    );
    Ok(tombstones.len())
}
