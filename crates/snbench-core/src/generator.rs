//! Deterministic benchmark workload

use crate::model::Item;

/// Items pushed per iteration in the reference workload
pub const DEFAULT_BATCH_SIZE: usize = 100;

const BODY_PHRASE: &str = "these are some words";
const BODY_REPEAT: usize = 300;

/// Body shared by every generated note (6000 bytes)
pub fn note_body() -> String {
    BODY_PHRASE.repeat(BODY_REPEAT)
}

/// `count` notes titled `note title 0`, `note title 1`, … with identical
/// bodies, so runs are comparable. Only the uuids differ between calls.
pub fn generate_batch(count: usize) -> Vec<Item> {
    let body = note_body();
    (0..count)
        .map(|i| Item::note(format!("note title {i}"), body.clone()))
        .collect()
}
