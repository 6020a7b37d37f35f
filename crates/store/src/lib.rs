//! Persistence capabilities: a write-once key-value record store and an
//! object store with a public URL convention.
//!
//! Both are trait seams with an HTTP-backed production implementation and an
//! in-memory implementation for tests and keyless local runs. Records are
//! written once and never read back by this system; uploads are assumed
//! publicly reachable under `https://<bucket>.<domain>/<key>` without
//! verification.

pub mod objects;
pub mod records;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("store endpoint returned status {0}")]
    Status(u16),
}

pub use objects::{HttpObjectStore, InMemoryObjectStore, ObjectStore, PublicBucket};
pub use records::{HttpRecordStore, InMemoryRecordStore, RecordStore};
