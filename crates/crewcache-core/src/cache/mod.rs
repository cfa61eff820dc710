//! Durable caching module for offline roster access.
//!
//! This module provides the `BlobStore` port plus two implementations:
//! `FileStore` persists one JSON file per key under the cache
//! directory, `MemoryStore` keeps entries in memory for tests and
//! ephemeral use. Entries carry an absolute expiry timestamp; the
//! repository decides what expiration means.

pub mod entry;
pub mod store;

pub use entry::CacheEntry;
pub use store::{BlobStore, CacheError, FileStore, MemoryStore};
