//! Ordered key-value store abstraction backing the registry.
//!
//! The engine needs exactly three primitives from its substrate: point
//! lookup, ordered prefix range-scan (resumable from a key), and
//! compare-and-swap writes. Backends interpret the version token opaquely;
//! the in-memory backend uses numeric versions stored as strings.
//!
//! Values are opaque byte payloads; each write replaces the whole value, so
//! a reader never observes a partially-written record.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Error, Result};

/// Precondition for conditional writes (CAS operations).
#[derive(Debug, Clone)]
pub enum WritePrecondition {
    /// Write only if the key does not exist.
    DoesNotExist,
    /// Write only if the key's version matches the given token.
    MatchesVersion(String),
    /// Write unconditionally.
    None,
}

/// Result of a conditional write.
#[derive(Debug, Clone)]
pub enum WriteResult {
    /// Write succeeded, returns the new version token.
    Success {
        /// The new version token after the write.
        version: String,
    },
    /// Precondition failed; the key was not written.
    PreconditionFailed {
        /// The current version that caused the precondition to fail, or
        /// `None` if the key does not exist.
        current_version: Option<String>,
    },
}

/// A stored record returned from reads and scans.
#[derive(Debug, Clone)]
pub struct Record {
    /// The record's key.
    pub key: String,
    /// The record's value.
    pub value: Bytes,
    /// Version token for CAS writes.
    pub version: String,
}

/// Ordered key-value store contract for registry backends.
///
/// Scans return records in ascending lexicographic key order; the engine's
/// pagination cursor depends on that order being stable.
#[async_trait]
pub trait RegistryStore: Send + Sync + 'static {
    /// Reads the record at `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Record>>;

    /// Writes `value` at `key` subject to `precondition`.
    ///
    /// A failed precondition is a normal result, not an error.
    async fn put(&self, key: &str, value: Bytes, precondition: WritePrecondition)
        -> Result<WriteResult>;

    /// Deletes the record at `key`. Idempotent.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes every record whose key starts with `prefix`.
    async fn delete_prefix(&self, prefix: &str) -> Result<()>;

    /// Returns up to `limit` records whose keys start with `prefix`, in
    /// ascending key order, strictly after `start_after` when given.
    async fn scan_after(
        &self,
        prefix: &str,
        start_after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>>;
}

#[derive(Debug, Clone)]
struct StoredValue {
    data: Bytes,
    version: i64,
}

/// In-memory ordered store.
///
/// Thread-safe via `RwLock` over a `BTreeMap`, which gives the ordered scans
/// the contract requires. Suitable for tests and single-process servers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<String, StoredValue>>>,
    next_version: Arc<RwLock<i64>>,
}

impl MemoryStore {
    /// Creates a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_version(&self) -> Result<i64> {
        let mut next = self.next_version.write().map_err(|_| Error::Internal {
            message: "version lock poisoned".into(),
        })?;
        *next += 1;
        Ok(*next)
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Record>> {
        let records = self.records.read().map_err(|_| Error::Internal {
            message: "store lock poisoned".into(),
        })?;
        Ok(records.get(key).map(|stored| Record {
            key: key.to_string(),
            value: stored.data.clone(),
            version: stored.version.to_string(),
        }))
    }

    async fn put(
        &self,
        key: &str,
        value: Bytes,
        precondition: WritePrecondition,
    ) -> Result<WriteResult> {
        let version = self.bump_version()?;
        let mut records = self.records.write().map_err(|_| Error::Internal {
            message: "store lock poisoned".into(),
        })?;

        let current = records.get(key);
        match precondition {
            WritePrecondition::DoesNotExist => {
                if let Some(existing) = current {
                    return Ok(WriteResult::PreconditionFailed {
                        current_version: Some(existing.version.to_string()),
                    });
                }
            }
            WritePrecondition::MatchesVersion(expected) => match current {
                None => {
                    return Ok(WriteResult::PreconditionFailed {
                        current_version: None,
                    });
                }
                Some(existing) if existing.version.to_string() != expected => {
                    return Ok(WriteResult::PreconditionFailed {
                        current_version: Some(existing.version.to_string()),
                    });
                }
                Some(_) => {}
            },
            WritePrecondition::None => {}
        }

        records.insert(
            key.to_string(),
            StoredValue {
                data: value,
                version,
            },
        );
        Ok(WriteResult::Success {
            version: version.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut records = self.records.write().map_err(|_| Error::Internal {
            message: "store lock poisoned".into(),
        })?;
        records.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        let mut records = self.records.write().map_err(|_| Error::Internal {
            message: "store lock poisoned".into(),
        })?;
        let doomed: Vec<String> = records
            .range::<String, _>((Bound::Included(prefix.to_string()), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in doomed {
            records.remove(&key);
        }
        Ok(())
    }

    async fn scan_after(
        &self,
        prefix: &str,
        start_after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let records = self.records.read().map_err(|_| Error::Internal {
            message: "store lock poisoned".into(),
        })?;
        let lower = match start_after {
            Some(after) if after >= prefix => Bound::Excluded(after.to_string()),
            _ => Bound::Included(prefix.to_string()),
        };
        Ok(records
            .range::<String, _>((lower, Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(limit)
            .map(|(key, stored)| Record {
                key: key.clone(),
                value: stored.data.clone(),
                version: stored.version.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(value: &str) -> Bytes {
        Bytes::copy_from_slice(value.as_bytes())
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("k/a", bytes("1"), WritePrecondition::None)
            .await
            .unwrap();
        let record = store.get("k/a").await.unwrap().unwrap();
        assert_eq!(record.value, bytes("1"));
        assert!(store.get("k/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn does_not_exist_precondition() {
        let store = MemoryStore::new();
        let first = store
            .put("k", bytes("1"), WritePrecondition::DoesNotExist)
            .await
            .unwrap();
        assert!(matches!(first, WriteResult::Success { .. }));

        let second = store
            .put("k", bytes("2"), WritePrecondition::DoesNotExist)
            .await
            .unwrap();
        assert!(matches!(second, WriteResult::PreconditionFailed { .. }));
        assert_eq!(store.get("k").await.unwrap().unwrap().value, bytes("1"));
    }

    #[tokio::test]
    async fn matches_version_precondition() {
        let store = MemoryStore::new();
        store
            .put("k", bytes("1"), WritePrecondition::None)
            .await
            .unwrap();
        let version = store.get("k").await.unwrap().unwrap().version;

        let ok = store
            .put("k", bytes("2"), WritePrecondition::MatchesVersion(version))
            .await
            .unwrap();
        assert!(matches!(ok, WriteResult::Success { .. }));

        let stale = store
            .put(
                "k",
                bytes("3"),
                WritePrecondition::MatchesVersion("0".to_string()),
            )
            .await
            .unwrap();
        assert!(matches!(stale, WriteResult::PreconditionFailed { .. }));
        assert_eq!(store.get("k").await.unwrap().unwrap().value, bytes("2"));
    }

    #[tokio::test]
    async fn scan_is_ordered_and_resumable() {
        let store = MemoryStore::new();
        for key in ["apis/b", "apis/a", "apis/c", "specs/z"] {
            store
                .put(key, bytes(key), WritePrecondition::None)
                .await
                .unwrap();
        }

        let all = store.scan_after("apis/", None, 10).await.unwrap();
        let keys: Vec<&str> = all.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["apis/a", "apis/b", "apis/c"]);

        let rest = store.scan_after("apis/", Some("apis/a"), 10).await.unwrap();
        let keys: Vec<&str> = rest.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["apis/b", "apis/c"]);

        let limited = store.scan_after("apis/", None, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn delete_prefix_removes_only_matches() {
        let store = MemoryStore::new();
        for key in ["apis/p/a", "apis/p/b", "apis/q/a"] {
            store
                .put(key, bytes(key), WritePrecondition::None)
                .await
                .unwrap();
        }
        store.delete_prefix("apis/p/").await.unwrap();
        assert!(store.get("apis/p/a").await.unwrap().is_none());
        assert!(store.get("apis/p/b").await.unwrap().is_none());
        assert!(store.get("apis/q/a").await.unwrap().is_some());
    }
}
