//! The capability interface every resource kind implements.
//!
//! The engine is generic over this trait: name handling, timestamps,
//! filterable-field lookup, and the three field-mask update behaviors are
//! the only things it needs from a kind, dispatched statically.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use atlas_core::error::{Error, Result};
use atlas_core::names::Kind;
use atlas_core::patterns::CollectionPattern;

/// Decodes a stored record into a resource.
pub(crate) fn decode<R: Resource>(value: &[u8]) -> Result<R> {
    serde_json::from_slice(value).map_err(|err| Error::Serialization {
        message: format!("decoding stored {}: {err}", R::KIND.noun()),
    })
}

/// Encodes a resource for storage.
pub(crate) fn encode<R: Resource>(resource: &R) -> Result<Bytes> {
    serde_json::to_vec(resource)
        .map(Bytes::from)
        .map_err(|err| Error::Serialization {
            message: format!("encoding {}: {err}", R::KIND.noun()),
        })
}

/// A resource kind managed by the registry.
pub trait Resource:
    Clone + std::fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The kind of this resource.
    const KIND: Kind;

    /// Field paths addressable by an update mask. These are the mutable
    /// fields; `name` and the server-assigned fields are not maskable.
    const MASK_FIELDS: &'static [&'static str];

    /// String-valued fields addressable by a filter expression.
    const FILTER_FIELDS: &'static [&'static str];

    /// The resource's full hierarchical name.
    fn name(&self) -> &str;

    /// Replaces the resource's name.
    fn set_name(&mut self, name: String);

    /// Creation timestamp, if assigned.
    fn create_time(&self) -> Option<DateTime<Utc>>;

    /// Last-update timestamp, if assigned.
    fn update_time(&self) -> Option<DateTime<Utc>>;

    /// Sets both server-assigned timestamps.
    fn set_times(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>);

    /// Parses and canonicalizes a full name of this kind.
    fn canonical_name(name: &str) -> Result<String>;

    /// Resolves a List parent (wildcards allowed) into a collection pattern.
    fn collection(parent: &str) -> Result<CollectionPattern>;

    /// Storage-key prefixes of descendants removed when this resource is
    /// deleted. `name` is canonical.
    fn cascade_prefixes(name: &str) -> Vec<String>;

    /// Looks up a registered filter field's value. Returns `None` only for
    /// unregistered fields; registered-but-unset fields yield `""`.
    fn filter_field(&self, field: &str) -> Option<String>;

    /// Merge update (nil or empty mask): copies every explicitly populated
    /// (non-default) maskable field of `body` onto `self`.
    fn merge_populated(&mut self, body: &Self);

    /// Replaces the single maskable field named by `path` with `body`'s
    /// value, even when that value is the field's default. Callers validate
    /// `path` against [`Resource::MASK_FIELDS`] first.
    fn apply_field(&mut self, path: &str, body: &Self);

    /// Full replacement (`"*"` mask): every maskable field takes `body`'s
    /// value, clearing fields `body` left unset.
    fn replace_all(&mut self, body: &Self) {
        for path in Self::MASK_FIELDS {
            self.apply_field(path, body);
        }
    }

    /// Recomputes server-derived fields after a mutation. `previous` is the
    /// stored record being replaced (`None` on create).
    fn finalize(&mut self, previous: Option<&Self>, now: DateTime<Utc>) {
        let _ = (previous, now);
    }

    /// The current revision identifier, for kinds that keep revisions.
    fn revision(&self) -> Option<&str> {
        None
    }
}
