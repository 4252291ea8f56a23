//! Storage-key layout for registry records.
//!
//! Each kind owns an ordered keyspace keyed by canonical resource name, so
//! a prefix scan over a kind enumerates its resources in name order.
//! Archived spec revisions live in their own keyspace, keyed by
//! `{spec name}@{revision id}`.

use atlas_core::names::Kind;

/// Keyspace for archived (superseded) spec revisions.
pub const REVISION_KEYSPACE: &str = "specrevs";

/// The storage key for a resource with the given canonical name.
#[must_use]
pub fn resource_key(kind: Kind, name: &str) -> String {
    format!("{}/{}", kind.keyspace(), name)
}

/// The storage key for an archived spec revision.
#[must_use]
pub fn revision_key(name: &str, revision_id: &str) -> String {
    format!("{REVISION_KEYSPACE}/{name}@{revision_id}")
}

/// The canonical name embedded in a resource key, given the kind's
/// keyspace was already matched by the scan prefix.
#[must_use]
pub fn name_from_key(kind: Kind, key: &str) -> &str {
    &key[kind.keyspace().len() + 1..]
}
