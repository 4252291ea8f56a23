//! The artifact resource, attachable at any level of the hierarchy.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlas_core::error::Result;
use atlas_core::names::{ArtifactName, Kind};
use atlas_core::patterns::{self, CollectionPattern};

use crate::models::{base64_bytes, sha256_hex};
use crate::resource::Resource;

/// An artifact: opaque bytes attached to any resource in the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Full resource name, `{parent}/artifacts/{artifact}`. Immutable.
    #[serde(default)]
    pub name: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Style of the contents, e.g. `application/json`.
    #[serde(default)]
    pub mime_type: String,
    /// The artifact contents.
    #[serde(default, with = "base64_bytes")]
    pub contents: Vec<u8>,
    /// Server-computed size of `contents` in bytes.
    #[serde(default)]
    pub size_bytes: u64,
    /// Server-computed SHA-256 hex digest of `contents`.
    #[serde(default)]
    pub hash: String,
    /// User labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Free-form annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Server-assigned creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    /// Server-assigned last-update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl Resource for Artifact {
    const KIND: Kind = Kind::Artifact;

    const MASK_FIELDS: &'static [&'static str] = &[
        "display_name",
        "description",
        "mime_type",
        "contents",
        "labels",
        "annotations",
    ];

    const FILTER_FIELDS: &'static [&'static str] =
        &["name", "display_name", "description", "mime_type", "hash"];

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn create_time(&self) -> Option<DateTime<Utc>> {
        self.create_time
    }

    fn update_time(&self) -> Option<DateTime<Utc>> {
        self.update_time
    }

    fn set_times(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>) {
        self.create_time = Some(create_time);
        self.update_time = Some(update_time);
    }

    fn canonical_name(name: &str) -> Result<String> {
        Ok(ArtifactName::parse(name)?.to_string())
    }

    fn collection(parent: &str) -> Result<CollectionPattern> {
        patterns::artifact_collection(parent)
    }

    fn cascade_prefixes(_name: &str) -> Vec<String> {
        Vec::new()
    }

    fn filter_field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "display_name" => Some(self.display_name.clone()),
            "description" => Some(self.description.clone()),
            "mime_type" => Some(self.mime_type.clone()),
            "hash" => Some(self.hash.clone()),
            _ => None,
        }
    }

    fn merge_populated(&mut self, body: &Self) {
        if !body.display_name.is_empty() {
            self.display_name = body.display_name.clone();
        }
        if !body.description.is_empty() {
            self.description = body.description.clone();
        }
        if !body.mime_type.is_empty() {
            self.mime_type = body.mime_type.clone();
        }
        if !body.contents.is_empty() {
            self.contents = body.contents.clone();
        }
        if !body.labels.is_empty() {
            self.labels = body.labels.clone();
        }
        if !body.annotations.is_empty() {
            self.annotations = body.annotations.clone();
        }
    }

    fn apply_field(&mut self, path: &str, body: &Self) {
        match path {
            "display_name" => self.display_name = body.display_name.clone(),
            "description" => self.description = body.description.clone(),
            "mime_type" => self.mime_type = body.mime_type.clone(),
            "contents" => self.contents = body.contents.clone(),
            "labels" => self.labels = body.labels.clone(),
            "annotations" => self.annotations = body.annotations.clone(),
            _ => {}
        }
    }

    fn finalize(&mut self, _previous: Option<&Self>, _now: DateTime<Utc>) {
        self.size_bytes = self.contents.len() as u64;
        self.hash = sha256_hex(&self.contents);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_computes_digest() {
        let mut artifact = Artifact {
            contents: b"{\"score\":1}".to_vec(),
            ..Artifact::default()
        };
        artifact.finalize(None, Utc::now());
        assert_eq!(artifact.size_bytes, 11);
        assert_eq!(artifact.hash, sha256_hex(b"{\"score\":1}"));
    }

    #[test]
    fn contents_replaced_by_wildcard_mask() {
        let mut artifact = Artifact {
            contents: b"old".to_vec(),
            mime_type: "text/plain".into(),
            ..Artifact::default()
        };
        artifact.replace_all(&Artifact::default());
        assert!(artifact.contents.is_empty());
        assert_eq!(artifact.mime_type, "");
    }
}
