//! The API spec resource.
//!
//! Specs are revisioned: the resource name is stable while every change to
//! the contents mints a new immutable revision. The engine archives the
//! superseded record so older revisions stay addressable by
//! `{name}@{revision_id}` contents reads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use atlas_core::error::Result;
use atlas_core::names::{Kind, SpecName};
use atlas_core::patterns::{self, CollectionPattern};

use crate::keys::REVISION_KEYSPACE;
use crate::models::{base64_bytes, sha256_hex};
use crate::resource::Resource;

/// Length of a revision identifier in hex characters.
const REVISION_ID_LENGTH: usize = 8;

/// A specification document of an API version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSpec {
    /// Full resource name, `projects/{project}/locations/global/apis/{api}/
    /// versions/{version}/specs/{spec}`. Immutable.
    #[serde(default)]
    pub name: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Original file name of the document.
    #[serde(default)]
    pub filename: String,
    /// Style of the document, e.g. `application/x.openapi+gzip;version=3`.
    #[serde(default)]
    pub mime_type: String,
    /// URI of the document's upstream location, if any.
    #[serde(default)]
    pub source_uri: String,
    /// The document itself.
    #[serde(default, with = "base64_bytes")]
    pub contents: Vec<u8>,
    /// Server-computed size of `contents` in bytes.
    #[serde(default)]
    pub size_bytes: u64,
    /// Server-computed SHA-256 hex digest of `contents`.
    #[serde(default)]
    pub hash: String,
    /// Server-assigned identifier of the current revision.
    #[serde(default)]
    pub revision_id: String,
    /// Creation time of the current revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_create_time: Option<DateTime<Utc>>,
    /// Last-update time of the current revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_update_time: Option<DateTime<Utc>>,
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

/// Mints a revision identifier from the content digest and mint time.
fn new_revision_id(hash: &str, now: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(hash.as_bytes());
    hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    hex::encode(hasher.finalize())[..REVISION_ID_LENGTH].to_string()
}

impl Resource for ApiSpec {
    const KIND: Kind = Kind::Spec;

    const MASK_FIELDS: &'static [&'static str] = &[
        "display_name",
        "description",
        "filename",
        "mime_type",
        "source_uri",
        "contents",
        "labels",
        "annotations",
    ];

    const FILTER_FIELDS: &'static [&'static str] = &[
        "name",
        "display_name",
        "description",
        "filename",
        "mime_type",
        "source_uri",
        "hash",
        "revision_id",
    ];

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
        Ok(SpecName::parse(name)?.to_string())
    }

    fn collection(parent: &str) -> Result<CollectionPattern> {
        patterns::spec_collection(parent)
    }

    fn cascade_prefixes(name: &str) -> Vec<String> {
        vec![
            format!("{REVISION_KEYSPACE}/{name}@"),
            format!("{}/{name}/", Kind::Artifact.keyspace()),
        ]
    }

    fn filter_field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "display_name" => Some(self.display_name.clone()),
            "description" => Some(self.description.clone()),
            "filename" => Some(self.filename.clone()),
            "mime_type" => Some(self.mime_type.clone()),
            "source_uri" => Some(self.source_uri.clone()),
            "hash" => Some(self.hash.clone()),
            "revision_id" => Some(self.revision_id.clone()),
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
        if !body.filename.is_empty() {
            self.filename = body.filename.clone();
        }
        if !body.mime_type.is_empty() {
            self.mime_type = body.mime_type.clone();
        }
        if !body.source_uri.is_empty() {
            self.source_uri = body.source_uri.clone();
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
            "filename" => self.filename = body.filename.clone(),
            "mime_type" => self.mime_type = body.mime_type.clone(),
            "source_uri" => self.source_uri = body.source_uri.clone(),
            "contents" => self.contents = body.contents.clone(),
            "labels" => self.labels = body.labels.clone(),
            "annotations" => self.annotations = body.annotations.clone(),
            _ => {}
        }
    }

    fn finalize(&mut self, previous: Option<&Self>, now: DateTime<Utc>) {
        self.size_bytes = self.contents.len() as u64;
        self.hash = sha256_hex(&self.contents);
        match previous {
            Some(prior) if prior.hash == self.hash => {
                // Same contents: the revision survives the metadata update.
                self.revision_id = prior.revision_id.clone();
                self.revision_create_time = prior.revision_create_time;
                self.revision_update_time = Some(now);
            }
            _ => {
                self.revision_id = new_revision_id(&self.hash, now);
                self.revision_create_time = Some(now);
                self.revision_update_time = Some(now);
            }
        }
    }

    fn revision(&self) -> Option<&str> {
        if self.revision_id.is_empty() {
            None
        } else {
            Some(&self.revision_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_computes_digest_and_size() {
        let mut spec = ApiSpec {
            contents: b"openapi: 3.0.0".to_vec(),
            ..ApiSpec::default()
        };
        spec.finalize(None, Utc::now());
        assert_eq!(spec.size_bytes, 14);
        assert_eq!(spec.hash, sha256_hex(b"openapi: 3.0.0"));
        assert_eq!(spec.revision_id.len(), REVISION_ID_LENGTH);
    }

    #[test]
    fn metadata_update_keeps_revision() {
        let mut spec = ApiSpec {
            contents: b"v1".to_vec(),
            ..ApiSpec::default()
        };
        spec.finalize(None, Utc::now());
        let original_revision = spec.revision_id.clone();

        let mut updated = spec.clone();
        updated.description = "annotated".into();
        updated.finalize(Some(&spec), Utc::now());
        assert_eq!(updated.revision_id, original_revision);
        assert_eq!(updated.revision_create_time, spec.revision_create_time);
    }

    #[test]
    fn contents_change_mints_new_revision() {
        let mut spec = ApiSpec {
            contents: b"v1".to_vec(),
            ..ApiSpec::default()
        };
        spec.finalize(None, Utc::now());
        let original_revision = spec.revision_id.clone();

        let mut updated = spec.clone();
        updated.contents = b"v2".to_vec();
        updated.finalize(Some(&spec), Utc::now());
        assert_ne!(updated.revision_id, original_revision);
        assert_eq!(updated.hash, sha256_hex(b"v2"));
    }

    #[test]
    fn contents_roundtrip_as_base64() {
        let spec = ApiSpec {
            contents: vec![0, 159, 146, 150],
            ..ApiSpec::default()
        };
        let encoded = serde_json::to_string(&spec).unwrap();
        assert!(encoded.contains("\"contents\":\"AJ+Slg==\""));
        let decoded: ApiSpec = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.contents, spec.contents);
    }
}
