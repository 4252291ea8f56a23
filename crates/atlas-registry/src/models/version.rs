//! The API version resource.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlas_core::error::Result;
use atlas_core::names::{Kind, VersionName};
use atlas_core::patterns::{self, CollectionPattern};

use crate::keys::REVISION_KEYSPACE;
use crate::resource::Resource;

/// A version of an API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Full resource name,
    /// `projects/{project}/locations/global/apis/{api}/versions/{version}`.
    /// Immutable.
    #[serde(default)]
    pub name: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Lifecycle state of the version, e.g. `staging`, `production`.
    #[serde(default)]
    pub state: String,
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

impl Resource for ApiVersion {
    const KIND: Kind = Kind::Version;

    const MASK_FIELDS: &'static [&'static str] = &[
        "display_name",
        "description",
        "state",
        "labels",
        "annotations",
    ];

    const FILTER_FIELDS: &'static [&'static str] =
        &["name", "display_name", "description", "state"];

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
        Ok(VersionName::parse(name)?.to_string())
    }

    fn collection(parent: &str) -> Result<CollectionPattern> {
        patterns::version_collection(parent)
    }

    fn cascade_prefixes(name: &str) -> Vec<String> {
        vec![
            format!("{}/{name}/", Kind::Spec.keyspace()),
            format!("{REVISION_KEYSPACE}/{name}/"),
            format!("{}/{name}/", Kind::Artifact.keyspace()),
        ]
    }

    fn filter_field(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "display_name" => Some(self.display_name.clone()),
            "description" => Some(self.description.clone()),
            "state" => Some(self.state.clone()),
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
        if !body.state.is_empty() {
            self.state = body.state.clone();
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
            "state" => self.state = body.state.clone(),
            "labels" => self.labels = body.labels.clone(),
            "annotations" => self.annotations = body.annotations.clone(),
            _ => {}
        }
    }
}
