//! The API resource.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlas_core::error::Result;
use atlas_core::names::{ApiName, Kind};
use atlas_core::patterns::{self, CollectionPattern};

use crate::keys::REVISION_KEYSPACE;
use crate::resource::Resource;

/// An API within a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Api {
    /// Full resource name,
    /// `projects/{project}/locations/global/apis/{api}`. Immutable.
    #[serde(default)]
    pub name: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Availability of the API, e.g. `GENERAL`, `DEPRECATED`.
    #[serde(default)]
    pub availability: String,
    /// Name of the version recommended for consumers.
    #[serde(default)]
    pub recommended_version: String,
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

impl Resource for Api {
    const KIND: Kind = Kind::Api;

    const MASK_FIELDS: &'static [&'static str] = &[
        "display_name",
        "description",
        "availability",
        "recommended_version",
        "labels",
        "annotations",
    ];

    const FILTER_FIELDS: &'static [&'static str] = &[
        "name",
        "display_name",
        "description",
        "availability",
        "recommended_version",
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
        Ok(ApiName::parse(name)?.to_string())
    }

    fn collection(parent: &str) -> Result<CollectionPattern> {
        patterns::api_collection(parent)
    }

    fn cascade_prefixes(name: &str) -> Vec<String> {
        vec![
            format!("{}/{name}/", Kind::Version.keyspace()),
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
            "availability" => Some(self.availability.clone()),
            "recommended_version" => Some(self.recommended_version.clone()),
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
        if !body.availability.is_empty() {
            self.availability = body.availability.clone();
        }
        if !body.recommended_version.is_empty() {
            self.recommended_version = body.recommended_version.clone();
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
            "availability" => self.availability = body.availability.clone(),
            "recommended_version" => self.recommended_version = body.recommended_version.clone(),
            "labels" => self.labels = body.labels.clone(),
            "annotations" => self.annotations = body.annotations.clone(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Api {
        Api {
            name: "projects/my-project/locations/global/apis/my-api".into(),
            display_name: "My Api".into(),
            description: "Api for my APIs".into(),
            ..Api::default()
        }
    }

    fn update_body() -> Api {
        Api {
            display_name: "My Updated Api".into(),
            ..Api::default()
        }
    }

    #[test]
    fn merge_leaves_description() {
        let mut api = seeded();
        api.merge_populated(&update_body());
        assert_eq!(api.display_name, "My Updated Api");
        assert_eq!(api.description, "Api for my APIs");
    }

    #[test]
    fn single_field_mask_leaves_description() {
        let mut api = seeded();
        let body = Api {
            display_name: "My Updated Api".into(),
            description: "Ignored".into(),
            ..Api::default()
        };
        api.apply_field("display_name", &body);
        assert_eq!(api.display_name, "My Updated Api");
        assert_eq!(api.description, "Api for my APIs");
    }

    #[test]
    fn wildcard_mask_clears_description() {
        let mut api = seeded();
        api.replace_all(&update_body());
        assert_eq!(api.display_name, "My Updated Api");
        assert_eq!(api.description, "");
    }

    #[test]
    fn unregistered_filter_field_is_none() {
        assert!(seeded().filter_field("labels").is_none());
        assert_eq!(seeded().filter_field("description").as_deref(), Some("Api for my APIs"));
    }
}
