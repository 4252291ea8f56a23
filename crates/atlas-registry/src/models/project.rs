//! The top-level project resource.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlas_core::error::Result;
use atlas_core::names::{Kind, ProjectName};
use atlas_core::patterns::{self, CollectionPattern};

use crate::keys::REVISION_KEYSPACE;
use crate::resource::Resource;

/// A project: the root of the registry hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Full resource name, `projects/{project}`. Immutable after creation.
    #[serde(default)]
    pub name: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
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

impl Resource for Project {
    const KIND: Kind = Kind::Project;

    const MASK_FIELDS: &'static [&'static str] =
        &["display_name", "description", "labels", "annotations"];

    const FILTER_FIELDS: &'static [&'static str] = &["name", "display_name", "description"];

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
        Ok(ProjectName::parse(name)?.to_string())
    }

    fn collection(parent: &str) -> Result<CollectionPattern> {
        patterns::project_collection(parent)
    }

    fn cascade_prefixes(name: &str) -> Vec<String> {
        vec![
            format!("{}/{name}/", Kind::Api.keyspace()),
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
            "labels" => self.labels = body.labels.clone(),
            "annotations" => self.annotations = body.annotations.clone(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let mut stored = Project {
            display_name: "My Project".into(),
            description: "Original".into(),
            ..Project::default()
        };
        let body = Project {
            display_name: "Updated".into(),
            ..Project::default()
        };
        stored.merge_populated(&body);
        assert_eq!(stored.display_name, "Updated");
        assert_eq!(stored.description, "Original");
    }

    #[test]
    fn replace_all_clears_unset_fields() {
        let mut stored = Project {
            display_name: "My Project".into(),
            description: "Original".into(),
            ..Project::default()
        };
        let body = Project {
            display_name: "Updated".into(),
            ..Project::default()
        };
        stored.replace_all(&body);
        assert_eq!(stored.display_name, "Updated");
        assert_eq!(stored.description, "");
    }
}
