//! Resource name grammar for the registry hierarchy.
//!
//! Resource names are hierarchical paths:
//!
//! ```text
//! projects/{project}
//! projects/{project}/locations/global/apis/{api}
//! projects/{project}/locations/global/apis/{api}/versions/{version}
//! projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}
//! {any of the above}/artifacts/{artifact}
//! ```
//!
//! Identifiers are case-insensitive for lookup: parsing canonicalizes every
//! identifier segment to lowercase, and any case variant of an existing name
//! resolves to the same stored resource. The strict identifier rules
//! (lowercase, length, hyphen placement, no UUID shapes) are enforced only
//! when a caller chooses a new identifier, via [`validate_id`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The wildcard segment accepted at any identifier position of a List parent.
pub const WILDCARD: &str = "-";

/// Maximum length of a caller-chosen identifier.
pub const MAX_ID_LENGTH: usize = 80;

/// The five resource kinds of the registry hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Top-level project.
    Project,
    /// API within a project.
    Api,
    /// Version of an API.
    Version,
    /// Revisioned specification document of a version.
    Spec,
    /// Artifact attachable at any level.
    Artifact,
}

impl Kind {
    /// Storage keyspace for this kind. Each kind scans independently, so
    /// every kind gets its own ordered prefix.
    #[must_use]
    pub const fn keyspace(&self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Api => "apis",
            Self::Version => "versions",
            Self::Spec => "specs",
            Self::Artifact => "artifacts",
        }
    }

    /// Singular display noun, used in error messages.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Api => "api",
            Self::Version => "version",
            Self::Spec => "spec",
            Self::Artifact => "artifact",
        }
    }
}

/// Validates a caller-chosen identifier.
///
/// Identifiers must be 1–80 characters of lowercase letters, digits, and
/// hyphens, must not begin or end with a hyphen, and must not be
/// UUID-shaped (so that server-generated identifiers can never collide with
/// caller-chosen ones).
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::invalid_argument("identifier must not be empty"));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(Error::invalid_argument(format!(
            "identifier {id:?} exceeds {MAX_ID_LENGTH} characters"
        )));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(Error::invalid_argument(format!(
            "identifier {id:?} may only contain lowercase letters, digits, and hyphens"
        )));
    }
    if id.starts_with('-') || id.ends_with('-') {
        return Err(Error::invalid_argument(format!(
            "identifier {id:?} must not begin or end with a hyphen"
        )));
    }
    if uuid::Uuid::try_parse(id).is_ok() {
        return Err(Error::invalid_argument(format!(
            "identifier {id:?} must not be a UUID"
        )));
    }
    Ok(())
}

/// Checks an identifier used for lookup and returns its canonical
/// (lowercased) form. Lookup is lenient about case so that any case variant
/// of an existing name resolves; everything else about the charset is still
/// enforced. Strict rules for *new* identifiers live in [`validate_id`].
pub fn canonical_id(segment: &str) -> Result<String> {
    canonical_segment(segment)
}

/// Checks a path segment used for lookup and returns its canonical
/// (lowercased) form. Lookup is lenient about case so that any case variant
/// of an existing name resolves; everything else about the charset is still
/// enforced.
fn canonical_segment(segment: &str) -> Result<String> {
    if segment.is_empty() {
        return Err(Error::invalid_argument("name has an empty path segment"));
    }
    if !segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return Err(Error::invalid_argument(format!(
            "invalid characters in name segment {segment:?}"
        )));
    }
    Ok(segment.to_ascii_lowercase())
}

fn expect_literal(parts: &[&str], index: usize, literal: &str, name: &str) -> Result<()> {
    if parts.get(index).copied() != Some(literal) {
        return Err(Error::invalid_argument(format!(
            "invalid name {name:?}: expected {literal:?} segment"
        )));
    }
    Ok(())
}

/// The name of a project: `projects/{project}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName {
    /// Canonical project identifier.
    pub project_id: String,
}

impl ProjectName {
    /// Parses and canonicalizes a project name.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != 2 {
            return Err(Error::invalid_argument(format!(
                "invalid project name {name:?}"
            )));
        }
        expect_literal(&parts, 0, "projects", name)?;
        Ok(Self {
            project_id: canonical_segment(parts[1])?,
        })
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}", self.project_id)
    }
}

/// The name of an API: `projects/{project}/locations/global/apis/{api}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiName {
    /// Canonical project identifier.
    pub project_id: String,
    /// Canonical API identifier.
    pub api_id: String,
}

impl ApiName {
    /// Parses and canonicalizes an API name.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != 6 {
            return Err(Error::invalid_argument(format!("invalid api name {name:?}")));
        }
        expect_literal(&parts, 0, "projects", name)?;
        expect_literal(&parts, 2, "locations", name)?;
        expect_literal(&parts, 3, "global", name)?;
        expect_literal(&parts, 4, "apis", name)?;
        Ok(Self {
            project_id: canonical_segment(parts[1])?,
            api_id: canonical_segment(parts[5])?,
        })
    }

    /// The project this API belongs to.
    #[must_use]
    pub fn parent(&self) -> ProjectName {
        ProjectName {
            project_id: self.project_id.clone(),
        }
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/global/apis/{}",
            self.project_id, self.api_id
        )
    }
}

/// The name of an API version:
/// `projects/{project}/locations/global/apis/{api}/versions/{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionName {
    /// Canonical project identifier.
    pub project_id: String,
    /// Canonical API identifier.
    pub api_id: String,
    /// Canonical version identifier.
    pub version_id: String,
}

impl VersionName {
    /// Parses and canonicalizes a version name.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != 8 {
            return Err(Error::invalid_argument(format!(
                "invalid version name {name:?}"
            )));
        }
        expect_literal(&parts, 0, "projects", name)?;
        expect_literal(&parts, 2, "locations", name)?;
        expect_literal(&parts, 3, "global", name)?;
        expect_literal(&parts, 4, "apis", name)?;
        expect_literal(&parts, 6, "versions", name)?;
        Ok(Self {
            project_id: canonical_segment(parts[1])?,
            api_id: canonical_segment(parts[5])?,
            version_id: canonical_segment(parts[7])?,
        })
    }

    /// The API this version belongs to.
    #[must_use]
    pub fn parent(&self) -> ApiName {
        ApiName {
            project_id: self.project_id.clone(),
            api_id: self.api_id.clone(),
        }
    }
}

impl fmt::Display for VersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/global/apis/{}/versions/{}",
            self.project_id, self.api_id, self.version_id
        )
    }
}

/// The name of an API spec:
/// `projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecName {
    /// Canonical project identifier.
    pub project_id: String,
    /// Canonical API identifier.
    pub api_id: String,
    /// Canonical version identifier.
    pub version_id: String,
    /// Canonical spec identifier.
    pub spec_id: String,
}

impl SpecName {
    /// Parses and canonicalizes a spec name.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != 10 {
            return Err(Error::invalid_argument(format!(
                "invalid spec name {name:?}"
            )));
        }
        expect_literal(&parts, 0, "projects", name)?;
        expect_literal(&parts, 2, "locations", name)?;
        expect_literal(&parts, 3, "global", name)?;
        expect_literal(&parts, 4, "apis", name)?;
        expect_literal(&parts, 6, "versions", name)?;
        expect_literal(&parts, 8, "specs", name)?;
        Ok(Self {
            project_id: canonical_segment(parts[1])?,
            api_id: canonical_segment(parts[5])?,
            version_id: canonical_segment(parts[7])?,
            spec_id: canonical_segment(parts[9])?,
        })
    }

    /// Parses a spec name that may carry an `@revision-id` suffix, used to
    /// address an archived revision.
    pub fn parse_with_revision(name: &str) -> Result<(Self, Option<String>)> {
        match name.split_once('@') {
            None => Ok((Self::parse(name)?, None)),
            Some((base, revision)) => {
                if revision.is_empty()
                    || !revision
                        .bytes()
                        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
                {
                    return Err(Error::invalid_argument(format!(
                        "invalid revision id {revision:?} in {name:?}"
                    )));
                }
                Ok((Self::parse(base)?, Some(revision.to_string())))
            }
        }
    }

    /// The version this spec belongs to.
    #[must_use]
    pub fn parent(&self) -> VersionName {
        VersionName {
            project_id: self.project_id.clone(),
            api_id: self.api_id.clone(),
            version_id: self.version_id.clone(),
        }
    }
}

impl fmt::Display for SpecName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/global/apis/{}/versions/{}/specs/{}",
            self.project_id, self.api_id, self.version_id, self.spec_id
        )
    }
}

/// The parent of an artifact: any level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactParent {
    /// Artifact attached to a project.
    Project(ProjectName),
    /// Artifact attached to an API.
    Api(ApiName),
    /// Artifact attached to a version.
    Version(VersionName),
    /// Artifact attached to a spec.
    Spec(SpecName),
}

impl ArtifactParent {
    /// Parses an artifact parent at whichever hierarchy level matches.
    pub fn parse(name: &str) -> Result<Self> {
        match name.split('/').count() {
            2 => Ok(Self::Project(ProjectName::parse(name)?)),
            6 => Ok(Self::Api(ApiName::parse(name)?)),
            8 => Ok(Self::Version(VersionName::parse(name)?)),
            10 => Ok(Self::Spec(SpecName::parse(name)?)),
            _ => Err(Error::invalid_argument(format!(
                "invalid artifact parent {name:?}"
            ))),
        }
    }

    /// The kind of resource this parent is.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Project(_) => Kind::Project,
            Self::Api(_) => Kind::Api,
            Self::Version(_) => Kind::Version,
            Self::Spec(_) => Kind::Spec,
        }
    }
}

impl fmt::Display for ArtifactParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(n) => n.fmt(f),
            Self::Api(n) => n.fmt(f),
            Self::Version(n) => n.fmt(f),
            Self::Spec(n) => n.fmt(f),
        }
    }
}

/// The name of an artifact: `{parent}/artifacts/{artifact}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    /// The parent resource the artifact is attached to.
    pub parent: ArtifactParent,
    /// Canonical artifact identifier.
    pub artifact_id: String,
}

impl ArtifactName {
    /// Parses and canonicalizes an artifact name.
    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() < 4 || parts[parts.len() - 2] != "artifacts" {
            return Err(Error::invalid_argument(format!(
                "invalid artifact name {name:?}"
            )));
        }
        let split = name
            .rfind("/artifacts/")
            .ok_or_else(|| Error::invalid_argument(format!("invalid artifact name {name:?}")))?;
        Ok(Self {
            parent: ArtifactParent::parse(&name[..split])?,
            artifact_id: canonical_segment(parts[parts.len() - 1])?,
        })
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/artifacts/{}", self.parent, self.artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        for id in ["a", "my-api", "a1", "v2-beta", &"x".repeat(80)] {
            assert!(validate_id(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn invalid_ids() {
        let long = "x".repeat(84);
        let cases = [
            "",
            long.as_str(),
            "underscore_id",
            "-leading",
            "trailing-",
            "MixedCase",
            "072d2288-c685-42d8-9df0-5edbb2a809ea",
        ];
        for id in cases {
            assert!(validate_id(id).is_err(), "{id:?} should be invalid");
        }
    }

    #[test]
    fn uuid_without_hyphens_is_rejected() {
        assert!(validate_id("072d2288c68542d89df05edbb2a809ea").is_err());
    }

    #[test]
    fn project_name_roundtrip() {
        let name = ProjectName::parse("projects/my-project").unwrap();
        assert_eq!(name.project_id, "my-project");
        assert_eq!(name.to_string(), "projects/my-project");
    }

    #[test]
    fn parse_canonicalizes_case() {
        let name = ApiName::parse("projects/My-Project/locations/global/apis/My-Api").unwrap();
        assert_eq!(
            name.to_string(),
            "projects/my-project/locations/global/apis/my-api"
        );
    }

    #[test]
    fn parse_rejects_wrong_collection_literals() {
        assert!(ApiName::parse("projects/p/locations/us/apis/a").is_err());
        assert!(ApiName::parse("project/p/locations/global/apis/a").is_err());
        assert!(VersionName::parse("projects/p/locations/global/apis/a/version/v").is_err());
    }

    #[test]
    fn parse_rejects_empty_and_bad_segments() {
        assert!(ProjectName::parse("projects/").is_err());
        assert!(ProjectName::parse("projects/bad_id").is_err());
        assert!(ApiName::parse("projects/p/locations/global/apis").is_err());
    }

    #[test]
    fn spec_name_parent_chain() {
        let spec =
            SpecName::parse("projects/p/locations/global/apis/a/versions/v/specs/s").unwrap();
        assert_eq!(spec.parent().to_string(), "projects/p/locations/global/apis/a/versions/v");
        assert_eq!(spec.parent().parent().parent().to_string(), "projects/p");
    }

    #[test]
    fn spec_name_with_revision() {
        let (spec, revision) = SpecName::parse_with_revision(
            "projects/p/locations/global/apis/a/versions/v/specs/s@abcd1234",
        )
        .unwrap();
        assert_eq!(spec.spec_id, "s");
        assert_eq!(revision.as_deref(), Some("abcd1234"));

        let (_, none) =
            SpecName::parse_with_revision("projects/p/locations/global/apis/a/versions/v/specs/s")
                .unwrap();
        assert!(none.is_none());

        assert!(SpecName::parse_with_revision(
            "projects/p/locations/global/apis/a/versions/v/specs/s@"
        )
        .is_err());
    }

    #[test]
    fn artifact_names_at_every_level() {
        let cases = [
            ("projects/p/artifacts/x", Kind::Project),
            ("projects/p/locations/global/apis/a/artifacts/x", Kind::Api),
            (
                "projects/p/locations/global/apis/a/versions/v/artifacts/x",
                Kind::Version,
            ),
            (
                "projects/p/locations/global/apis/a/versions/v/specs/s/artifacts/x",
                Kind::Spec,
            ),
        ];
        for (raw, kind) in cases {
            let name = ArtifactName::parse(raw).unwrap();
            assert_eq!(name.parent.kind(), kind, "{raw}");
            assert_eq!(name.to_string(), raw);
        }
    }

    #[test]
    fn artifact_name_rejects_non_artifact_paths() {
        assert!(ArtifactName::parse("projects/p").is_err());
        assert!(ArtifactName::parse("projects/p/artifacts").is_err());
        assert!(ArtifactName::parse("projects/p/locations/global/apis/a").is_err());
    }
}
