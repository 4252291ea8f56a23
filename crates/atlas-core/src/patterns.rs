//! Wildcard patterns over resource names, used by List operations.
//!
//! A List parent may substitute the wildcard `-` for any identifier segment,
//! at any number of levels simultaneously (`projects/-/locations/global/
//! apis/-`). Patterns are resolved into a scan prefix before touching the
//! store: literal segments up to the first wildcard bound the ordered range
//! scan, and remaining segments are matched per candidate.

use crate::error::{Error, Result};
use crate::names::{Kind, WILDCARD};

/// One segment of a pattern: a fixed value or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this (canonical) segment.
    Literal(String),
    /// Matches any identifier at this position.
    Any,
}

/// A segment-wise pattern over full resource names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    segments: Vec<Segment>,
}

impl NamePattern {
    fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Whether a canonical resource name matches this pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let mut parts = name.split('/');
        for segment in &self.segments {
            let Some(part) = parts.next() else {
                return false;
            };
            match segment {
                Segment::Literal(expected) if expected != part => return false,
                Segment::Literal(_) | Segment::Any => {}
            }
        }
        parts.next().is_none()
    }

    /// Substitutes `id` for the trailing wildcard, producing a concrete
    /// name. Returns `None` when any other segment is a wildcard.
    #[must_use]
    pub fn instantiate(&self, id: &str) -> Option<String> {
        let mut name = String::new();
        let last = self.segments.len().checked_sub(1)?;
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                name.push('/');
            }
            match segment {
                Segment::Literal(value) => name.push_str(value),
                Segment::Any if index == last => name.push_str(id),
                Segment::Any => return None,
            }
        }
        Some(name)
    }

    /// The literal prefix (through the last literal segment before the first
    /// wildcard) bounding the ordered scan for this pattern. Includes a
    /// trailing `/` so that sibling collections sharing a prefix are
    /// excluded.
    #[must_use]
    pub fn scan_prefix(&self) -> String {
        let mut prefix = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    prefix.push_str(literal);
                    prefix.push('/');
                }
                Segment::Any => break,
            }
        }
        prefix
    }
}

impl std::fmt::Display for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            match segment {
                Segment::Literal(value) => f.write_str(value)?,
                Segment::Any => f.write_str(WILDCARD)?,
            }
        }
        Ok(())
    }
}

/// A resolved List parent: the kind being enumerated, the full-name pattern
/// (ending in a wildcard for the listed identifier), and the concrete parent
/// to existence-check, when the parent has no wildcards.
#[derive(Debug, Clone)]
pub struct CollectionPattern {
    /// The kind of resource being listed.
    pub kind: Kind,
    /// Pattern every listed resource's canonical name must match.
    pub pattern: NamePattern,
    /// Canonical name and kind of the concrete parent, if the parent
    /// contains no wildcard. `None` for wildcard parents and for the
    /// top-level project collection.
    pub concrete_parent: Option<(Kind, String)>,
}

/// Parses one identifier slot of a parent pattern.
fn id_segment(raw: &str) -> Result<Segment> {
    if raw == WILDCARD {
        return Ok(Segment::Any);
    }
    if raw.is_empty()
        || !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return Err(Error::invalid_argument(format!(
            "invalid identifier segment {raw:?} in parent"
        )));
    }
    Ok(Segment::Literal(raw.to_ascii_lowercase()))
}

fn literal(value: &str) -> Segment {
    Segment::Literal(value.to_string())
}

fn expect(parts: &[&str], index: usize, value: &str, parent: &str) -> Result<()> {
    if parts.get(index).copied() != Some(value) {
        return Err(Error::invalid_argument(format!(
            "invalid parent {parent:?}: expected {value:?} segment"
        )));
    }
    Ok(())
}

/// Builds the segments of a parent pattern from the raw parent string, for a
/// parent at the given hierarchy depth (in path segments).
fn parent_segments(parent: &str, depth: usize) -> Result<Vec<Segment>> {
    let parts: Vec<&str> = parent.split('/').collect();
    if parts.len() != depth {
        return Err(Error::invalid_argument(format!(
            "invalid parent {parent:?}"
        )));
    }
    let mut segments = Vec::with_capacity(depth);
    expect(&parts, 0, "projects", parent)?;
    segments.push(literal("projects"));
    segments.push(id_segment(parts[1])?);
    if depth >= 6 {
        expect(&parts, 2, "locations", parent)?;
        expect(&parts, 3, "global", parent)?;
        expect(&parts, 4, "apis", parent)?;
        segments.push(literal("locations"));
        segments.push(literal("global"));
        segments.push(literal("apis"));
        segments.push(id_segment(parts[5])?);
    }
    if depth >= 8 {
        expect(&parts, 6, "versions", parent)?;
        segments.push(literal("versions"));
        segments.push(id_segment(parts[7])?);
    }
    if depth == 10 {
        expect(&parts, 8, "specs", parent)?;
        segments.push(literal("specs"));
        segments.push(id_segment(parts[9])?);
    }
    Ok(segments)
}

/// Joins parent segments into a canonical parent name, if fully concrete.
fn concrete_name(segments: &[Segment]) -> Option<String> {
    let mut name = String::new();
    for (index, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Any => return None,
            Segment::Literal(value) => {
                if index > 0 {
                    name.push('/');
                }
                name.push_str(value);
            }
        }
    }
    Some(name)
}

fn parent_kind(depth: usize) -> Kind {
    match depth {
        2 => Kind::Project,
        6 => Kind::Api,
        8 => Kind::Version,
        _ => Kind::Spec,
    }
}

/// The top-level project collection. Projects have no parent; the parent
/// string must be empty.
pub fn project_collection(parent: &str) -> Result<CollectionPattern> {
    if !parent.is_empty() {
        return Err(Error::invalid_argument(format!(
            "projects have no parent, got {parent:?}"
        )));
    }
    Ok(CollectionPattern {
        kind: Kind::Project,
        pattern: NamePattern::new(vec![literal("projects"), Segment::Any]),
        concrete_parent: None,
    })
}

/// The API collection under `projects/{project}/locations/global`.
pub fn api_collection(parent: &str) -> Result<CollectionPattern> {
    let parts: Vec<&str> = parent.split('/').collect();
    if parts.len() != 4 {
        return Err(Error::invalid_argument(format!(
            "invalid parent {parent:?}"
        )));
    }
    expect(&parts, 0, "projects", parent)?;
    expect(&parts, 2, "locations", parent)?;
    expect(&parts, 3, "global", parent)?;
    let project = id_segment(parts[1])?;
    let concrete_parent = concrete_name(&[literal("projects"), project.clone()])
        .map(|name| (Kind::Project, name));
    let segments = vec![
        literal("projects"),
        project,
        literal("locations"),
        literal("global"),
        literal("apis"),
        Segment::Any,
    ];
    Ok(CollectionPattern {
        kind: Kind::Api,
        pattern: NamePattern::new(segments),
        concrete_parent,
    })
}

/// The version collection under an API name (wildcards allowed per level).
pub fn version_collection(parent: &str) -> Result<CollectionPattern> {
    let mut segments = parent_segments(parent, 6)?;
    let concrete_parent = concrete_name(&segments).map(|name| (Kind::Api, name));
    segments.push(literal("versions"));
    segments.push(Segment::Any);
    Ok(CollectionPattern {
        kind: Kind::Version,
        pattern: NamePattern::new(segments),
        concrete_parent,
    })
}

/// The spec collection under a version name (wildcards allowed per level).
pub fn spec_collection(parent: &str) -> Result<CollectionPattern> {
    let mut segments = parent_segments(parent, 8)?;
    let concrete_parent = concrete_name(&segments).map(|name| (Kind::Version, name));
    segments.push(literal("specs"));
    segments.push(Segment::Any);
    Ok(CollectionPattern {
        kind: Kind::Spec,
        pattern: NamePattern::new(segments),
        concrete_parent,
    })
}

/// The artifact collection under a parent at any hierarchy level.
pub fn artifact_collection(parent: &str) -> Result<CollectionPattern> {
    let depth = parent.split('/').count();
    if !matches!(depth, 2 | 6 | 8 | 10) {
        return Err(Error::invalid_argument(format!(
            "invalid artifact parent {parent:?}"
        )));
    }
    let mut segments = parent_segments(parent, depth)?;
    let concrete_parent = concrete_name(&segments).map(|name| (parent_kind(depth), name));
    segments.push(literal("artifacts"));
    segments.push(Segment::Any);
    Ok(CollectionPattern {
        kind: Kind::Artifact,
        pattern: NamePattern::new(segments),
        concrete_parent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_parent_pattern() {
        let collection = api_collection("projects/my-project/locations/global").unwrap();
        assert_eq!(
            collection.concrete_parent,
            Some((Kind::Project, "projects/my-project".to_string()))
        );
        assert_eq!(
            collection.pattern.scan_prefix(),
            "projects/my-project/locations/global/apis/"
        );
        assert!(collection
            .pattern
            .matches("projects/my-project/locations/global/apis/a"));
        assert!(!collection
            .pattern
            .matches("projects/other/locations/global/apis/a"));
    }

    #[test]
    fn wildcard_parent_has_no_concrete_parent() {
        let collection = api_collection("projects/-/locations/global").unwrap();
        assert!(collection.concrete_parent.is_none());
        assert_eq!(collection.pattern.scan_prefix(), "projects/");
        assert!(collection
            .pattern
            .matches("projects/any/locations/global/apis/a"));
    }

    #[test]
    fn multi_level_wildcards() {
        let collection =
            spec_collection("projects/-/locations/global/apis/-/versions/-").unwrap();
        assert!(collection.concrete_parent.is_none());
        assert!(collection
            .pattern
            .matches("projects/p/locations/global/apis/a/versions/v/specs/s"));
        assert!(!collection
            .pattern
            .matches("projects/p/locations/global/apis/a/versions/v"));
    }

    #[test]
    fn mixed_wildcard_and_literal() {
        let collection =
            version_collection("projects/-/locations/global/apis/my-api").unwrap();
        assert!(collection.concrete_parent.is_none());
        assert!(collection
            .pattern
            .matches("projects/p1/locations/global/apis/my-api/versions/v1"));
        assert!(!collection
            .pattern
            .matches("projects/p1/locations/global/apis/other/versions/v1"));
    }

    #[test]
    fn artifact_parents_at_every_level() {
        for (parent, expected_kind) in [
            ("projects/p", Kind::Project),
            ("projects/p/locations/global/apis/a", Kind::Api),
            ("projects/p/locations/global/apis/a/versions/v", Kind::Version),
            (
                "projects/p/locations/global/apis/a/versions/v/specs/s",
                Kind::Spec,
            ),
        ] {
            let collection = artifact_collection(parent).unwrap();
            assert_eq!(collection.kind, Kind::Artifact);
            let (parent_kind, parent_name) = collection.concrete_parent.clone().unwrap();
            assert_eq!(parent_kind, expected_kind);
            assert_eq!(parent_name, parent);
            assert!(collection.pattern.matches(&format!("{parent}/artifacts/x")));
            assert!(!collection.pattern.matches(&format!("{parent}/artifacts/x/y")));
        }
    }

    #[test]
    fn parent_case_is_canonicalized() {
        let collection = api_collection("projects/My-Project/locations/global").unwrap();
        assert_eq!(
            collection.concrete_parent,
            Some((Kind::Project, "projects/my-project".to_string()))
        );
    }

    #[test]
    fn malformed_parents_are_rejected() {
        assert!(project_collection("projects").is_err());
        assert!(api_collection("projects/p").is_err());
        assert!(api_collection("projects/p/locations/us-east1").is_err());
        assert!(version_collection("projects/p/locations/global/apis/bad_id").is_err());
        assert!(artifact_collection("projects/p/locations").is_err());
    }

    #[test]
    fn instantiate_fills_trailing_wildcard() {
        let collection = api_collection("projects/p/locations/global").unwrap();
        assert_eq!(
            collection.pattern.instantiate("my-api").as_deref(),
            Some("projects/p/locations/global/apis/my-api")
        );

        let wildcard = api_collection("projects/-/locations/global").unwrap();
        assert!(wildcard.pattern.instantiate("my-api").is_none());
    }

    #[test]
    fn pattern_display_uses_wildcard_marker() {
        let collection = version_collection("projects/-/locations/global/apis/my-api").unwrap();
        assert_eq!(
            collection.pattern.to_string(),
            "projects/-/locations/global/apis/my-api/versions/-"
        );
    }

    #[test]
    fn pattern_does_not_match_deeper_names() {
        let collection = api_collection("projects/p/locations/global").unwrap();
        assert!(!collection
            .pattern
            .matches("projects/p/locations/global/apis/a/versions/v"));
    }
}
