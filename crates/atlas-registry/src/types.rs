//! Request and response types for the engine's operation set.
//!
//! The surrounding transport layer builds these from already-parsed wire
//! requests; per-call options are explicit parameters here, never process
//! state.

use serde::{Deserialize, Serialize};

/// A Create request: choose an identifier under a concrete parent.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest<R> {
    /// The concrete parent collection, e.g.
    /// `projects/my-project/locations/global` for APIs. Empty for projects.
    pub parent: String,
    /// The caller-chosen identifier of the new resource.
    pub id: String,
    /// The resource body. A missing body is `InvalidArgument`.
    pub resource: Option<R>,
}

/// An Update request with field-mask and upsert semantics.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest<R> {
    /// The resource body; its `name` selects the target. A missing body is
    /// `InvalidArgument`.
    pub resource: Option<R>,
    /// Which fields to update. `None` and an empty path list both mean
    /// "merge populated fields"; the single path `"*"` means full
    /// replacement.
    pub update_mask: Option<FieldMask>,
    /// When true and the target is absent, create it instead.
    pub allow_missing: bool,
}

/// A List request over one collection.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// The parent collection; identifier segments may be the wildcard `-`.
    pub parent: String,
    /// Requested page size. `0` selects the server default; negative values
    /// are `InvalidArgument`.
    pub page_size: i32,
    /// Continuation token from a previous page, if resuming.
    pub page_token: Option<String>,
    /// Filter expression; empty admits everything.
    pub filter: String,
}

/// One page of List results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<R> {
    /// The admitted resources, in stable name order.
    pub resources: Vec<R>,
    /// Token for the next page; `None` when the enumeration is complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A set of field paths restricting which fields an Update touches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMask {
    /// The field paths. The single path `"*"` requests full replacement.
    pub paths: Vec<String>,
}

impl FieldMask {
    /// A mask naming the given paths.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this mask is the single-wildcard full-replacement mask.
    #[must_use]
    pub fn is_full_replacement(&self) -> bool {
        self.paths.len() == 1 && self.paths[0] == "*"
    }
}
