//! Route handlers for the registry API, one module per resource kind.

pub mod apis;
pub mod artifacts;
pub mod projects;
pub mod specs;
pub mod versions;

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::IntoParams;

use atlas_registry::{FieldMask, ListRequest};

/// Query parameters shared by every List endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Maximum number of results to return; `0` selects the default.
    #[serde(default)]
    pub page_size: Option<i32>,
    /// Continuation token from a previous page.
    #[serde(default)]
    pub page_token: Option<String>,
    /// Filter expression over the listed kind's fields.
    #[serde(default)]
    pub filter: Option<String>,
}

impl ListQuery {
    /// Builds the engine request for the given parent collection.
    #[must_use]
    pub fn into_request(self, parent: String) -> ListRequest {
        ListRequest {
            parent,
            page_size: self.page_size.unwrap_or(0),
            page_token: self.page_token,
            filter: self.filter.unwrap_or_default(),
        }
    }
}

/// Query parameters shared by every Update endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UpdateQuery {
    /// Comma-separated field paths to update; `*` requests full
    /// replacement. Absent means "merge populated fields".
    #[serde(default)]
    pub update_mask: Option<String>,
    /// When true, an absent target is created instead.
    #[serde(default)]
    pub allow_missing: bool,
}

impl UpdateQuery {
    /// Parses the `update_mask` parameter into an engine field mask.
    #[must_use]
    pub fn mask(&self) -> Option<FieldMask> {
        self.update_mask.as_ref().map(|raw| {
            FieldMask::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .map(String::from),
            )
        })
    }
}

/// Builds a raw-contents response with the stored mime type.
pub(crate) fn contents_response(mime_type: String, contents: Vec<u8>) -> Response {
    let mime = if mime_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime_type
    };
    ([(CONTENT_TYPE, mime)], contents).into_response()
}
