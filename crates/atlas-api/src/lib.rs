//! # atlas-api
//!
//! REST surface for the Atlas registry.
//!
//! This crate mounts the engine's Create/Get/List/Update/Delete operation
//! set as an axum router, one route module per resource kind, with:
//!
//! - HTTP status mapping for engine errors (400/404/409/500) and a stable
//!   `error_code` in every error payload
//! - `update_mask` / `allow_missing` query parameters on PATCH routes
//! - `page_size` / `page_token` / `filter` query parameters on List routes
//! - raw contents endpoints for specs (with `@revision-id` addressing) and
//!   artifacts
//! - an OpenAPI document at `/openapi.json`
//!
//! ## Example
//!
//! ```rust,ignore
//! use atlas_api::{RegistryState, registry_router};
//! use atlas_core::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let state = RegistryState::new(Arc::new(MemoryStore::new()));
//! let app = registry_router(state);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod openapi;
pub mod router;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorDetail, ErrorResponse};
pub use openapi::{RegistryApiDoc, openapi};
pub use router::registry_router;
pub use state::{RegistryConfig, RegistryState};
