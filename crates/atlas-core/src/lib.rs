//! # atlas-core
//!
//! Core primitives for the Atlas registry.
//!
//! This crate provides the foundational types shared by the engine and the
//! API surface:
//!
//! - **Resource Names**: the hierarchical name grammar, strict identifier
//!   validation, and wildcard collection patterns
//! - **Storage**: the ordered key-value contract (point lookup, resumable
//!   prefix scan, compare-and-swap writes) and an in-memory backend
//! - **Error Types**: shared status-kind error definitions
//! - **Observability**: logging initialization and span helpers
//!
//! ## Example
//!
//! ```rust
//! use atlas_core::names::ApiName;
//!
//! let name = ApiName::parse("projects/demo/locations/global/apis/My-Api").unwrap();
//! assert_eq!(name.api_id, "my-api");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod names;
pub mod observability;
pub mod patterns;
pub mod storage;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::names::{
        ApiName, ArtifactName, ArtifactParent, Kind, ProjectName, SpecName, VersionName,
        canonical_id, validate_id,
    };
    pub use crate::patterns::{CollectionPattern, NamePattern, Segment};
    pub use crate::storage::{
        MemoryStore, Record, RegistryStore, WritePrecondition, WriteResult,
    };
}

pub use error::{Error, Result};
pub use names::Kind;
pub use observability::{LogFormat, init_logging, registry_span};
pub use storage::{MemoryStore, Record, RegistryStore, WritePrecondition, WriteResult};
