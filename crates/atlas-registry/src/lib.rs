//! # atlas-registry
//!
//! The resource query and mutation engine of the Atlas registry.
//!
//! The registry manages a strict five-level hierarchy, each level a named
//! collection:
//!
//! ```text
//! Project → Api → ApiVersion → ApiSpec (+ Artifact at any level)
//! ```
//!
//! This crate implements the engine behind the Create/Get/List/Update/
//! Delete operation set:
//!
//! - **Models**: the five resource kinds behind one capability trait
//! - **Filter Evaluator**: eagerly-compiled `==`/`!=` predicates over
//!   registered string fields
//! - **Pagination**: stable name-ordered enumeration with opaque,
//!   self-validating continuation tokens
//! - **Mutation**: field-mask updates with upsert semantics, timestamp
//!   invariants, and spec revisioning, all over conditional writes
//!
//! The engine is invoked per-request by a surrounding transport layer and
//! holds no internal thread pool or retry logic.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod filter;
pub mod keys;
pub mod models;
pub mod page_token;
pub mod reader;
pub mod resource;
pub mod types;
pub mod writer;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::filter::Filter;
    pub use crate::models::{Api, ApiSpec, ApiVersion, Artifact, Project};
    pub use crate::page_token::PageToken;
    pub use crate::reader::RegistryReader;
    pub use crate::resource::Resource;
    pub use crate::types::{
        CreateRequest, FieldMask, ListRequest, ListResponse, UpdateRequest,
    };
    pub use crate::writer::RegistryWriter;
}

pub use models::{Api, ApiSpec, ApiVersion, Artifact, Project};
pub use reader::RegistryReader;
pub use resource::Resource;
pub use types::{CreateRequest, FieldMask, ListRequest, ListResponse, UpdateRequest};
pub use writer::RegistryWriter;
