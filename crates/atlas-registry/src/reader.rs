//! Read-side engine: Get, List, and contents reads.
//!
//! Listing produces resources in ascending canonical-name order, the stable
//! total order every pagination guarantee depends on. A List call resolves
//! its parent pattern into a scan prefix, walks raw rows from the cursor,
//! admits rows through the pattern and the compiled filter, and slices the
//! admitted stream into one page. The emitted continuation token resumes
//! strictly after the last consumed row, so a sequence of calls returns the
//! full admitted set with no duplicates and no omissions.

use std::sync::Arc;

use atlas_core::error::{Error, Result};
use atlas_core::names::SpecName;
use atlas_core::storage::RegistryStore;

use crate::filter::Filter;
use crate::keys::{name_from_key, resource_key, revision_key};
use crate::models::{ApiSpec, Artifact};
use crate::page_token::{PageToken, fingerprint};
use crate::resource::{Resource, decode};
use crate::types::{ListRequest, ListResponse};

/// Page size when the request leaves it unset.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Raw rows one List call will consume before returning a partial page.
/// Bounds the work of a heavily-filtered call over a large collection; the
/// returned token resumes the scan where the budget ran out.
const SCAN_BUDGET: usize = 1000;

/// Rows fetched from the store per scan round-trip.
const SCAN_BATCH: usize = 256;

/// Read-side access to the registry.
#[derive(Clone)]
pub struct RegistryReader {
    store: Arc<dyn RegistryStore>,
}

impl RegistryReader {
    /// Creates a reader over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Fetches one resource by name. Any case variant of an existing name
    /// resolves to the stored resource.
    pub async fn get<R: Resource>(&self, name: &str) -> Result<R> {
        let canonical = R::canonical_name(name)?;
        let key = resource_key(R::KIND, &canonical);
        match self.store.get(&key).await? {
            Some(record) => decode(&record.value),
            None => Err(Error::not_found(format!(
                "{} {canonical} not found",
                R::KIND.noun()
            ))),
        }
    }

    /// Lists one page of a collection.
    pub async fn list<R: Resource>(&self, request: &ListRequest) -> Result<ListResponse<R>> {
        if request.page_size < 0 {
            return Err(Error::invalid_argument("page size must not be negative"));
        }
        let page_size = match request.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => usize::try_from(n).unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE),
        };

        let collection = R::collection(&request.parent)?;
        let filter = Filter::compile(&request.filter, R::FILTER_FIELDS)?;
        let shape = fingerprint(
            R::KIND,
            &collection.pattern.to_string(),
            &request.filter,
            page_size,
        );

        let cursor = match request.page_token.as_deref() {
            Some(token) if !token.is_empty() => Some(PageToken::decode(token, &shape)?.cursor),
            _ => None,
        };

        if let Some((parent_kind, parent_name)) = &collection.concrete_parent {
            let parent_key = resource_key(*parent_kind, parent_name);
            if self.store.get(&parent_key).await?.is_none() {
                return Err(Error::not_found(format!(
                    "{} {parent_name} not found",
                    parent_kind.noun()
                )));
            }
        }

        let scan_prefix = format!(
            "{}/{}",
            R::KIND.keyspace(),
            collection.pattern.scan_prefix()
        );
        let mut start_after = cursor
            .as_ref()
            .map(|name| resource_key(R::KIND, name));

        let mut resources: Vec<R> = Vec::new();
        // Canonical name of the last row this call consumed; the token
        // resumes strictly after it. Rows between the last admitted row and
        // the resume point are all non-matching, so re-scanning them on the
        // next page cannot duplicate results.
        let mut resume = cursor;
        let mut next_cursor = None;
        let mut scanned = 0usize;

        'scan: loop {
            let batch = self
                .store
                .scan_after(&scan_prefix, start_after.as_deref(), SCAN_BATCH)
                .await?;
            let batch_len = batch.len();

            for record in batch {
                if scanned == SCAN_BUDGET {
                    next_cursor.clone_from(&resume);
                    break 'scan;
                }

                let name = name_from_key(R::KIND, &record.key).to_string();
                let admitted = if collection.pattern.matches(&name) {
                    let resource: R = decode(&record.value)?;
                    filter
                        .matches(|field| resource.filter_field(field))
                        .then_some(resource)
                } else {
                    None
                };

                if admitted.is_some() && resources.len() == page_size {
                    // The page is full and another match exists, so this is
                    // not the final page. Leave the extra match unconsumed.
                    next_cursor.clone_from(&resume);
                    break 'scan;
                }

                scanned += 1;
                resume = Some(name);
                if let Some(resource) = admitted {
                    resources.push(resource);
                }
            }

            if batch_len < SCAN_BATCH {
                break;
            }
            start_after = resume.as_ref().map(|name| resource_key(R::KIND, name));
        }

        Ok(ListResponse {
            resources,
            next_page_token: next_cursor.map(|cursor| PageToken::new(cursor, shape).encode()),
        })
    }

    /// Raw contents of a spec, addressed by name with an optional
    /// `@revision-id` suffix for archived revisions.
    pub async fn spec_contents(&self, name: &str) -> Result<(String, Vec<u8>)> {
        let (spec_name, revision) = SpecName::parse_with_revision(name)?;
        let canonical = spec_name.to_string();
        let current: ApiSpec = self.get(&canonical).await?;
        match revision {
            None => Ok((current.mime_type, current.contents)),
            Some(revision_id) if Some(revision_id.as_str()) == current.revision() => {
                Ok((current.mime_type, current.contents))
            }
            Some(revision_id) => {
                let key = revision_key(&canonical, &revision_id);
                match self.store.get(&key).await? {
                    Some(record) => {
                        let archived: ApiSpec = decode(&record.value)?;
                        Ok((archived.mime_type, archived.contents))
                    }
                    None => Err(Error::not_found(format!(
                        "spec revision {canonical}@{revision_id} not found"
                    ))),
                }
            }
        }
    }

    /// Raw contents of an artifact.
    pub async fn artifact_contents(&self, name: &str) -> Result<(String, Vec<u8>)> {
        let artifact: Artifact = self.get(name).await?;
        Ok((artifact.mime_type, artifact.contents))
    }
}
