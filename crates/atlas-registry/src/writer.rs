//! Write-side engine: Create, Update, and Delete.
//!
//! Every mutation is a single conditional write: creates insert with a
//! does-not-exist precondition, updates replace with a version-match
//! precondition. A reader therefore never observes a partially-written
//! record, and a lost race surfaces as an error instead of a silent
//! overwrite; the engine never retries on its own.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use atlas_core::error::{Error, Result};
use atlas_core::names::{Kind, canonical_id, validate_id};
use atlas_core::storage::{RegistryStore, WritePrecondition, WriteResult};

use crate::keys::{resource_key, revision_key};
use crate::resource::{Resource, decode, encode};
use crate::types::{CreateRequest, UpdateRequest};

/// Write-side access to the registry.
#[derive(Clone)]
pub struct RegistryWriter {
    store: Arc<dyn RegistryStore>,
}

impl RegistryWriter {
    /// Creates a writer over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    /// Creates a resource under a concrete parent.
    ///
    /// The existence check runs before strict identifier validation so that
    /// re-creating an existing resource under a different case reports
    /// `AlreadyExists` rather than `InvalidArgument`.
    pub async fn create<R: Resource>(&self, request: CreateRequest<R>) -> Result<R> {
        let collection = R::collection(&request.parent)?;
        if R::KIND != Kind::Project && collection.concrete_parent.is_none() {
            return Err(Error::invalid_argument(
                "create parent must not contain wildcards",
            ));
        }
        let Some(body) = request.resource else {
            return Err(Error::invalid_argument(format!(
                "missing {} body",
                R::KIND.noun()
            )));
        };
        if request.id.is_empty() {
            return Err(Error::invalid_argument("missing identifier"));
        }

        if let Some((parent_kind, parent_name)) = &collection.concrete_parent {
            let parent_key = resource_key(*parent_kind, parent_name);
            if self.store.get(&parent_key).await?.is_none() {
                return Err(Error::not_found(format!(
                    "{} {parent_name} not found",
                    parent_kind.noun()
                )));
            }
        }

        let id = canonical_id(&request.id)?;
        let name = collection
            .pattern
            .instantiate(&id)
            .ok_or_else(|| Error::internal("create pattern is not concrete"))?;
        let key = resource_key(R::KIND, &name);
        if self.store.get(&key).await?.is_some() {
            return Err(Error::already_exists(format!(
                "{} {name} already exists",
                R::KIND.noun()
            )));
        }
        validate_id(&request.id)?;

        let now = Utc::now();
        let mut resource = body;
        resource.set_name(name.clone());
        resource.set_times(now, now);
        resource.finalize(None, now);

        let encoded = encode(&resource)?;
        match self
            .store
            .put(&key, encoded, WritePrecondition::DoesNotExist)
            .await?
        {
            WriteResult::Success { .. } => {
                debug!(name = %name, kind = R::KIND.noun(), "created resource");
                Ok(resource)
            }
            WriteResult::PreconditionFailed { .. } => Err(Error::already_exists(format!(
                "{} {name} already exists",
                R::KIND.noun()
            ))),
        }
    }

    /// Updates a resource, applying field-mask semantics; with
    /// `allow_missing`, creates an absent target instead (ancestors are
    /// never auto-created, and the mask is ignored since there is no prior
    /// state to merge against).
    pub async fn update<R: Resource>(&self, request: UpdateRequest<R>) -> Result<R> {
        let Some(body) = request.resource else {
            return Err(Error::invalid_argument(format!(
                "missing {} body",
                R::KIND.noun()
            )));
        };
        if body.name().is_empty() {
            return Err(Error::invalid_argument("missing resource name"));
        }
        let canonical = R::canonical_name(body.name())?;
        let key = resource_key(R::KIND, &canonical);
        let now = Utc::now();

        let Some(record) = self.store.get(&key).await? else {
            if !request.allow_missing {
                return Err(Error::not_found(format!(
                    "{} {canonical} not found",
                    R::KIND.noun()
                )));
            }
            let id = canonical.rsplit('/').next().unwrap_or_default();
            validate_id(id)?;

            let mut resource = body;
            resource.set_name(canonical.clone());
            resource.set_times(now, now);
            resource.finalize(None, now);

            let encoded = encode(&resource)?;
            return match self
                .store
                .put(&key, encoded, WritePrecondition::DoesNotExist)
                .await?
            {
                WriteResult::Success { .. } => {
                    debug!(name = %canonical, kind = R::KIND.noun(), "upserted resource");
                    Ok(resource)
                }
                WriteResult::PreconditionFailed { .. } => Err(Error::aborted(format!(
                    "concurrent create of {canonical}"
                ))),
            };
        };

        let current: R = decode(&record.value)?;
        let mut updated = current.clone();
        match &request.update_mask {
            None => updated.merge_populated(&body),
            Some(mask) if mask.paths.is_empty() => updated.merge_populated(&body),
            Some(mask) if mask.is_full_replacement() => updated.replace_all(&body),
            Some(mask) => {
                for path in &mask.paths {
                    if !R::MASK_FIELDS.contains(&path.as_str()) {
                        return Err(Error::invalid_argument(format!(
                            "unknown update mask field {path:?}"
                        )));
                    }
                }
                for path in &mask.paths {
                    updated.apply_field(path, &body);
                }
            }
        }

        // The name never changes, create_time is never altered, and
        // update_time never moves backwards.
        updated.set_name(current.name().to_string());
        let update_time = current.update_time().map_or(now, |previous| now.max(previous));
        updated.set_times(current.create_time().unwrap_or(now), update_time);
        updated.finalize(Some(&current), update_time);

        if let (Some(old_revision), Some(new_revision)) = (current.revision(), updated.revision()) {
            if old_revision != new_revision {
                let archive_key = revision_key(&canonical, old_revision);
                let archived = encode(&current)?;
                // Archived revisions are immutable; an already-present
                // archive from a replay keeps its original bytes.
                self.store
                    .put(&archive_key, archived, WritePrecondition::DoesNotExist)
                    .await?;
            }
        }

        let encoded = encode(&updated)?;
        match self
            .store
            .put(
                &key,
                encoded,
                WritePrecondition::MatchesVersion(record.version),
            )
            .await?
        {
            WriteResult::Success { .. } => {
                debug!(name = %canonical, kind = R::KIND.noun(), "updated resource");
                Ok(updated)
            }
            WriteResult::PreconditionFailed { .. } => Err(Error::aborted(format!(
                "concurrent update of {canonical}"
            ))),
        }
    }

    /// Deletes a resource and its descendants.
    pub async fn delete<R: Resource>(&self, name: &str) -> Result<()> {
        let canonical = R::canonical_name(name)?;
        let key = resource_key(R::KIND, &canonical);
        if self.store.get(&key).await?.is_none() {
            return Err(Error::not_found(format!(
                "{} {canonical} not found",
                R::KIND.noun()
            )));
        }
        self.store.delete(&key).await?;
        for prefix in R::cascade_prefixes(&canonical) {
            self.store.delete_prefix(&prefix).await?;
        }
        debug!(name = %canonical, kind = R::KIND.noun(), "deleted resource");
        Ok(())
    }
}
