//! API version endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use atlas_registry::{ApiVersion, CreateRequest, ListResponse, UpdateRequest};

use crate::error::ApiResult;
use crate::routes::{ListQuery, UpdateQuery};
use crate::state::RegistryState;

/// Version route group.
pub fn routes() -> Router<RegistryState> {
    Router::new()
        .route(
            "/projects/:project/locations/global/apis/:api/versions",
            axum::routing::post(create_version).get(list_versions),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version",
            get(get_version).patch(update_version).delete(delete_version),
        )
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct CreateVersionQuery {
    /// Caller-chosen identifier for the new version.
    #[serde(default)]
    pub(crate) api_version_id: Option<String>,
}

fn version_name(project: &str, api: &str, version: &str) -> String {
    format!("projects/{project}/locations/global/apis/{api}/versions/{version}")
}

/// `POST .../apis/{api}/versions`
#[utoipa::path(
    post,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions",
    tag = "Versions",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        CreateVersionQuery,
    ),
    responses(
        (status = 200, description = "Version created"),
        (status = 400, description = "Invalid identifier or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent API not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Version already exists", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn create_version(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
    Query(query): Query<CreateVersionQuery>,
    Json(body): Json<ApiVersion>,
) -> ApiResult<Json<ApiVersion>> {
    let created = state
        .writer
        .create(CreateRequest {
            parent: format!("projects/{project}/locations/global/apis/{api}"),
            id: query.api_version_id.unwrap_or_default(),
            resource: Some(body),
        })
        .await?;
    Ok(Json(created))
}

/// `GET .../apis/{api}/versions`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions",
    tag = "Versions",
    params(
        ("project" = String, Path, description = "Parent project, `-` for any"),
        ("api" = String, Path, description = "Parent API, `-` for any"),
        ListQuery,
    ),
    responses(
        (status = 200, description = "Versions listed"),
        (status = 400, description = "Invalid filter, page size, or token", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent API not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn list_versions(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<ApiVersion>>> {
    let parent = format!("projects/{project}/locations/global/apis/{api}");
    let page = state.reader.list(&query.into_request(parent)).await?;
    Ok(Json(page))
}

/// `GET .../versions/{version}`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}",
    tag = "Versions",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Version identifier"),
    ),
    responses(
        (status = 200, description = "Version found"),
        (status = 404, description = "Version not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn get_version(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
) -> ApiResult<Json<ApiVersion>> {
    let found = state
        .reader
        .get(&version_name(&project, &api, &version))
        .await?;
    Ok(Json(found))
}

/// `PATCH .../versions/{version}`
#[utoipa::path(
    patch,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}",
    tag = "Versions",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Version identifier"),
        UpdateQuery,
    ),
    responses(
        (status = 200, description = "Version updated"),
        (status = 400, description = "Invalid mask or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Version not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn update_version(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(mut body): Json<ApiVersion>,
) -> ApiResult<Json<ApiVersion>> {
    body.name = version_name(&project, &api, &version);
    let updated = state
        .writer
        .update(UpdateRequest {
            resource: Some(body),
            update_mask: query.mask(),
            allow_missing: query.allow_missing,
        })
        .await?;
    Ok(Json(updated))
}

/// `DELETE .../versions/{version}`
#[utoipa::path(
    delete,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}",
    tag = "Versions",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Version identifier"),
    ),
    responses(
        (status = 200, description = "Version deleted"),
        (status = 404, description = "Version not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn delete_version(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .writer
        .delete::<ApiVersion>(&version_name(&project, &api, &version))
        .await?;
    Ok(Json(serde_json::json!({})))
}
