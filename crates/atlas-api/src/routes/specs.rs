//! API spec endpoints, including raw contents reads.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use atlas_registry::{ApiSpec, CreateRequest, ListResponse, UpdateRequest};

use crate::error::ApiResult;
use crate::routes::{ListQuery, UpdateQuery, contents_response};
use crate::state::RegistryState;

/// Spec route group.
pub fn routes() -> Router<RegistryState> {
    Router::new()
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/specs",
            axum::routing::post(create_spec).get(list_specs),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/specs/:spec",
            get(get_spec).patch(update_spec).delete(delete_spec),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/specs/:spec/contents",
            get(get_spec_contents),
        )
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct CreateSpecQuery {
    /// Caller-chosen identifier for the new spec.
    #[serde(default)]
    pub(crate) api_spec_id: Option<String>,
}

fn spec_name(project: &str, api: &str, version: &str, spec: &str) -> String {
    format!(
        "projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}"
    )
}

/// `POST .../versions/{version}/specs`
#[utoipa::path(
    post,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}/specs",
    tag = "Specs",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Parent version"),
        CreateSpecQuery,
    ),
    responses(
        (status = 200, description = "Spec created"),
        (status = 400, description = "Invalid identifier or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent version not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Spec already exists", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn create_spec(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
    Query(query): Query<CreateSpecQuery>,
    Json(body): Json<ApiSpec>,
) -> ApiResult<Json<ApiSpec>> {
    let created = state
        .writer
        .create(CreateRequest {
            parent: format!(
                "projects/{project}/locations/global/apis/{api}/versions/{version}"
            ),
            id: query.api_spec_id.unwrap_or_default(),
            resource: Some(body),
        })
        .await?;
    Ok(Json(created))
}

/// `GET .../versions/{version}/specs`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}/specs",
    tag = "Specs",
    params(
        ("project" = String, Path, description = "Parent project, `-` for any"),
        ("api" = String, Path, description = "Parent API, `-` for any"),
        ("version" = String, Path, description = "Parent version, `-` for any"),
        ListQuery,
    ),
    responses(
        (status = 200, description = "Specs listed"),
        (status = 400, description = "Invalid filter, page size, or token", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent version not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn list_specs(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<ApiSpec>>> {
    let parent =
        format!("projects/{project}/locations/global/apis/{api}/versions/{version}");
    let page = state.reader.list(&query.into_request(parent)).await?;
    Ok(Json(page))
}

/// `GET .../specs/{spec}`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}",
    tag = "Specs",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Parent version"),
        ("spec" = String, Path, description = "Spec identifier"),
    ),
    responses(
        (status = 200, description = "Spec found"),
        (status = 404, description = "Spec not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version, spec = %spec))]
pub async fn get_spec(
    State(state): State<RegistryState>,
    Path((project, api, version, spec)): Path<(String, String, String, String)>,
) -> ApiResult<Json<ApiSpec>> {
    let found = state
        .reader
        .get(&spec_name(&project, &api, &version, &spec))
        .await?;
    Ok(Json(found))
}

/// `GET .../specs/{spec}/contents`
///
/// The spec segment may carry an `@revision-id` suffix to address an
/// archived revision.
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}/contents",
    tag = "Specs",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Parent version"),
        ("spec" = String, Path, description = "Spec identifier, optionally `@revision-id`"),
    ),
    responses(
        (status = 200, description = "Raw spec contents"),
        (status = 404, description = "Spec or revision not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version, spec = %spec))]
pub async fn get_spec_contents(
    State(state): State<RegistryState>,
    Path((project, api, version, spec)): Path<(String, String, String, String)>,
) -> ApiResult<Response> {
    let (mime_type, contents) = state
        .reader
        .spec_contents(&spec_name(&project, &api, &version, &spec))
        .await?;
    Ok(contents_response(mime_type, contents))
}

/// `PATCH .../specs/{spec}`
#[utoipa::path(
    patch,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}",
    tag = "Specs",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Parent version"),
        ("spec" = String, Path, description = "Spec identifier"),
        UpdateQuery,
    ),
    responses(
        (status = 200, description = "Spec updated"),
        (status = 400, description = "Invalid mask or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Spec not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version, spec = %spec))]
pub async fn update_spec(
    State(state): State<RegistryState>,
    Path((project, api, version, spec)): Path<(String, String, String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(mut body): Json<ApiSpec>,
) -> ApiResult<Json<ApiSpec>> {
    body.name = spec_name(&project, &api, &version, &spec);
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

/// `DELETE .../specs/{spec}`
#[utoipa::path(
    delete,
    path = "/v1/projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}",
    tag = "Specs",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "Parent API"),
        ("version" = String, Path, description = "Parent version"),
        ("spec" = String, Path, description = "Spec identifier"),
    ),
    responses(
        (status = 200, description = "Spec deleted"),
        (status = 404, description = "Spec not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api, version = %version, spec = %spec))]
pub async fn delete_spec(
    State(state): State<RegistryState>,
    Path((project, api, version, spec)): Path<(String, String, String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .writer
        .delete::<ApiSpec>(&spec_name(&project, &api, &version, &spec))
        .await?;
    Ok(Json(serde_json::json!({})))
}
