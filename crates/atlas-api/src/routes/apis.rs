//! API endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use atlas_registry::{Api, CreateRequest, ListResponse, UpdateRequest};

use crate::error::ApiResult;
use crate::routes::{ListQuery, UpdateQuery};
use crate::state::RegistryState;

/// API route group.
pub fn routes() -> Router<RegistryState> {
    Router::new()
        .route(
            "/projects/:project/locations/global/apis",
            axum::routing::post(create_api).get(list_apis),
        )
        .route(
            "/projects/:project/locations/global/apis/:api",
            get(get_api).patch(update_api).delete(delete_api),
        )
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct CreateApiQuery {
    /// Caller-chosen identifier for the new API.
    #[serde(default)]
    pub(crate) api_id: Option<String>,
}

fn api_name(project: &str, api: &str) -> String {
    format!("projects/{project}/locations/global/apis/{api}")
}

/// `POST /v1/projects/{project}/locations/global/apis`
#[utoipa::path(
    post,
    path = "/v1/projects/{project}/locations/global/apis",
    tag = "Apis",
    params(("project" = String, Path, description = "Parent project"), CreateApiQuery),
    responses(
        (status = 200, description = "API created"),
        (status = 400, description = "Invalid identifier or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent project not found", body = crate::error::ErrorResponse),
        (status = 409, description = "API already exists", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api_id = ?query.api_id))]
pub async fn create_api(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
    Query(query): Query<CreateApiQuery>,
    Json(body): Json<Api>,
) -> ApiResult<Json<Api>> {
    let created = state
        .writer
        .create(CreateRequest {
            parent: format!("projects/{project}/locations/global"),
            id: query.api_id.unwrap_or_default(),
            resource: Some(body),
        })
        .await?;
    Ok(Json(created))
}

/// `GET /v1/projects/{project}/locations/global/apis`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis",
    tag = "Apis",
    params(("project" = String, Path, description = "Parent project, `-` for any"), ListQuery),
    responses(
        (status = 200, description = "APIs listed"),
        (status = 400, description = "Invalid filter, page size, or token", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent project not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project))]
pub async fn list_apis(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Api>>> {
    let parent = format!("projects/{project}/locations/global");
    let page = state.reader.list(&query.into_request(parent)).await?;
    Ok(Json(page))
}

/// `GET /v1/projects/{project}/locations/global/apis/{api}`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/locations/global/apis/{api}",
    tag = "Apis",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "API identifier"),
    ),
    responses(
        (status = 200, description = "API found"),
        (status = 404, description = "API not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn get_api(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
) -> ApiResult<Json<Api>> {
    let found = state.reader.get(&api_name(&project, &api)).await?;
    Ok(Json(found))
}

/// `PATCH /v1/projects/{project}/locations/global/apis/{api}`
#[utoipa::path(
    patch,
    path = "/v1/projects/{project}/locations/global/apis/{api}",
    tag = "Apis",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "API identifier"),
        UpdateQuery,
    ),
    responses(
        (status = 200, description = "API updated"),
        (status = 400, description = "Invalid mask or body", body = crate::error::ErrorResponse),
        (status = 404, description = "API not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn update_api(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(mut body): Json<Api>,
) -> ApiResult<Json<Api>> {
    body.name = api_name(&project, &api);
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

/// `DELETE /v1/projects/{project}/locations/global/apis/{api}`
#[utoipa::path(
    delete,
    path = "/v1/projects/{project}/locations/global/apis/{api}",
    tag = "Apis",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("api" = String, Path, description = "API identifier"),
    ),
    responses(
        (status = 200, description = "API deleted"),
        (status = 404, description = "API not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn delete_api(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    state.writer.delete::<Api>(&api_name(&project, &api)).await?;
    Ok(Json(serde_json::json!({})))
}
