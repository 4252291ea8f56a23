//! Artifact endpoints.
//!
//! Artifacts attach at every level of the hierarchy, so the same five
//! operations (plus contents reads) are mounted under four parent shapes:
//! project, API, version, and spec. The handlers share one implementation
//! per operation; the per-level wrappers only assemble the parent name.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use atlas_registry::{Artifact, CreateRequest, ListResponse, UpdateRequest};

use crate::error::ApiResult;
use crate::routes::{ListQuery, UpdateQuery, contents_response};
use crate::state::RegistryState;

/// Artifact route group, covering all four parent levels.
pub fn routes() -> Router<RegistryState> {
    Router::new()
        // Project-level artifacts.
        .route(
            "/projects/:project/artifacts",
            axum::routing::post(create_project_artifact).get(list_project_artifacts),
        )
        .route(
            "/projects/:project/artifacts/:artifact",
            get(get_project_artifact)
                .patch(update_project_artifact)
                .delete(delete_project_artifact),
        )
        .route(
            "/projects/:project/artifacts/:artifact/contents",
            get(project_artifact_contents),
        )
        // API-level artifacts.
        .route(
            "/projects/:project/locations/global/apis/:api/artifacts",
            axum::routing::post(create_api_artifact).get(list_api_artifacts),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/artifacts/:artifact",
            get(get_api_artifact)
                .patch(update_api_artifact)
                .delete(delete_api_artifact),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/artifacts/:artifact/contents",
            get(api_artifact_contents),
        )
        // Version-level artifacts.
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/artifacts",
            axum::routing::post(create_version_artifact).get(list_version_artifacts),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/artifacts/:artifact",
            get(get_version_artifact)
                .patch(update_version_artifact)
                .delete(delete_version_artifact),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/artifacts/:artifact/contents",
            get(version_artifact_contents),
        )
        // Spec-level artifacts.
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/specs/:spec/artifacts",
            axum::routing::post(create_spec_artifact).get(list_spec_artifacts),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/specs/:spec/artifacts/:artifact",
            get(get_spec_artifact)
                .patch(update_spec_artifact)
                .delete(delete_spec_artifact),
        )
        .route(
            "/projects/:project/locations/global/apis/:api/versions/:version/specs/:spec/artifacts/:artifact/contents",
            get(spec_artifact_contents),
        )
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct CreateArtifactQuery {
    /// Caller-chosen identifier for the new artifact.
    #[serde(default)]
    pub(crate) artifact_id: Option<String>,
}

fn project_parent(project: &str) -> String {
    format!("projects/{project}")
}

fn api_parent(project: &str, api: &str) -> String {
    format!("projects/{project}/locations/global/apis/{api}")
}

fn version_parent(project: &str, api: &str, version: &str) -> String {
    format!("projects/{project}/locations/global/apis/{api}/versions/{version}")
}

fn spec_parent(project: &str, api: &str, version: &str, spec: &str) -> String {
    format!(
        "projects/{project}/locations/global/apis/{api}/versions/{version}/specs/{spec}"
    )
}

async fn create_impl(
    state: RegistryState,
    parent: String,
    query: CreateArtifactQuery,
    body: Artifact,
) -> ApiResult<Json<Artifact>> {
    let created = state
        .writer
        .create(CreateRequest {
            parent,
            id: query.artifact_id.unwrap_or_default(),
            resource: Some(body),
        })
        .await?;
    Ok(Json(created))
}

async fn list_impl(
    state: RegistryState,
    parent: String,
    query: ListQuery,
) -> ApiResult<Json<ListResponse<Artifact>>> {
    let page = state.reader.list(&query.into_request(parent)).await?;
    Ok(Json(page))
}

async fn get_impl(state: RegistryState, name: String) -> ApiResult<Json<Artifact>> {
    let found = state.reader.get(&name).await?;
    Ok(Json(found))
}

async fn update_impl(
    state: RegistryState,
    name: String,
    query: UpdateQuery,
    mut body: Artifact,
) -> ApiResult<Json<Artifact>> {
    body.name = name;
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

async fn delete_impl(state: RegistryState, name: String) -> ApiResult<Json<serde_json::Value>> {
    state.writer.delete::<Artifact>(&name).await?;
    Ok(Json(serde_json::json!({})))
}

async fn contents_impl(state: RegistryState, name: String) -> ApiResult<Response> {
    let (mime_type, contents) = state.reader.artifact_contents(&name).await?;
    Ok(contents_response(mime_type, contents))
}

// --- Project-level artifacts -------------------------------------------

/// `POST /v1/projects/{project}/artifacts`
#[utoipa::path(
    post,
    path = "/v1/projects/{project}/artifacts",
    tag = "Artifacts",
    params(("project" = String, Path, description = "Parent project"), CreateArtifactQuery),
    responses(
        (status = 200, description = "Artifact created"),
        (status = 400, description = "Invalid identifier or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Artifact already exists", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project))]
pub async fn create_project_artifact(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
    Query(query): Query<CreateArtifactQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    create_impl(state, project_parent(&project), query, body).await
}

/// `GET /v1/projects/{project}/artifacts`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/artifacts",
    tag = "Artifacts",
    params(("project" = String, Path, description = "Parent project, `-` for any"), ListQuery),
    responses(
        (status = 200, description = "Artifacts listed"),
        (status = 400, description = "Invalid filter, page size, or token", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project))]
pub async fn list_project_artifacts(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Artifact>>> {
    list_impl(state, project_parent(&project), query).await
}

/// `GET /v1/projects/{project}/artifacts/{artifact}`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/artifacts/{artifact}",
    tag = "Artifacts",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("artifact" = String, Path, description = "Artifact identifier"),
    ),
    responses(
        (status = 200, description = "Artifact found"),
        (status = 404, description = "Artifact not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, artifact = %artifact))]
pub async fn get_project_artifact(
    State(state): State<RegistryState>,
    Path((project, artifact)): Path<(String, String)>,
) -> ApiResult<Json<Artifact>> {
    get_impl(state, format!("{}/artifacts/{artifact}", project_parent(&project))).await
}

/// `PATCH /v1/projects/{project}/artifacts/{artifact}`
#[utoipa::path(
    patch,
    path = "/v1/projects/{project}/artifacts/{artifact}",
    tag = "Artifacts",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("artifact" = String, Path, description = "Artifact identifier"),
        UpdateQuery,
    ),
    responses(
        (status = 200, description = "Artifact updated"),
        (status = 400, description = "Invalid mask or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Artifact not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, artifact = %artifact))]
pub async fn update_project_artifact(
    State(state): State<RegistryState>,
    Path((project, artifact)): Path<(String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    update_impl(
        state,
        format!("{}/artifacts/{artifact}", project_parent(&project)),
        query,
        body,
    )
    .await
}

/// `DELETE /v1/projects/{project}/artifacts/{artifact}`
#[utoipa::path(
    delete,
    path = "/v1/projects/{project}/artifacts/{artifact}",
    tag = "Artifacts",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("artifact" = String, Path, description = "Artifact identifier"),
    ),
    responses(
        (status = 200, description = "Artifact deleted"),
        (status = 404, description = "Artifact not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, artifact = %artifact))]
pub async fn delete_project_artifact(
    State(state): State<RegistryState>,
    Path((project, artifact)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    delete_impl(state, format!("{}/artifacts/{artifact}", project_parent(&project))).await
}

/// `GET /v1/projects/{project}/artifacts/{artifact}/contents`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}/artifacts/{artifact}/contents",
    tag = "Artifacts",
    params(
        ("project" = String, Path, description = "Parent project"),
        ("artifact" = String, Path, description = "Artifact identifier"),
    ),
    responses(
        (status = 200, description = "Raw artifact contents"),
        (status = 404, description = "Artifact not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project, artifact = %artifact))]
pub async fn project_artifact_contents(
    State(state): State<RegistryState>,
    Path((project, artifact)): Path<(String, String)>,
) -> ApiResult<Response> {
    contents_impl(state, format!("{}/artifacts/{artifact}", project_parent(&project))).await
}

// --- API-level artifacts -----------------------------------------------
// Same shapes as the project level; the OpenAPI document describes the
// artifact surface once at the project level.

/// `POST .../apis/{api}/artifacts`
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn create_api_artifact(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
    Query(query): Query<CreateArtifactQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    create_impl(state, api_parent(&project, &api), query, body).await
}

/// `GET .../apis/{api}/artifacts`
#[instrument(skip_all, fields(project = %project, api = %api))]
pub async fn list_api_artifacts(
    State(state): State<RegistryState>,
    Path((project, api)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Artifact>>> {
    list_impl(state, api_parent(&project, &api), query).await
}

/// `GET .../apis/{api}/artifacts/{artifact}`
#[instrument(skip_all, fields(project = %project, api = %api, artifact = %artifact))]
pub async fn get_api_artifact(
    State(state): State<RegistryState>,
    Path((project, api, artifact)): Path<(String, String, String)>,
) -> ApiResult<Json<Artifact>> {
    get_impl(state, format!("{}/artifacts/{artifact}", api_parent(&project, &api))).await
}

/// `PATCH .../apis/{api}/artifacts/{artifact}`
#[instrument(skip_all, fields(project = %project, api = %api, artifact = %artifact))]
pub async fn update_api_artifact(
    State(state): State<RegistryState>,
    Path((project, api, artifact)): Path<(String, String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    update_impl(
        state,
        format!("{}/artifacts/{artifact}", api_parent(&project, &api)),
        query,
        body,
    )
    .await
}

/// `DELETE .../apis/{api}/artifacts/{artifact}`
#[instrument(skip_all, fields(project = %project, api = %api, artifact = %artifact))]
pub async fn delete_api_artifact(
    State(state): State<RegistryState>,
    Path((project, api, artifact)): Path<(String, String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    delete_impl(state, format!("{}/artifacts/{artifact}", api_parent(&project, &api))).await
}

/// `GET .../apis/{api}/artifacts/{artifact}/contents`
#[instrument(skip_all, fields(project = %project, api = %api, artifact = %artifact))]
pub async fn api_artifact_contents(
    State(state): State<RegistryState>,
    Path((project, api, artifact)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    contents_impl(state, format!("{}/artifacts/{artifact}", api_parent(&project, &api))).await
}

// --- Version-level artifacts -------------------------------------------

/// `POST .../versions/{version}/artifacts`
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn create_version_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
    Query(query): Query<CreateArtifactQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    create_impl(state, version_parent(&project, &api, &version), query, body).await
}

/// `GET .../versions/{version}/artifacts`
#[instrument(skip_all, fields(project = %project, api = %api, version = %version))]
pub async fn list_version_artifacts(
    State(state): State<RegistryState>,
    Path((project, api, version)): Path<(String, String, String)>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Artifact>>> {
    list_impl(state, version_parent(&project, &api, &version), query).await
}

/// `GET .../versions/{version}/artifacts/{artifact}`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn get_version_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, artifact)): Path<(String, String, String, String)>,
) -> ApiResult<Json<Artifact>> {
    get_impl(
        state,
        format!("{}/artifacts/{artifact}", version_parent(&project, &api, &version)),
    )
    .await
}

/// `PATCH .../versions/{version}/artifacts/{artifact}`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn update_version_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, artifact)): Path<(String, String, String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    update_impl(
        state,
        format!("{}/artifacts/{artifact}", version_parent(&project, &api, &version)),
        query,
        body,
    )
    .await
}

/// `DELETE .../versions/{version}/artifacts/{artifact}`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn delete_version_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, artifact)): Path<(String, String, String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    delete_impl(
        state,
        format!("{}/artifacts/{artifact}", version_parent(&project, &api, &version)),
    )
    .await
}

/// `GET .../versions/{version}/artifacts/{artifact}/contents`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn version_artifact_contents(
    State(state): State<RegistryState>,
    Path((project, api, version, artifact)): Path<(String, String, String, String)>,
) -> ApiResult<Response> {
    contents_impl(
        state,
        format!("{}/artifacts/{artifact}", version_parent(&project, &api, &version)),
    )
    .await
}

// --- Spec-level artifacts ----------------------------------------------

/// `POST .../specs/{spec}/artifacts`
#[instrument(skip_all, fields(spec = %spec))]
pub async fn create_spec_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, spec)): Path<(String, String, String, String)>,
    Query(query): Query<CreateArtifactQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    create_impl(state, spec_parent(&project, &api, &version, &spec), query, body).await
}

/// `GET .../specs/{spec}/artifacts`
#[instrument(skip_all, fields(spec = %spec))]
pub async fn list_spec_artifacts(
    State(state): State<RegistryState>,
    Path((project, api, version, spec)): Path<(String, String, String, String)>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Artifact>>> {
    list_impl(state, spec_parent(&project, &api, &version, &spec), query).await
}

/// `GET .../specs/{spec}/artifacts/{artifact}`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn get_spec_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, spec, artifact)): Path<(String, String, String, String, String)>,
) -> ApiResult<Json<Artifact>> {
    get_impl(
        state,
        format!("{}/artifacts/{artifact}", spec_parent(&project, &api, &version, &spec)),
    )
    .await
}

/// `PATCH .../specs/{spec}/artifacts/{artifact}`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn update_spec_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, spec, artifact)): Path<(String, String, String, String, String)>,
    Query(query): Query<UpdateQuery>,
    Json(body): Json<Artifact>,
) -> ApiResult<Json<Artifact>> {
    update_impl(
        state,
        format!("{}/artifacts/{artifact}", spec_parent(&project, &api, &version, &spec)),
        query,
        body,
    )
    .await
}

/// `DELETE .../specs/{spec}/artifacts/{artifact}`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn delete_spec_artifact(
    State(state): State<RegistryState>,
    Path((project, api, version, spec, artifact)): Path<(String, String, String, String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    delete_impl(
        state,
        format!("{}/artifacts/{artifact}", spec_parent(&project, &api, &version, &spec)),
    )
    .await
}

/// `GET .../specs/{spec}/artifacts/{artifact}/contents`
#[instrument(skip_all, fields(artifact = %artifact))]
pub async fn spec_artifact_contents(
    State(state): State<RegistryState>,
    Path((project, api, version, spec, artifact)): Path<(String, String, String, String, String)>,
) -> ApiResult<Response> {
    contents_impl(
        state,
        format!("{}/artifacts/{artifact}", spec_parent(&project, &api, &version, &spec)),
    )
    .await
}
