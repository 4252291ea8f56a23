//! Project endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use atlas_registry::{CreateRequest, ListResponse, Project, UpdateRequest};

use crate::error::ApiResult;
use crate::routes::{ListQuery, UpdateQuery};
use crate::state::RegistryState;

/// Project route group.
pub fn routes() -> Router<RegistryState> {
    Router::new()
        .route(
            "/projects",
            axum::routing::post(create_project).get(list_projects),
        )
        .route(
            "/projects/:project",
            get(get_project).patch(update_project).delete(delete_project),
        )
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct CreateProjectQuery {
    /// Caller-chosen identifier for the new project.
    #[serde(default)]
    pub(crate) project_id: Option<String>,
}

/// `POST /v1/projects`
#[utoipa::path(
    post,
    path = "/v1/projects",
    tag = "Projects",
    params(CreateProjectQuery),
    responses(
        (status = 200, description = "Project created"),
        (status = 400, description = "Invalid identifier or body", body = crate::error::ErrorResponse),
        (status = 409, description = "Project already exists", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project_id = ?query.project_id))]
pub async fn create_project(
    State(state): State<RegistryState>,
    Query(query): Query<CreateProjectQuery>,
    Json(body): Json<Project>,
) -> ApiResult<Json<Project>> {
    let created = state
        .writer
        .create(CreateRequest {
            parent: String::new(),
            id: query.project_id.unwrap_or_default(),
            resource: Some(body),
        })
        .await?;
    Ok(Json(created))
}

/// `GET /v1/projects`
#[utoipa::path(
    get,
    path = "/v1/projects",
    tag = "Projects",
    params(ListQuery),
    responses(
        (status = 200, description = "Projects listed"),
        (status = 400, description = "Invalid filter, page size, or token", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn list_projects(
    State(state): State<RegistryState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Project>>> {
    let page = state
        .reader
        .list(&query.into_request(String::new()))
        .await?;
    Ok(Json(page))
}

/// `GET /v1/projects/{project}`
#[utoipa::path(
    get,
    path = "/v1/projects/{project}",
    tag = "Projects",
    params(("project" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project found"),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project))]
pub async fn get_project(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
) -> ApiResult<Json<Project>> {
    let found = state.reader.get(&format!("projects/{project}")).await?;
    Ok(Json(found))
}

/// `PATCH /v1/projects/{project}`
#[utoipa::path(
    patch,
    path = "/v1/projects/{project}",
    tag = "Projects",
    params(("project" = String, Path, description = "Project identifier"), UpdateQuery),
    responses(
        (status = 200, description = "Project updated"),
        (status = 400, description = "Invalid mask or body", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project))]
pub async fn update_project(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
    Query(query): Query<UpdateQuery>,
    Json(mut body): Json<Project>,
) -> ApiResult<Json<Project>> {
    body.name = format!("projects/{project}");
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

/// `DELETE /v1/projects/{project}`
#[utoipa::path(
    delete,
    path = "/v1/projects/{project}",
    tag = "Projects",
    params(("project" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip_all, fields(project = %project))]
pub async fn delete_project(
    State(state): State<RegistryState>,
    Path(project): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .writer
        .delete::<Project>(&format!("projects/{project}"))
        .await?;
    Ok(Json(serde_json::json!({})))
}
