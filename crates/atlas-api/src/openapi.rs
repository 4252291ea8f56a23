//! OpenAPI document for the registry API.
//!
//! Artifact operations are mounted at all four parent levels with identical
//! shapes; the document describes them once, at the project level.

use utoipa::OpenApi;

/// OpenAPI document aggregator.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atlas Registry API",
        description = "Metadata registry for API descriptions: projects, APIs, versions, specs, and artifacts.",
        version = "0.1.0",
    ),
    paths(
        crate::routes::projects::create_project,
        crate::routes::projects::list_projects,
        crate::routes::projects::get_project,
        crate::routes::projects::update_project,
        crate::routes::projects::delete_project,
        crate::routes::apis::create_api,
        crate::routes::apis::list_apis,
        crate::routes::apis::get_api,
        crate::routes::apis::update_api,
        crate::routes::apis::delete_api,
        crate::routes::versions::create_version,
        crate::routes::versions::list_versions,
        crate::routes::versions::get_version,
        crate::routes::versions::update_version,
        crate::routes::versions::delete_version,
        crate::routes::specs::create_spec,
        crate::routes::specs::list_specs,
        crate::routes::specs::get_spec,
        crate::routes::specs::get_spec_contents,
        crate::routes::specs::update_spec,
        crate::routes::specs::delete_spec,
        crate::routes::artifacts::create_project_artifact,
        crate::routes::artifacts::list_project_artifacts,
        crate::routes::artifacts::get_project_artifact,
        crate::routes::artifacts::update_project_artifact,
        crate::routes::artifacts::delete_project_artifact,
        crate::routes::artifacts::project_artifact_contents,
    ),
    components(schemas(crate::error::ErrorDetail, crate::error::ErrorResponse)),
    tags(
        (name = "Projects", description = "Top-level projects"),
        (name = "Apis", description = "APIs within a project"),
        (name = "Versions", description = "Versions of an API"),
        (name = "Specs", description = "Revisioned specification documents"),
        (name = "Artifacts", description = "Artifacts attached at any level"),
    )
)]
pub struct RegistryApiDoc;

/// Returns the OpenAPI document.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    RegistryApiDoc::openapi()
}

/// Serves the OpenAPI document as JSON.
pub async fn get_openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds_and_serializes() {
        let doc = openapi();
        let json = serde_json::to_string(&doc).expect("serialize openapi");
        assert!(json.contains("/v1/projects"));
        assert!(json.contains("Atlas Registry API"));
    }
}
