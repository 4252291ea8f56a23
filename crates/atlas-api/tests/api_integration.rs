//! Integration tests driving the registry API over the router.

use std::sync::Arc;

use atlas_api::{RegistryState, registry_router};
use atlas_core::storage::MemoryStore;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_router() -> Router {
    let store = Arc::new(MemoryStore::new());
    let state = RegistryState::new(store);
    registry_router(state)
}

async fn api_request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value), String> {
    let mut builder = Request::builder().method(method).uri(uri);

    let req = if let Some(payload) = body {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        let bytes =
            serde_json::to_vec(&payload).map_err(|err| format!("serialize request body: {err}"))?;
        builder
            .body(Body::from(bytes))
            .map_err(|err| format!("build request: {err}"))?
    } else {
        builder
            .body(Body::empty())
            .map_err(|err| format!("build request: {err}"))?
    };

    let response = router
        .clone()
        .oneshot(req)
        .await
        .map_err(|err| format!("route request: {err}"))?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .map_err(|err| format!("read response body: {err}"))?;

    let parsed = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    Ok((status, parsed))
}

fn error_code(body: &Value) -> Option<&str> {
    body.get("error")?.get("error_code")?.as_str()
}

#[tokio::test]
async fn create_and_get_project() -> Result<(), String> {
    let router = test_router();

    let (status, created) = api_request(
        &router,
        Method::POST,
        "/v1/projects?project_id=demo",
        Some(json!({"display_name": "Demo"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created.get("name").and_then(Value::as_str), Some("projects/demo"));
    assert_eq!(
        created.get("display_name").and_then(Value::as_str),
        Some("Demo")
    );

    let (status, fetched) =
        api_request(&router, Method::GET, "/v1/projects/demo", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn get_is_case_insensitive_over_http() -> Result<(), String> {
    let router = test_router();
    api_request(&router, Method::POST, "/v1/projects?project_id=demo", Some(json!({}))).await?;
    api_request(
        &router,
        Method::POST,
        "/v1/projects/demo/locations/global/apis?api_id=my-api",
        Some(json!({})),
    )
    .await?;

    let (status, fetched) = api_request(
        &router,
        Method::GET,
        "/v1/projects/Demo/locations/global/apis/My-Api",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fetched.get("name").and_then(Value::as_str),
        Some("projects/demo/locations/global/apis/my-api")
    );
    Ok(())
}

#[tokio::test]
async fn error_payloads_carry_stable_codes() -> Result<(), String> {
    let router = test_router();
    api_request(&router, Method::POST, "/v1/projects?project_id=demo", Some(json!({}))).await?;

    let (status, body) =
        api_request(&router, Method::GET, "/v1/projects/missing", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), Some("NOT_FOUND"));

    let (status, body) = api_request(
        &router,
        Method::POST,
        "/v1/projects?project_id=demo",
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), Some("ALREADY_EXISTS"));

    let (status, body) = api_request(
        &router,
        Method::POST,
        "/v1/projects?project_id=Invalid_Id",
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some("INVALID_ARGUMENT"));

    let (status, body) = api_request(
        &router,
        Method::GET,
        "/v1/projects/demo/locations/global/apis?filter=this%20filter%20is%20not%20valid",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some("INVALID_ARGUMENT"));

    let (status, body) = api_request(
        &router,
        Method::GET,
        "/v1/projects/demo/locations/global/apis?page_token=garbled",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some("INVALID_ARGUMENT"));
    Ok(())
}

#[tokio::test]
async fn pagination_over_http() -> Result<(), String> {
    let router = test_router();
    api_request(&router, Method::POST, "/v1/projects?project_id=demo", Some(json!({}))).await?;
    for api in ["api1", "api2", "api3"] {
        api_request(
            &router,
            Method::POST,
            &format!("/v1/projects/demo/locations/global/apis?api_id={api}"),
            Some(json!({})),
        )
        .await?;
    }

    let mut names = Vec::new();
    let mut token: Option<String> = None;
    for _ in 0..3 {
        let uri = match &token {
            Some(token) => format!(
                "/v1/projects/demo/locations/global/apis?page_size=1&page_token={token}"
            ),
            None => "/v1/projects/demo/locations/global/apis?page_size=1".to_string(),
        };
        let (status, page) = api_request(&router, Method::GET, &uri, None).await?;
        assert_eq!(status, StatusCode::OK);

        let resources = page
            .get("resources")
            .and_then(Value::as_array)
            .ok_or_else(|| "resources should be an array".to_string())?;
        assert_eq!(resources.len(), 1);
        names.extend(
            resources
                .iter()
                .filter_map(|api| api.get("name").and_then(Value::as_str))
                .map(String::from),
        );
        token = page
            .get("next_page_token")
            .and_then(Value::as_str)
            .map(String::from);
        if token.is_none() {
            break;
        }
    }

    names.sort();
    assert_eq!(
        names,
        vec![
            "projects/demo/locations/global/apis/api1",
            "projects/demo/locations/global/apis/api2",
            "projects/demo/locations/global/apis/api3",
        ]
    );
    assert!(token.is_none(), "final page must have no token");
    Ok(())
}

#[tokio::test]
async fn update_mask_over_http() -> Result<(), String> {
    let router = test_router();
    api_request(&router, Method::POST, "/v1/projects?project_id=demo", Some(json!({}))).await?;
    api_request(
        &router,
        Method::POST,
        "/v1/projects/demo/locations/global/apis?api_id=my-api",
        Some(json!({"display_name": "My Api", "description": "Api for my APIs"})),
    )
    .await?;

    // Merge semantics: unnamed populated fields only.
    let (status, merged) = api_request(
        &router,
        Method::PATCH,
        "/v1/projects/demo/locations/global/apis/my-api",
        Some(json!({"display_name": "My Updated Api"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        merged.get("description").and_then(Value::as_str),
        Some("Api for my APIs")
    );

    // Wildcard mask: full replacement clears the description.
    let (status, replaced) = api_request(
        &router,
        Method::PATCH,
        "/v1/projects/demo/locations/global/apis/my-api?update_mask=*",
        Some(json!({"display_name": "My Updated Api"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced.get("description").and_then(Value::as_str), Some(""));

    // Unknown mask field.
    let (status, body) = api_request(
        &router,
        Method::PATCH,
        "/v1/projects/demo/locations/global/apis/my-api?update_mask=no_such_field",
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some("INVALID_ARGUMENT"));
    Ok(())
}

#[tokio::test]
async fn upsert_over_http() -> Result<(), String> {
    let router = test_router();

    let (status, created) = api_request(
        &router,
        Method::PATCH,
        "/v1/projects/demo?allow_missing=true",
        Some(json!({"description": "created by upsert"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created.get("name").and_then(Value::as_str), Some("projects/demo"));

    let (status, _) = api_request(
        &router,
        Method::PATCH,
        "/v1/projects/absent",
        Some(json!({"description": "no upsert"})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn spec_contents_over_http() -> Result<(), String> {
    let router = test_router();
    api_request(&router, Method::POST, "/v1/projects?project_id=demo", Some(json!({}))).await?;
    api_request(
        &router,
        Method::POST,
        "/v1/projects/demo/locations/global/apis?api_id=my-api",
        Some(json!({})),
    )
    .await?;
    api_request(
        &router,
        Method::POST,
        "/v1/projects/demo/locations/global/apis/my-api/versions?api_version_id=v1",
        Some(json!({})),
    )
    .await?;

    // "openapi: 3.0.0" base64-encoded.
    let (status, spec) = api_request(
        &router,
        Method::POST,
        "/v1/projects/demo/locations/global/apis/my-api/versions/v1/specs?api_spec_id=openapi",
        Some(json!({
            "mime_type": "application/x.openapi;version=3",
            "contents": "b3BlbmFwaTogMy4wLjA="
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spec.get("size_bytes").and_then(Value::as_u64), Some(14));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/v1/projects/demo/locations/global/apis/my-api/versions/v1/specs/openapi/contents")
        .body(Body::empty())
        .map_err(|err| format!("build request: {err}"))?;
    let response = router
        .clone()
        .oneshot(request)
        .await
        .map_err(|err| format!("route request: {err}"))?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/x.openapi;version=3")
    );
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .map_err(|err| format!("read response body: {err}"))?;
    assert_eq!(&bytes[..], b"openapi: 3.0.0");
    Ok(())
}

#[tokio::test]
async fn delete_over_http() -> Result<(), String> {
    let router = test_router();
    api_request(&router, Method::POST, "/v1/projects?project_id=demo", Some(json!({}))).await?;

    let (status, _) = api_request(&router, Method::DELETE, "/v1/projects/demo", None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = api_request(&router, Method::GET, "/v1/projects/demo", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<(), String> {
    let router = test_router();
    let (status, doc) = api_request(&router, Method::GET, "/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc.get("paths").is_some());
    Ok(())
}
