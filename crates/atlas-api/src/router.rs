//! Registry API router setup.

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::openapi;
use crate::routes;
use crate::state::RegistryState;

/// Creates the registry API router.
///
/// All resource routes are mounted under `/v1`; the OpenAPI document is
/// served at `/openapi.json`.
pub fn registry_router(state: RegistryState) -> Router {
    let router = Router::new()
        .route(
            "/openapi.json",
            axum::routing::get(openapi::get_openapi_json),
        )
        .nest(
            "/v1",
            routes::projects::routes()
                .merge(routes::apis::routes())
                .merge(routes::versions::routes())
                .merge(routes::specs::routes())
                .merge(routes::artifacts::routes()),
        )
        .layer(TraceLayer::new_for_http());

    let router = match state.config.concurrency_limit {
        Some(limit) => router.layer(ConcurrencyLimitLayer::new(limit)),
        None => router,
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn router_creation_does_not_panic() {
        let store = Arc::new(MemoryStore::new());
        let state = RegistryState::new(store);
        let _router = registry_router(state);
    }
}
