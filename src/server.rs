//! Router assembly and shared application state.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::context::ServiceContext;

/// Request bodies carry base64-encoded sketches; axum's 2 MB default is too
/// tight for them.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Backend ports, built once at startup.
    pub context: ServiceContext,
}

/// Build the application router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/api/generate",
            post(api::generate::generate).fallback(api::method_not_allowed),
        )
        .route("/api/vary", post(api::generate::vary).fallback(api::method_not_allowed))
        .route("/api/edit", post(api::edit::edit).fallback(api::method_not_allowed))
        .route(
            "/api/describe",
            post(api::describe::describe).fallback(api::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
