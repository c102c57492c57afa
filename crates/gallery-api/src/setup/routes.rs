//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, OPENAPI_JSON_PATH};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use gallery_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Uploads may carry several files, each up to the largest per-file limit
    let body_limit = config
        .max_video_size_bytes()
        .max(config.max_file_size_bytes())
        .saturating_mul(4);

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest(API_PREFIX, api_routes())
        .route(OPENAPI_JSON_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"))
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    tracing::info!(
        prefix = API_PREFIX,
        max_concurrent_requests = config.max_concurrent_requests(),
        "Routes configured"
    );

    Ok(app)
}

/// Gallery routes; public and role-protected handlers are told apart by their extractors.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/gallery", get(handlers::gallery::front_page))
        .route("/items/{id}", get(handlers::items::get_item))
        .route("/items/{id}/file", get(handlers::items::download_file))
        .route(
            "/items/{id}/effects/{effect}",
            get(handlers::items::render_effect),
        )
        .route("/items/{id}/comments", post(handlers::comments::add_comment))
        .route("/comments/{id}", delete(handlers::comments::delete_comment))
        .route("/folders", post(handlers::folders::create_folder))
        .route(
            "/photos/{id}",
            put(handlers::photos::update_photo).delete(handlers::photos::delete_photo),
        )
        .route("/uploads", post(handlers::uploads::upload))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
