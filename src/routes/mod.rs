use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    engine::Engine,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::MetadataGateway,
};

pub mod movies;
pub mod recommendations;

/// Shared, read-only application state
pub struct AppState {
    pub engine: Arc<Engine>,
    pub metadata: Arc<dyn MetadataGateway>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>, metadata: Arc<dyn MetadataGateway>) -> Self {
        Self { engine, metadata }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/resolve", get(movies::resolve))
        .route("/movies/random", get(movies::random))
        .route("/movies/:movie_id", get(movies::details))
        .route(
            "/movies/:movie_id/recommendations",
            get(recommendations::recommend_by_id),
        )
        .route("/recommendations", get(recommendations::recommend_by_title))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "movies": state.engine.catalog().len(),
        })),
    )
}
