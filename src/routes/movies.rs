use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Movie, MovieId, MovieMetadata},
    routes::AppState,
    services::enrichment,
};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    q: String,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    pub movie: Movie,
    /// `null` when the metadata provider could not supply it
    pub metadata: Option<MovieMetadata>,
}

/// Resolves free text to a catalog movie
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ResolveQuery>,
) -> AppResult<Json<Movie>> {
    let movie = state.engine.resolve(&params.q)?;

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        movie_id = movie.movie_id,
        "Resolved title"
    );

    Ok(Json(movie.clone()))
}

/// Picks a random movie ("surprise me")
pub async fn random(State(state): State<Arc<AppState>>) -> AppResult<Json<Movie>> {
    state
        .engine
        .random_movie()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("The movie catalog is empty".to_string()))
}

/// A catalog movie with its presentation metadata
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<MovieDetailsResponse>> {
    let movie = state.engine.movie(movie_id)?.clone();
    let metadata = enrichment::fetch_optional(state.metadata.as_ref(), movie_id).await;

    Ok(Json(MovieDetailsResponse { movie, metadata }))
}
