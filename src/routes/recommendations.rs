use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    engine::DEFAULT_RECOMMENDATIONS,
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Movie, MovieId, RecommendationResult},
    routes::AppState,
    services::enrichment,
};

/// Options shared by both recommendation endpoints
#[derive(Debug, Default, Deserialize)]
pub struct RecommendOptions {
    /// Requested count; defaults to 5 and is capped at 10
    pub n: Option<usize>,
    /// Overrides the configured genre filter
    pub genre_filter: Option<bool>,
    /// Attach movie metadata to each result
    #[serde(default)]
    pub metadata: bool,
}

/// Query string of the by-title endpoint.
///
/// Not `#[serde(flatten)]`: urlencoded flattened fields arrive as strings only.
#[derive(Debug, Deserialize)]
pub struct RecommendByTitleQuery {
    pub title: String,
    pub n: Option<usize>,
    pub genre_filter: Option<bool>,
    #[serde(default)]
    pub metadata: bool,
}

impl RecommendByTitleQuery {
    fn into_parts(self) -> (String, RecommendOptions) {
        let options = RecommendOptions {
            n: self.n,
            genre_filter: self.genre_filter,
            metadata: self.metadata,
        };
        (self.title, options)
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub query: Movie,
    pub recommendations: Vec<RecommendationResult>,
}

async fn build_response(
    state: &AppState,
    request_id: &RequestId,
    query: Movie,
    options: RecommendOptions,
) -> AppResult<RecommendationsResponse> {
    let n = options.n.unwrap_or(DEFAULT_RECOMMENDATIONS);
    let ranked = state.engine.recommend(&query, n, options.genre_filter)?;

    tracing::info!(
        request_id = %request_id,
        movie_id = query.movie_id,
        requested = n,
        returned = ranked.len(),
        "Computed recommendations"
    );

    let recommendations = if options.metadata {
        enrichment::enrich(Arc::clone(&state.metadata), ranked).await
    } else {
        enrichment::rank(ranked)
    };

    Ok(RecommendationsResponse {
        query,
        recommendations,
    })
}

/// Recommendations for a free-text title
pub async fn recommend_by_title(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendByTitleQuery>,
) -> AppResult<Json<RecommendationsResponse>> {
    let (title, options) = params.into_parts();
    let query = state.engine.resolve(&title)?.clone();
    let response = build_response(&state, &request_id, query, options).await?;
    Ok(Json(response))
}

/// Recommendations for a catalog movie id
pub async fn recommend_by_id(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<MovieId>,
    Query(options): Query<RecommendOptions>,
) -> AppResult<Json<RecommendationsResponse>> {
    let query = state.engine.movie(movie_id)?.clone();
    let response = build_response(&state, &request_id, query, options).await?;
    Ok(Json(response))
}
