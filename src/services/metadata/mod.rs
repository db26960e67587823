//! External movie metadata gateway
//!
//! Posters, trailers and detail metadata come from a third-party movie
//! database. The recommendation engine never calls this; the HTTP layer uses
//! it to decorate engine output, and a failure here only ever drops the
//! decoration.

use std::{sync::Arc, time::Duration};

use crate::{
    cache::Cache,
    config::Config,
    error::{AppError, AppResult},
    models::{MovieId, MovieMetadata},
};

pub mod tmdb;

pub use tmdb::TmdbGateway;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Fetch presentation metadata for a movie
    ///
    /// Fails with [`AppError::MetadataUnavailable`] (or a transport error)
    /// when the provider cannot supply it.
    async fn fetch_metadata(&self, movie_id: MovieId) -> AppResult<MovieMetadata>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Gateway used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

#[async_trait::async_trait]
impl MetadataGateway for DisabledGateway {
    async fn fetch_metadata(&self, movie_id: MovieId) -> AppResult<MovieMetadata> {
        Err(AppError::MetadataUnavailable(format!(
            "Metadata lookups are disabled (no TMDB_API_KEY); movie {}",
            movie_id
        )))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Picks the gateway implementation for the configuration
pub fn gateway_from_config(config: &Config) -> Arc<dyn MetadataGateway> {
    match config.tmdb_api_key.as_deref().filter(|key| !key.trim().is_empty()) {
        Some(api_key) => Arc::new(TmdbGateway::new(
            Cache::new(Duration::from_secs(config.metadata_cache_ttl)),
            api_key.to_string(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
        )),
        None => {
            tracing::warn!("TMDB_API_KEY not set, metadata enrichment disabled");
            Arc::new(DisabledGateway)
        }
    }
}
