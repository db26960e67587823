//! TMDB (The Movie Database) metadata gateway
//!
//! One request per movie: `/movie/{id}?append_to_response=credits,videos`
//! carries details, crew/cast and trailers together. Transient failures
//! (HTTP 500/502/504, connect errors, timeouts) are retried with exponential
//! backoff; anything else surfaces as `MetadataUnavailable`.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client as HttpClient, StatusCode};

use super::MetadataGateway;
use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{CastMember, MovieId, MovieMetadata, TmdbMovieDetails, TmdbVideos},
};

const MAX_RETRIES: u32 = 5;
const BASE_BACKOFF: Duration = Duration::from_secs(1);
const RETRY_STATUSES: [StatusCode; 3] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::GATEWAY_TIMEOUT,
];
const MAX_CAST: usize = 10;
const YOUTUBE_SHORT_URL: &str = "https://youtu.be";

#[derive(Clone)]
pub struct TmdbGateway {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    cache: Cache<MovieMetadata>,
    backoff_base: Duration,
}

/// Delay before retry number `attempt` (1-based): base, 2x base, 4x base, ...
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
}

/// First YouTube trailer, as a short link
pub fn trailer_url(videos: &TmdbVideos) -> Option<String> {
    videos
        .results
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
        .map(|v| format!("{}/{}", YOUTUBE_SHORT_URL, v.key))
}

impl TmdbGateway {
    pub fn new(
        cache: Cache<MovieMetadata>,
        api_key: String,
        api_url: String,
        image_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_url,
            cache,
            backoff_base: BASE_BACKOFF,
        }
    }

    /// Overrides the first retry delay (1s by default)
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }

    /// Converts a raw TMDB response into our metadata record
    fn to_metadata(&self, movie_id: MovieId, details: TmdbMovieDetails) -> MovieMetadata {
        let credits = details.credits.unwrap_or_default();

        let directors = credits
            .crew
            .iter()
            .filter(|member| member.job == "Director")
            .map(|member| member.name.clone())
            .collect();

        let mut cast: Vec<CastMember> = credits
            .cast
            .into_iter()
            .map(|entry| CastMember {
                name: entry.name,
                character: entry.character.filter(|c| !c.is_empty()),
                order: entry.order,
            })
            .collect();
        cast.sort_by_key(|member| member.order);
        cast.truncate(MAX_CAST);

        MovieMetadata {
            movie_id,
            poster_url: details
                .poster_path
                .as_deref()
                .filter(|path| !path.is_empty())
                .map(|path| self.poster_url(path)),
            trailer_url: details.videos.as_ref().and_then(trailer_url),
            // TMDB reports 0.0 for movies nobody has voted on
            rating: details.vote_average.filter(|r| *r > 0.0),
            release_date: details.release_date.filter(|d| !d.is_empty()),
            runtime: details.runtime.filter(|r| *r > 0),
            tagline: details.tagline.filter(|t| !t.is_empty()),
            overview: details.overview.filter(|o| !o.is_empty()),
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            directors,
            cast,
            fetched_at: Utc::now(),
        }
    }

    /// GET with retries on transient failures
    async fn get_with_retry(&self, url: &str) -> AppResult<reqwest::Response> {
        let mut attempt = 0u32;

        loop {
            let result = self
                .http_client
                .get(url)
                .query(&[
                    ("api_key", self.api_key.as_str()),
                    ("append_to_response", "credits,videos"),
                ])
                .send()
                .await;

            let retryable = match &result {
                Ok(response) => RETRY_STATUSES.contains(&response.status()),
                Err(e) => e.is_connect() || e.is_timeout(),
            };

            if !retryable || attempt >= MAX_RETRIES {
                return Ok(result?);
            }

            attempt += 1;
            let delay = backoff_delay(self.backoff_base, attempt);
            tracing::warn!(
                url = %url,
                attempt = attempt,
                max_retries = MAX_RETRIES,
                delay_ms = delay.as_millis() as u64,
                "Transient TMDB failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn fetch_uncached(&self, movie_id: MovieId) -> AppResult<MovieMetadata> {
        let url = format!("{}/movie/{}", self.api_url.trim_end_matches('/'), movie_id);
        let response = self.get_with_retry(&url).await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::MetadataUnavailable(format!(
                "TMDB returned status {} for movie {}",
                status, movie_id
            )));
        }

        let details: TmdbMovieDetails = response.json().await.map_err(|e| {
            AppError::MetadataUnavailable(format!(
                "Invalid TMDB response for movie {}: {}",
                movie_id, e
            ))
        })?;

        tracing::debug!(movie_id = movie_id, "Fetched TMDB metadata");

        Ok(self.to_metadata(movie_id, details))
    }
}

#[async_trait::async_trait]
impl MetadataGateway for TmdbGateway {
    async fn fetch_metadata(&self, movie_id: MovieId) -> AppResult<MovieMetadata> {
        cached!(
            self.cache,
            CacheKey::Metadata(movie_id),
            async move { self.fetch_uncached(movie_id).await }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use axum::{
        extract::State,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };

    fn gateway_at(api_url: &str) -> TmdbGateway {
        let mut gateway = TmdbGateway::new(
            Cache::new(Duration::from_secs(60)),
            "test_key".to_string(),
            api_url.to_string(),
            "https://image.tmdb.org/t/p/w500/".to_string(),
        )
        .with_backoff_base(Duration::from_millis(1));
        // Local stub servers must not be routed through an ambient HTTP proxy
        gateway.http_client = HttpClient::builder().no_proxy().build().unwrap();
        gateway
    }

    fn gateway() -> TmdbGateway {
        gateway_at("https://api.themoviedb.org/3")
    }

    /// Local stand-in for TMDB answering with a scripted status sequence.
    /// The last status repeats once the script runs out.
    struct StubTmdb {
        statuses: Mutex<Vec<StatusCode>>,
        hits: AtomicUsize,
    }

    impl StubTmdb {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    async fn movie_details(State(stub): State<Arc<StubTmdb>>) -> Response {
        stub.hits.fetch_add(1, Ordering::SeqCst);
        let status = {
            let mut statuses = stub.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.remove(0)
            } else {
                statuses[0]
            }
        };
        if status == StatusCode::OK {
            Json(details_json()).into_response()
        } else {
            status.into_response()
        }
    }

    async fn spawn_stub(statuses: Vec<StatusCode>) -> (String, Arc<StubTmdb>) {
        let stub = Arc::new(StubTmdb {
            statuses: Mutex::new(statuses),
            hits: AtomicUsize::new(0),
        });
        let app = Router::new()
            .route("/movie/:movie_id", get(movie_details))
            .with_state(Arc::clone(&stub));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{}", addr), stub)
    }

    fn details_json() -> serde_json::Value {
        serde_json::json!({
            "id": 862,
            "poster_path": "/uXDfjJbdP4ijW5hWSBrPrlKpxab.jpg",
            "vote_average": 7.97,
            "release_date": "1995-10-30",
            "runtime": 81,
            "tagline": "",
            "overview": "Led by Woody, Andy's toys live happily in his room.",
            "genres": [{"id": 16, "name": "Animation"}, {"id": 35, "name": "Comedy"}],
            "credits": {
                "cast": [
                    {"name": "Tim Allen", "character": "Buzz Lightyear (voice)", "order": 1},
                    {"name": "Tom Hanks", "character": "Woody (voice)", "order": 0}
                ],
                "crew": [
                    {"name": "John Lasseter", "job": "Director"},
                    {"name": "Ralph Eggleston", "job": "Art Direction"}
                ]
            },
            "videos": {
                "results": [
                    {"key": "abc", "site": "YouTube", "type": "Teaser"},
                    {"key": "v-PjgYDrg70", "site": "YouTube", "type": "Trailer"},
                    {"key": "zzz", "site": "Vimeo", "type": "Trailer"}
                ]
            }
        })
    }

    #[test]
    fn test_to_metadata() {
        let details: TmdbMovieDetails = serde_json::from_value(details_json()).unwrap();

        let metadata = gateway().to_metadata(862, details);

        assert_eq!(
            metadata.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/uXDfjJbdP4ijW5hWSBrPrlKpxab.jpg")
        );
        assert_eq!(
            metadata.trailer_url.as_deref(),
            Some("https://youtu.be/v-PjgYDrg70")
        );
        assert_eq!(metadata.rating, Some(7.97));
        assert_eq!(metadata.release_year(), Some("1995"));
        assert_eq!(metadata.runtime, Some(81));
        assert_eq!(metadata.tagline, None);
        assert_eq!(metadata.directors, vec!["John Lasseter".to_string()]);
        assert_eq!(metadata.cast[0].name, "Tom Hanks");
        assert_eq!(metadata.genres, vec!["Animation", "Comedy"]);
    }

    #[test]
    fn test_to_metadata_sparse_response() {
        let details: TmdbMovieDetails =
            serde_json::from_value(serde_json::json!({"id": 1, "vote_average": 0.0})).unwrap();

        let metadata = gateway().to_metadata(1, details);

        assert!(metadata.poster_url.is_none());
        assert!(metadata.trailer_url.is_none());
        assert!(metadata.rating.is_none());
        assert!(metadata.cast.is_empty());
        assert!(metadata.directors.is_empty());
    }

    #[test]
    fn test_cast_truncated() {
        let cast: Vec<serde_json::Value> = (0..15)
            .map(|i| serde_json::json!({"name": format!("Actor {}", i), "order": i}))
            .collect();
        let details: TmdbMovieDetails =
            serde_json::from_value(serde_json::json!({"id": 1, "credits": {"cast": cast}}))
                .unwrap();

        let metadata = gateway().to_metadata(1, details);

        assert_eq!(metadata.cast.len(), MAX_CAST);
        assert_eq!(metadata.cast[9].name, "Actor 9");
    }

    #[test]
    fn test_backoff_delay_doubles() {
        assert_eq!(backoff_delay(BASE_BACKOFF, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(BASE_BACKOFF, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(BASE_BACKOFF, 5), Duration::from_secs(16));
    }

    #[tokio::test]
    async fn test_cached_metadata_skips_network() {
        let gateway = gateway();
        let details: TmdbMovieDetails = serde_json::from_value(details_json()).unwrap();
        let metadata = gateway.to_metadata(862, details);
        gateway.cache.set(CacheKey::Metadata(862), metadata.clone()).await;

        let fetched = gateway.fetch_metadata(862).await.unwrap();

        assert_eq!(fetched, metadata);
    }

    #[tokio::test]
    async fn test_transient_status_is_retried() {
        let (url, stub) = spawn_stub(vec![StatusCode::BAD_GATEWAY, StatusCode::OK]).await;
        let gateway = gateway_at(&url);

        let metadata = gateway.fetch_metadata(862).await.unwrap();

        assert_eq!(metadata.runtime, Some(81));
        assert_eq!(stub.hits(), 2);

        // Served from the cache afterwards
        gateway.fetch_metadata(862).await.unwrap();
        assert_eq!(stub.hits(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let (url, stub) = spawn_stub(vec![StatusCode::NOT_FOUND]).await;

        let result = gateway_at(&url).fetch_metadata(862).await;

        assert!(matches!(result, Err(AppError::MetadataUnavailable(_))));
        assert_eq!(stub.hits(), 1);
    }

    #[tokio::test]
    async fn test_retries_stop_after_max_attempts() {
        let (url, stub) = spawn_stub(vec![StatusCode::INTERNAL_SERVER_ERROR]).await;

        let result = gateway_at(&url).fetch_metadata(862).await;

        assert!(matches!(result, Err(AppError::MetadataUnavailable(_))));
        assert_eq!(stub.hits(), MAX_RETRIES as usize + 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_retried_then_surfaced() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = gateway_at(&format!("http://{}", addr)).fetch_metadata(862).await;

        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}
