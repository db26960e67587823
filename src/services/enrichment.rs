use std::sync::Arc;

use crate::{
    models::{MovieId, MovieMetadata, Recommendation, RecommendationResult},
    services::metadata::MetadataGateway,
};

/// Fetches metadata for one movie, logging and swallowing any failure
pub async fn fetch_optional(
    gateway: &dyn MetadataGateway,
    movie_id: MovieId,
) -> Option<MovieMetadata> {
    match gateway.fetch_metadata(movie_id).await {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::warn!(movie_id = movie_id, error = %e, "Metadata unavailable");
            None
        }
    }
}

/// Ranks recommendations without metadata
pub fn rank(recommendations: Vec<Recommendation>) -> Vec<RecommendationResult> {
    recommendations
        .into_iter()
        .enumerate()
        .map(|(idx, recommendation)| RecommendationResult::new(idx + 1, recommendation))
        .collect()
}

/// Ranks recommendations and attaches metadata to each, fetched in parallel.
///
/// Order and membership always match the input: an item whose fetch fails
/// keeps `metadata: None` and the others are unaffected.
pub async fn enrich(
    gateway: Arc<dyn MetadataGateway>,
    recommendations: Vec<Recommendation>,
) -> Vec<RecommendationResult> {
    let mut tasks = Vec::with_capacity(recommendations.len());

    for recommendation in &recommendations {
        let gateway = Arc::clone(&gateway);
        let movie_id = recommendation.movie.movie_id;
        let task =
            tokio::spawn(async move { fetch_optional(gateway.as_ref(), movie_id).await });
        tasks.push(task);
    }

    let mut results = rank(recommendations);
    let mut failures = 0usize;

    for (result, task) in results.iter_mut().zip(tasks) {
        result.metadata = match task.await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::error!(error = %e, "Metadata task join error");
                None
            }
        };
        if result.metadata.is_none() {
            failures += 1;
        }
    }

    if failures > 0 {
        tracing::warn!(
            success_count = results.len() - failures,
            error_count = failures,
            "Partial metadata enrichment"
        );
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Movie;
    use crate::services::metadata::MockMetadataGateway;
    use chrono::Utc;

    fn metadata(movie_id: MovieId) -> MovieMetadata {
        MovieMetadata {
            movie_id,
            poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", movie_id)),
            trailer_url: None,
            rating: Some(7.5),
            release_date: None,
            runtime: None,
            tagline: None,
            overview: None,
            genres: vec![],
            directors: vec![],
            cast: vec![],
            fetched_at: Utc::now(),
        }
    }

    fn recommendations() -> Vec<Recommendation> {
        [(3, "Toy Story 2", 0.9), (4, "A Bug's Life", 0.7), (5, "Antz", 0.6)]
            .into_iter()
            .map(|(id, title, score)| Recommendation {
                movie: Movie::new(id, title, ["Animation"]),
                score,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let mut gateway = MockMetadataGateway::new();
        gateway.expect_fetch_metadata().returning(|movie_id| {
            if movie_id == 4 {
                Err(AppError::MetadataUnavailable("timeout".to_string()))
            } else {
                Ok(metadata(movie_id))
            }
        });

        let results = enrich(Arc::new(gateway), recommendations()).await;

        assert_eq!(results.len(), 3);
        assert_eq!(
            results.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(results[0].metadata.as_ref().unwrap().movie_id, 3);
        assert!(results[1].metadata.is_none());
        assert_eq!(results[1].movie.title, "A Bug's Life");
        assert_eq!(results[2].metadata.as_ref().unwrap().movie_id, 5);
    }

    #[tokio::test]
    async fn test_all_failures_keep_ranking() {
        let mut gateway = MockMetadataGateway::new();
        gateway
            .expect_fetch_metadata()
            .times(3)
            .returning(|_| Err(AppError::MetadataUnavailable("down".to_string())));

        let results = enrich(Arc::new(gateway), recommendations()).await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.metadata.is_none()));
        assert_eq!(results[0].score, 0.9);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let gateway = MockMetadataGateway::new();
        let results = enrich(Arc::new(gateway), Vec::new()).await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_rank_is_one_based() {
        let results = rank(recommendations());
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[2].movie.movie_id, 5);
    }
}
