use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::MovieMetadata;

/// Catalog identifier for a movie (TMDB id or MovieLens id, depending on the source)
pub type MovieId = u32;

/// A movie in the catalog. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genres: BTreeSet<String>,
}

impl Movie {
    /// Creates a movie from anything that yields genre tags
    pub fn new<I, S>(movie_id: MovieId, title: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            movie_id,
            title: title.into(),
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the two movies have at least one genre tag in common
    pub fn shares_genre_with(&self, other: &Movie) -> bool {
        !self.genres.is_disjoint(&other.genres)
    }
}

/// A single user rating from the ratings table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub user_id: u32,
    pub movie_id: MovieId,
    pub rating: f64,
}

/// A ranked candidate produced by the recommender
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    /// Raw similarity score against the query movie
    pub score: f64,
}

/// A recommendation as returned to clients, optionally enriched with metadata
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    /// 1-based position in the ranking
    pub rank: usize,
    pub movie: Movie,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MovieMetadata>,
}

impl RecommendationResult {
    pub fn new(rank: usize, recommendation: Recommendation) -> Self {
        Self {
            rank,
            movie: recommendation.movie,
            score: recommendation.score,
            metadata: None,
        }
    }
}
