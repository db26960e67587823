use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

/// Presentation metadata for a movie, fetched from the external movie database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub movie_id: MovieId,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    /// Average vote on a 0-10 scale
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub directors: Vec<String>,
    pub cast: Vec<CastMember>,
    pub fetched_at: DateTime<Utc>,
}

impl MovieMetadata {
    /// Four-digit release year, when the release date is known
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .filter(|date| date.len() >= 4)
            .map(|date| &date[..4])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    /// Billing order, 0 = top billed
    pub order: u32,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw `/movie/{id}` response with `credits` and `videos` appended
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
    #[serde(default)]
    pub videos: Option<TmdbVideos>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastEntry>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastEntry {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewEntry {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}
