use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::{BlendWeights, MatchStrategy, DEFAULT_GENRE_WEIGHT, DEFAULT_USER_WEIGHT};

/// Where the similarity store comes from at startup
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// JSON catalog plus a precomputed similarity matrix, loaded verbatim
    #[default]
    Precomputed,
    /// MovieLens `movies.dat` / `ratings.dat`, blended similarity computed in-process
    MovieLens,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub data_source: DataSource,

    /// Movie catalog (JSON artifact or `movies.dat`, depending on `data_source`)
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,

    /// Precomputed similarity matrix (precomputed source only)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// Ratings table (movielens source only)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: PathBuf,

    /// Weight of the collaborative (rating) similarity in the blend
    #[serde(default = "default_user_weight")]
    pub user_weight: f64,

    /// Weight of the genre similarity in the blend
    #[serde(default = "default_genre_weight")]
    pub genre_weight: f64,

    /// Fallback used when a title has no exact match
    #[serde(default)]
    pub title_match: MatchStrategy,

    /// Whether recommendations are restricted to shared genres unless the
    /// request says otherwise. Unset means on for `movielens` and off for
    /// `precomputed`, whose catalog may carry no genres.
    #[serde(default)]
    pub genre_filter: Option<bool>,

    /// TMDB API key. Metadata enrichment is disabled when unset.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB poster image base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Seconds a fetched metadata record stays cached
    #[serde(default = "default_metadata_cache_ttl")]
    pub metadata_cache_ttl: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("model_files/movie_list.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("model_files/similarity.json")
}

fn default_ratings_path() -> PathBuf {
    PathBuf::from("Dataset/ml-1m/ratings.dat")
}

fn default_user_weight() -> f64 {
    DEFAULT_USER_WEIGHT
}

fn default_genre_weight() -> f64 {
    DEFAULT_GENRE_WEIGHT
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_metadata_cache_ttl() -> u64 {
    3600 // 1 hour
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let weights = [self.user_weight, self.genre_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            anyhow::bail!(
                "USER_WEIGHT and GENRE_WEIGHT must be finite and non-negative (got {} and {})",
                self.user_weight,
                self.genre_weight
            );
        }
        Ok(())
    }

    /// Genre filter applied when a request does not specify one
    pub fn genre_filter_default(&self) -> bool {
        self.genre_filter.unwrap_or(self.data_source == DataSource::MovieLens)
    }

    pub fn blend_weights(&self) -> BlendWeights {
        BlendWeights {
            user: self.user_weight,
            genre: self.genre_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_iter(Vec::new()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_source, DataSource::Precomputed);
        assert_eq!(config.title_match, MatchStrategy::First);
        assert_eq!(config.genre_filter, None);
        assert!(!config.genre_filter_default());
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.blend_weights(), BlendWeights::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_iter(vars(&[
            ("PORT", "8080"),
            ("DATA_SOURCE", "movielens"),
            ("TITLE_MATCH", "shortest"),
            ("GENRE_FILTER", "false"),
            ("USER_WEIGHT", "0.5"),
            ("TMDB_API_KEY", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_source, DataSource::MovieLens);
        assert_eq!(config.title_match, MatchStrategy::Shortest);
        assert!(!config.genre_filter_default());
        assert_eq!(config.user_weight, 0.5);
        assert_eq!(config.genre_weight, DEFAULT_GENRE_WEIGHT);
        assert_eq!(config.tmdb_api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = Config::from_iter(vars(&[("GENRE_WEIGHT", "-1")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_genre_filter_default_follows_data_source() {
        let movielens = Config::from_iter(vars(&[("DATA_SOURCE", "movielens")])).unwrap();
        assert!(movielens.genre_filter_default());

        let forced = Config::from_iter(vars(&[("GENRE_FILTER", "true")])).unwrap();
        assert_eq!(forced.data_source, DataSource::Precomputed);
        assert!(forced.genre_filter_default());
    }
}
