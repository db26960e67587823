//! Similarity-based recommendation engine.
//!
//! The catalog and similarity matrix are loaded once into an [`Engine`]
//! handle which is then shared read-only; resolution and ranking never
//! mutate it.

mod blend;
mod catalog;
mod recommender;
mod resolver;
mod similarity;

use std::time::Instant;

use rand::seq::IndexedRandom;

use crate::{
    config::{Config, DataSource},
    data,
    error::{AppError, AppResult, LoadError},
    models::{Movie, MovieId, Recommendation},
};

pub use blend::{
    blended_similarity, genre_similarity, rating_similarity, BlendWeights, DEFAULT_GENRE_WEIGHT,
    DEFAULT_USER_WEIGHT,
};
pub use catalog::Catalog;
pub use recommender::{recommend, DEFAULT_RECOMMENDATIONS, MAX_RECOMMENDATIONS};
pub use resolver::{resolve, MatchStrategy};
pub use similarity::{cosine_similarity, SimilarityMatrix};

/// Catalog plus its similarity matrix, indexed by movie id
#[derive(Debug, Clone)]
pub struct SimilarityStore {
    catalog: Catalog,
    matrix: SimilarityMatrix,
}

impl SimilarityStore {
    /// Pairs a catalog with a matrix whose rows follow catalog order
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self, LoadError> {
        if catalog.len() != matrix.len() {
            return Err(LoadError::Inconsistent(format!(
                "catalog has {} movies but the similarity matrix is {}x{}",
                catalog.len(),
                matrix.len(),
                matrix.len()
            )));
        }
        Ok(Self { catalog, matrix })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Score between two movies, `None` when either is unknown
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Option<f64> {
        let i = self.catalog.position(a)?;
        let j = self.catalog.position(b)?;
        Some(self.matrix.get(i, j))
    }

    /// Scores of every other movie against `movie_id`, in catalog order
    pub fn row(&self, movie_id: MovieId) -> Option<Vec<(MovieId, f64)>> {
        let i = self.catalog.position(movie_id)?;
        let row = self
            .catalog
            .movies()
            .iter()
            .zip(self.matrix.row(i))
            .filter(|(movie, _)| movie.movie_id != movie_id)
            .map(|(movie, &score)| (movie.movie_id, score))
            .collect();
        Some(row)
    }
}

/// Request-time behaviour knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub title_match: MatchStrategy,
    /// Genre filter applied when a request does not specify one
    pub genre_filter: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            title_match: MatchStrategy::default(),
            genre_filter: true,
        }
    }
}

/// Immutable, process-wide handle over the loaded store
#[derive(Debug, Clone)]
pub struct Engine {
    store: SimilarityStore,
    options: EngineOptions,
}

impl Engine {
    pub fn new(store: SimilarityStore, options: EngineOptions) -> Self {
        Self { store, options }
    }

    /// Loads the catalog and builds or loads the similarity matrix.
    ///
    /// CPU-heavy for the MovieLens source; run it off the async runtime.
    pub fn init(config: &Config) -> Result<Self, LoadError> {
        let started = Instant::now();

        let (catalog, matrix) = match config.data_source {
            DataSource::Precomputed => {
                let catalog = Catalog::new(data::artifact::load_catalog(&config.movies_path)?)?;
                let matrix = data::artifact::load_similarity(&config.similarity_path)?;
                (catalog, matrix)
            }
            DataSource::MovieLens => {
                let catalog = Catalog::new(data::movielens::load_movies(&config.movies_path)?)?;
                let ratings = data::movielens::load_ratings(&config.ratings_path)?;
                tracing::info!(
                    movies = catalog.len(),
                    ratings = ratings.len(),
                    "Computing blended similarity"
                );
                let matrix = blended_similarity(&catalog, &ratings, config.blend_weights());
                (catalog, matrix)
            }
        };

        if catalog.is_empty() {
            return Err(LoadError::Inconsistent("movie catalog is empty".to_string()));
        }

        let store = SimilarityStore::new(catalog, matrix)?;

        tracing::info!(
            source = ?config.data_source,
            movies = store.catalog().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recommendation engine loaded"
        );

        Ok(Self::new(
            store,
            EngineOptions {
                title_match: config.title_match,
                genre_filter: config.genre_filter_default(),
            },
        ))
    }

    pub fn store(&self) -> &SimilarityStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn resolve(&self, input: &str) -> AppResult<&Movie> {
        resolve(self.catalog(), input, self.options.title_match)
    }

    pub fn movie(&self, movie_id: MovieId) -> AppResult<&Movie> {
        self.catalog()
            .by_id(movie_id)
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))
    }

    /// Top-`n` similar movies; `genre_filter` falls back to the configured default
    pub fn recommend(
        &self,
        query: &Movie,
        n: usize,
        genre_filter: Option<bool>,
    ) -> AppResult<Vec<Recommendation>> {
        recommend(
            self.catalog(),
            self.store.matrix(),
            query,
            n,
            genre_filter.unwrap_or(self.options.genre_filter),
        )
    }

    /// A uniformly random catalog movie
    pub fn random_movie(&self) -> Option<&Movie> {
        self.catalog().movies().choose(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SimilarityStore {
        let catalog = Catalog::new(vec![
            Movie::new(1, "Toy Story", ["Animation", "Comedy"]),
            Movie::new(2, "Heat", ["Action", "Crime"]),
            Movie::new(3, "Toy Story 2", ["Animation", "Comedy"]),
        ])
        .unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.95, 0.9],
            vec![0.95, 1.0, 0.1],
            vec![0.9, 0.1, 1.0],
        ])
        .unwrap();
        SimilarityStore::new(catalog, matrix).unwrap()
    }

    #[test]
    fn test_store_size_mismatch() {
        let catalog = Catalog::new(vec![Movie::new(1, "Heat", ["Action"])]).unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(matches!(
            SimilarityStore::new(catalog, matrix),
            Err(LoadError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_similarity_symmetric_by_id() {
        let store = store();
        for a in [1, 2, 3] {
            for b in [1, 2, 3] {
                assert_eq!(store.similarity(a, b), store.similarity(b, a));
            }
        }
        assert_eq!(store.similarity(1, 42), None);
    }

    #[test]
    fn test_row_excludes_self() {
        let store = store();
        assert_eq!(store.row(2).unwrap(), vec![(1, 0.95), (3, 0.1)]);
        assert!(store.row(42).is_none());
    }

    #[test]
    fn test_engine_default_genre_filter() {
        let engine = Engine::new(store(), EngineOptions::default());
        let query = engine.resolve("Toy Story").unwrap().clone();

        let filtered = engine.recommend(&query, 1, None).unwrap();
        assert_eq!(filtered[0].movie.movie_id, 3);

        let unfiltered = engine.recommend(&query, 1, Some(false)).unwrap();
        assert_eq!(unfiltered[0].movie.movie_id, 2);
    }

    #[test]
    fn test_random_movie_comes_from_catalog() {
        let engine = Engine::new(store(), EngineOptions::default());
        let movie = engine.random_movie().unwrap();
        assert!(engine.catalog().by_id(movie.movie_id).is_some());
    }

    #[test]
    fn test_movie_lookup() {
        let engine = Engine::new(store(), EngineOptions::default());
        assert_eq!(engine.movie(2).unwrap().title, "Heat");
        assert!(matches!(engine.movie(9), Err(AppError::NotFound(_))));
    }
}
