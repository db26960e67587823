use std::collections::HashMap;

use crate::{
    error::LoadError,
    models::{Movie, MovieId},
};

/// The movie catalog in load order.
///
/// Catalog position doubles as the row/column index of the similarity
/// matrix and as the tie-breaker when ranking equal scores.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    positions: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Builds the catalog, rejecting duplicate movie ids
    pub fn new(movies: Vec<Movie>) -> Result<Self, LoadError> {
        let mut positions = HashMap::with_capacity(movies.len());
        for (idx, movie) in movies.iter().enumerate() {
            if positions.insert(movie.movie_id, idx).is_some() {
                return Err(LoadError::Inconsistent(format!(
                    "duplicate movie_id {} in catalog",
                    movie.movie_id
                )));
            }
        }
        Ok(Self { movies, positions })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, idx: usize) -> Option<&Movie> {
        self.movies.get(idx)
    }

    pub fn position(&self, movie_id: MovieId) -> Option<usize> {
        self.positions.get(&movie_id).copied()
    }

    pub fn by_id(&self, movie_id: MovieId) -> Option<&Movie> {
        self.position(movie_id).map(|idx| &self.movies[idx])
    }

    /// Sorted, de-duplicated genre vocabulary across the catalog
    pub fn genre_vocabulary(&self) -> Vec<&str> {
        let mut vocabulary: Vec<&str> = self
            .movies
            .iter()
            .flat_map(|m| m.genres.iter().map(String::as_str))
            .collect();
        vocabulary.sort_unstable();
        vocabulary.dedup();
        vocabulary
    }
}
