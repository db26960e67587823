// Precomputed artifacts: a JSON movie list and a JSON similarity matrix whose
// rows follow the movie list order.

use std::path::Path;

use serde::de::DeserializeOwned;

use super::read_bytes;
use crate::{engine::SimilarityMatrix, error::LoadError, models::Movie};

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `[{"movie_id": .., "title": .., "genres": [..]}, ..]`
pub fn load_catalog(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let movies: Vec<Movie> = load_json(path)?;
    tracing::info!(path = %path.display(), movies = movies.len(), "Loaded movie catalog");
    Ok(movies)
}

/// Loads a square `[[f64]]` matrix
pub fn load_similarity(path: &Path) -> Result<SimilarityMatrix, LoadError> {
    let rows: Vec<Vec<f64>> = load_json(path)?;
    let matrix = SimilarityMatrix::from_rows(rows)?;
    tracing::info!(path = %path.display(), size = matrix.len(), "Loaded similarity matrix");
    Ok(matrix)
}
