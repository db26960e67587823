use super::{Catalog, SimilarityMatrix};
use crate::{
    error::{AppError, AppResult},
    models::{Movie, Recommendation},
};

/// Upper bound on the number of recommendations per request
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Number of recommendations when the caller does not ask for a count
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Ranks every other catalog movie by similarity to `query`.
///
/// Scores are sorted descending with catalog position as the tie-breaker, so
/// the output is fully determined by the store contents. The query movie is
/// never part of the output. `n` is clamped to [`MAX_RECOMMENDATIONS`].
///
/// With `genre_filter` only candidates sharing a genre with the query are
/// kept. When none do, the result is empty; there is no unfiltered fallback.
pub fn recommend(
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    query: &Movie,
    n: usize,
    genre_filter: bool,
) -> AppResult<Vec<Recommendation>> {
    let query_pos = catalog.position(query.movie_id).ok_or_else(|| {
        AppError::NotFound(format!("Movie {} is not in the catalog", query.movie_id))
    })?;
    // Genres come from the catalog entry, not the caller's copy
    let query = &catalog.movies()[query_pos];
    let n = n.min(MAX_RECOMMENDATIONS);

    let mut ranked: Vec<(usize, f64)> = matrix
        .row(query_pos)
        .iter()
        .copied()
        .enumerate()
        .filter(|&(pos, _)| pos != query_pos)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let recommendations = ranked
        .into_iter()
        .filter_map(|(pos, score)| catalog.get(pos).map(|movie| (movie, score)))
        .filter(|(movie, _)| !genre_filter || movie.shares_genre_with(query))
        .take(n)
        .map(|(movie, score)| Recommendation {
            movie: movie.clone(),
            score,
        })
        .collect();

    Ok(recommendations)
}
