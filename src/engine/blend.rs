// Blended similarity: a collaborative signal from user ratings mixed with a
// content signal from genre tags.
//
// Ratings are pivoted into a user-by-movie matrix with missing ratings taken
// as zero, and movies are compared by cosine over their rating columns. Zero
// entries add nothing to a dot product or a norm, so the accumulation below
// walks each user's rated movies only and yields the same matrix as the dense
// pivot.

use std::collections::BTreeMap;

use super::{Catalog, SimilarityMatrix};
use crate::models::Rating;

/// Default weight of the rating (collaborative) similarity
pub const DEFAULT_USER_WEIGHT: f64 = 0.4;

/// Default weight of the genre similarity
pub const DEFAULT_GENRE_WEIGHT: f64 = 0.6;

/// Weights of the two similarity signals in the blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub user: f64,
    pub genre: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER_WEIGHT,
            genre: DEFAULT_GENRE_WEIGHT,
        }
    }
}

/// Cosine similarity between one-hot genre vectors over the catalog's genre vocabulary
pub fn genre_similarity(catalog: &Catalog) -> SimilarityMatrix {
    let vocabulary = catalog.genre_vocabulary();
    let vectors: Vec<Vec<f64>> = catalog
        .movies()
        .iter()
        .map(|movie| {
            vocabulary
                .iter()
                .map(|genre| if movie.genres.contains(*genre) { 1.0 } else { 0.0 })
                .collect()
        })
        .collect();

    SimilarityMatrix::cosine_of(&vectors)
}

/// Cosine similarity between movies' rating columns.
///
/// Ratings for movies outside the catalog are ignored. Repeated ratings of
/// the same movie by the same user are averaged.
pub fn rating_similarity(catalog: &Catalog, ratings: &[Rating]) -> SimilarityMatrix {
    let size = catalog.len();

    let mut by_user: BTreeMap<u32, BTreeMap<usize, (f64, u32)>> = BTreeMap::new();
    let mut skipped = 0usize;
    for rating in ratings {
        let Some(pos) = catalog.position(rating.movie_id) else {
            skipped += 1;
            continue;
        };
        let entry = by_user
            .entry(rating.user_id)
            .or_default()
            .entry(pos)
            .or_insert((0.0, 0));
        entry.0 += rating.rating;
        entry.1 += 1;
    }
    if skipped > 0 {
        tracing::warn!(skipped = skipped, "Ignored ratings for movies outside the catalog");
    }

    // Upper triangle of the movie-by-movie Gram matrix; the diagonal holds squared norms
    let mut dots = vec![0.0; size * size];
    for rated in by_user.values() {
        let column: Vec<(usize, f64)> = rated
            .iter()
            .map(|(&pos, &(sum, count))| (pos, sum / f64::from(count)))
            .collect();

        for (k, &(i, r_i)) in column.iter().enumerate() {
            for &(j, r_j) in &column[k..] {
                dots[i * size + j] += r_i * r_j;
            }
        }
    }

    SimilarityMatrix::from_upper_triangle(size, |i, j| {
        let denominator = (dots[i * size + i] * dots[j * size + j]).sqrt();
        if denominator == 0.0 {
            0.0
        } else {
            (dots[i * size + j] / denominator).clamp(-1.0, 1.0)
        }
    })
}

/// `weights.user * rating_similarity + weights.genre * genre_similarity`.
///
/// Both component matrices are computed in full before blending.
pub fn blended_similarity(
    catalog: &Catalog,
    ratings: &[Rating],
    weights: BlendWeights,
) -> SimilarityMatrix {
    let user_based = rating_similarity(catalog, ratings);
    let genre_based = genre_similarity(catalog);

    tracing::debug!(
        movies = catalog.len(),
        user_weight = weights.user,
        genre_weight = weights.genre,
        "Blending rating and genre similarity"
    );

    user_based.weighted_sum(weights.user, &genre_based, weights.genre)
}
