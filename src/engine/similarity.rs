use crate::error::LoadError;

/// Largest asymmetry tolerated when loading a precomputed matrix
const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// Cosine similarity of two equal-length vectors.
///
/// Defined as 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(u: &[f64], v: &[f64]) -> f64 {
    debug_assert_eq!(u.len(), v.len());

    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let norm_u = u.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_v = v.iter().map(|b| b * b).sum::<f64>().sqrt();

    if norm_u == 0.0 || norm_v == 0.0 {
        return 0.0;
    }

    // Rounding can push identical directions a hair above 1.0
    (dot / (norm_u * norm_v)).clamp(-1.0, 1.0)
}

/// Dense, square, symmetric matrix of pairwise similarity scores.
///
/// Row and column `i` correspond to catalog position `i`. Built once and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Wraps row-major scores, validating shape, finiteness and symmetry
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, LoadError> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(LoadError::Inconsistent(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if let Some(j) = row.iter().position(|s| !s.is_finite()) {
                return Err(LoadError::Inconsistent(format!(
                    "non-finite similarity at ({}, {})",
                    i, j
                )));
            }
            scores.extend(row);
        }

        let matrix = Self { size, scores };
        for i in 0..size {
            for j in (i + 1)..size {
                if (matrix.get(i, j) - matrix.get(j, i)).abs() > SYMMETRY_TOLERANCE {
                    return Err(LoadError::Inconsistent(format!(
                        "similarity matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }

        Ok(matrix)
    }

    /// Builds a symmetric matrix by evaluating `score` on the upper triangle
    /// (diagonal included) and mirroring it.
    pub fn from_upper_triangle<F>(size: usize, mut score: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut scores = vec![0.0; size * size];
        for i in 0..size {
            for j in i..size {
                let s = score(i, j);
                scores[i * size + j] = s;
                scores[j * size + i] = s;
            }
        }
        Self { size, scores }
    }

    /// Pairwise cosine similarity of the given row vectors
    pub fn cosine_of(vectors: &[Vec<f64>]) -> Self {
        Self::from_upper_triangle(vectors.len(), |i, j| {
            cosine_similarity(&vectors[i], &vectors[j])
        })
    }

    /// Element-wise weighted sum `weight * self + other_weight * other`, reusing
    /// this matrix's storage
    pub fn weighted_sum(mut self, weight: f64, other: &Self, other_weight: f64) -> Self {
        debug_assert_eq!(self.size, other.size);
        for (score, other_score) in self.scores.iter_mut().zip(&other.scores) {
            *score = weight * *score + other_weight * other_score;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Score between catalog positions `i` and `j`. Panics when out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.size + j]
    }

    /// Full row for catalog position `i`, diagonal included
    pub fn row(&self, i: usize) -> &[f64] {
        &self.scores[i * self.size..(i + 1) * self.size]
    }
}
