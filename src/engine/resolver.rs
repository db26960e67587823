use serde::Deserialize;

use super::Catalog;
use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// How a title is resolved when no catalog title matches it exactly
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Exact matches only
    Exact,
    /// First case-insensitive substring match in catalog order.
    ///
    /// Near-duplicate titles can surprise here: "toy story" resolves to
    /// whichever "Toy Story ..." entry was loaded first.
    #[default]
    First,
    /// Shortest title containing the input (case-insensitive), ties broken by catalog order
    Shortest,
}

/// Maps user input to a catalog movie.
///
/// An exact title match always wins, even when another title contains the
/// input as a substring. Blank input never matches.
pub fn resolve<'a>(
    catalog: &'a Catalog,
    input: &str,
    strategy: MatchStrategy,
) -> AppResult<&'a Movie> {
    if input.trim().is_empty() {
        return Err(AppError::title_not_found(input));
    }

    if let Some(movie) = catalog.movies().iter().find(|m| m.title == input) {
        return Ok(movie);
    }

    let needle = input.to_lowercase();
    let mut candidates = catalog
        .movies()
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle));

    let matched = match strategy {
        MatchStrategy::Exact => None,
        MatchStrategy::First => candidates.next(),
        // min_by_key keeps the first of equal keys
        MatchStrategy::Shortest => candidates.min_by_key(|m| m.title.chars().count()),
    };

    matched.ok_or_else(|| AppError::title_not_found(input))
}
