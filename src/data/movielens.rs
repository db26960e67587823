// MovieLens 1M flat files: `::`-separated fields, Latin-1 encoded.
//
//   movies.dat   movie_id::title::Genre1|Genre2
//   ratings.dat  user_id::movie_id::rating::timestamp

use std::path::Path;

use super::read_bytes;
use crate::{
    error::LoadError,
    models::{Movie, MovieId, Rating},
};

const FIELD_SEPARATOR: &str = "::";
const GENRE_SEPARATOR: char = '|';

/// Latin-1 maps every byte to the code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// Non-blank lines with their 1-based line numbers
fn records(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| (number, line.split(FIELD_SEPARATOR).collect()))
}

pub fn parse_movies(text: &str, path: &Path) -> Result<Vec<Movie>, LoadError> {
    records(text)
        .map(|(line, fields)| {
            let [id, title, genres] = fields[..] else {
                return Err(parse_error(
                    path,
                    line,
                    format!("expected 3 fields, found {}", fields.len()),
                ));
            };
            let movie_id: MovieId = id
                .trim()
                .parse()
                .map_err(|_| parse_error(path, line, format!("invalid movie id {:?}", id)))?;
            let genres = genres
                .split(GENRE_SEPARATOR)
                .map(str::trim)
                .filter(|g| !g.is_empty());
            Ok(Movie::new(movie_id, title, genres))
        })
        .collect()
}

pub fn parse_ratings(text: &str, path: &Path) -> Result<Vec<Rating>, LoadError> {
    records(text)
        .map(|(line, fields)| {
            // The trailing timestamp is not used
            let [user, movie, rating, _timestamp] = fields[..] else {
                return Err(parse_error(
                    path,
                    line,
                    format!("expected 4 fields, found {}", fields.len()),
                ));
            };
            let user_id = user
                .trim()
                .parse()
                .map_err(|_| parse_error(path, line, format!("invalid user id {:?}", user)))?;
            let movie_id = movie
                .trim()
                .parse()
                .map_err(|_| parse_error(path, line, format!("invalid movie id {:?}", movie)))?;
            let rating: f64 = rating
                .trim()
                .parse()
                .ok()
                .filter(|r: &f64| r.is_finite())
                .ok_or_else(|| parse_error(path, line, format!("invalid rating {:?}", rating)))?;
            Ok(Rating {
                user_id,
                movie_id,
                rating,
            })
        })
        .collect()
}

pub fn load_movies(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let text = decode_latin1(&read_bytes(path)?);
    let movies = parse_movies(&text, path)?;
    tracing::info!(path = %path.display(), movies = movies.len(), "Loaded MovieLens movies");
    Ok(movies)
}

pub fn load_ratings(path: &Path) -> Result<Vec<Rating>, LoadError> {
    let text = decode_latin1(&read_bytes(path)?);
    let ratings = parse_ratings(&text, path)?;
    tracing::info!(path = %path.display(), ratings = ratings.len(), "Loaded MovieLens ratings");
    Ok(ratings)
}
