//! Startup loaders for the catalog and similarity inputs

pub mod artifact;
pub mod movielens;

use std::path::Path;

use crate::error::LoadError;

fn read_bytes(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
