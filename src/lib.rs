// Movie recommender: similarity-based "more like this" over a fixed catalog.
//
// The engine (catalog, similarity store, title resolver, recommender) is
// built once at startup; the HTTP layer resolves titles, ranks, and
// optionally decorates results with metadata from an external movie database.

pub mod cache;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
