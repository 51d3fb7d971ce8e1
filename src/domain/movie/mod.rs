//! Catalog records as delivered by the movie metadata provider.
//!
//! These types are read-only to the rest of the crate: they are produced by
//! a catalog lookup and owned by whoever asked for them.

pub mod entity;
pub mod sort;

pub use entity::{Genre, MovieDetail, MoviePage, MovieRecord, MovieSummary};
pub use sort::{sort_movies, SortMode};
