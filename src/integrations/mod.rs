// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog;
pub mod tmdb;

pub use catalog::MovieCatalog;
pub use tmdb::client::{poster_url, PosterSize, TmdbClient, MAX_PAGE};

#[cfg(test)]
pub use catalog::MockMovieCatalog;
