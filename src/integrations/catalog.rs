// src/integrations/catalog.rs
//
// The remote catalog seam. Services depend on this trait, never on a
// concrete HTTP client, so tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{FavoriteId, MovieDetail, MoviePage};
use crate::error::CatalogError;

/// Read-only access to a remote movie catalog.
///
/// Pages are 1-indexed. A page outside the catalog's range comes back as an
/// empty, valid page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError>;

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError>;

    async fn movie_detail(&self, id: FavoriteId) -> Result<MovieDetail, CatalogError>;
}
