// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod favorites;
pub mod movie;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Favorites Domain
pub use favorites::{FavoriteId, FavoriteSet, FavoritesSnapshot};

// Movie Domain (read-only catalog records)
pub use movie::{sort_movies, Genre, MovieDetail, MoviePage, MovieRecord, MovieSummary, SortMode};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Malformed favorites blob: {0}")]
    MalformedFavorites(String),

    #[error("Unknown sort mode: {0}")]
    InvalidSortMode(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
