// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Failures of the remote movie catalog.
///
/// Never retried by this crate; callers surface them and offer a manual retry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("TMDB API error: {0}")]
    Status(u16),

    #[error("TMDB request failed: {0}")]
    Transport(String),

    #[error("Failed to decode TMDB response: {0}")]
    Decode(String),

    #[error("TMDB credentials are not configured")]
    MissingCredentials,
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status(status.as_u16())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Detail lookup failed for movie {movie_id}: {source}")]
    DetailLookup {
        movie_id: i64,
        #[source]
        source: CatalogError,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// True for failures that came from the remote catalog.
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Catalog(_) | AppError::DetailLookup { .. })
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Other(format!("Background task failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
