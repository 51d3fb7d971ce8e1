// src/lib.rs
// MovieHub - Browse a remote movie catalog and keep a local list of favorites
//
// Architecture:
// - Domain-centric: favorites and movie records live in `domain`
// - Single owner: the favorites store is the only reader/writer of the
//   persisted favorites
// - Event-driven: store mutations are announced on the event bus
// - Remote catalog behind a trait, so services never see HTTP
// - Application Layer: UI boundary (commands + DTOs)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    sort_movies,
    DomainError,
    // Favorites
    FavoriteId,
    FavoriteSet,
    FavoritesSnapshot,
    // Movies
    Genre,
    MovieDetail,
    MoviePage,
    MovieRecord,
    MovieSummary,
    SortMode,
};

// ============================================================================
// PUBLIC API - Errors & Configuration
// ============================================================================

pub use config::{AppConfig, TmdbConfig};
pub use error::{AppError, AppResult, CatalogError};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    register_favorites_activity_handlers,
    DomainEvent,
    EventBus,
    EventLogEntry,
    FavoriteAdded,
    FavoriteRemoved,
    FavoritesCleared,
    FavoritesHydrated,
};

// ============================================================================
// PUBLIC API - Database & Repositories
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{KeyValueRepository, MemoryKeyValueRepository, SqliteKeyValueRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    load_favorite_details,
    // Catalog Feed
    CatalogFeed,
    FeedOutcome,
    FeedSource,
    // Favorites Projection
    FavoritesProjection,
    // Favorites Store
    FavoritesStore,
    ListingState,
    LoadOutcome,
    FAVORITES_KEY,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{poster_url, MovieCatalog, PosterSize, TmdbClient};
