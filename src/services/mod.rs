// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_feed;
pub mod favorites_projection;
pub mod favorites_store;


pub use catalog_feed::{CatalogFeed, FeedOutcome, FeedSource};

pub use favorites_projection::{
    load_favorite_details,
    FavoritesProjection,
    ListingState,
    LoadOutcome,
};

pub use favorites_store::{FavoritesStore, FAVORITES_KEY};
