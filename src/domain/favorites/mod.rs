//! Critical Favorites Invariants:
//!
//! 1. A favorite set never holds the same id twice
//! 2. The persisted blob is a JSON array of integers
//! 3. Decoding a freshly encoded set yields an equal set
//! 4. Entries that are not integers are dropped on decode, the rest survive

pub mod entity;

pub use entity::{FavoriteId, FavoriteSet, FavoritesSnapshot};
