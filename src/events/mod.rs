// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod handlers;
pub mod types;

pub use types::DomainEvent;

pub use types::{FavoriteAdded, FavoriteRemoved, FavoritesCleared, FavoritesHydrated};

pub use bus::{EventBus, EventLogEntry};

pub use handlers::register_favorites_activity_handlers;

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
