// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::FavoriteId;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { stringify!($name) }
        }
    };
}

// ============================================================================
// FAVORITES EVENTS
// ============================================================================

/// Emitted once the store has read its persisted state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesHydrated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub revision: u64,
    pub count: usize,
    /// False when a stored blob existed but could not be read
    pub recovered_cleanly: bool,
}

impl FavoritesHydrated {
    pub fn new(revision: u64, count: usize, recovered_cleanly: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            revision,
            count,
            recovered_cleanly,
        }
    }
}

impl_domain_event!(FavoritesHydrated);

/// Emitted when a movie enters the favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: FavoriteId,
    pub revision: u64,
}

impl FavoriteAdded {
    pub fn new(movie_id: FavoriteId, revision: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
            revision,
        }
    }
}

impl_domain_event!(FavoriteAdded);

/// Emitted when a movie leaves the favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: FavoriteId,
    pub revision: u64,
}

impl FavoriteRemoved {
    pub fn new(movie_id: FavoriteId, revision: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
            revision,
        }
    }
}

impl_domain_event!(FavoriteRemoved);

/// Emitted when a non-empty favorites set is emptied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub removed: usize,
    pub revision: u64,
}

impl FavoritesCleared {
    pub fn new(removed: usize, revision: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            removed,
            revision,
        }
    }
}

impl_domain_event!(FavoritesCleared);
