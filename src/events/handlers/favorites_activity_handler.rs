// src/events/handlers/favorites_activity_handler.rs
//
// Favorites Activity Handler
//
// Writes every favorites change to the application log.
//
// CRITICAL RULES:
// - Read-only: never calls back into the store
// - Uses closure-based subscription (EventHandler is internal to bus)

use crate::events::{EventBus, FavoriteAdded, FavoriteRemoved, FavoritesCleared, FavoritesHydrated};

// ============================================================================
// HANDLER REGISTRATION
// ============================================================================

/// Registers the activity log handlers with the event bus.
///
/// Register before the favorites store is built so hydration is logged too.
pub fn register_favorites_activity_handlers(bus: &EventBus) {
    bus.subscribe::<FavoritesHydrated, _>(handle_hydrated);
    bus.subscribe::<FavoriteAdded, _>(|event| {
        log::info!(
            "[FAVORITES] Added movie {} (revision {})",
            event.movie_id,
            event.revision
        );
    });
    bus.subscribe::<FavoriteRemoved, _>(|event| {
        log::info!(
            "[FAVORITES] Removed movie {} (revision {})",
            event.movie_id,
            event.revision
        );
    });
    bus.subscribe::<FavoritesCleared, _>(|event| {
        log::info!(
            "[FAVORITES] Cleared {} movies (revision {})",
            event.removed,
            event.revision
        );
    });

    log::debug!("[FAVORITES] Activity handlers registered");
}

fn handle_hydrated(event: &FavoritesHydrated) {
    if event.recovered_cleanly {
        log::info!("[FAVORITES] Loaded {} favorites", event.count);
    } else {
        log::warn!("[FAVORITES] Stored favorites were unreadable, starting empty");
    }
}
