// src/application/state.rs

use std::sync::Arc;

use crate::events::{create_event_bus, register_favorites_activity_handlers, EventBus};
use crate::integrations::MovieCatalog;
use crate::repositories::KeyValueRepository;
use crate::services::{CatalogFeed, FavoritesProjection, FavoritesStore};

/// Application state shared by every command.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub favorites: Arc<FavoritesStore>,
    pub projection: Arc<FavoritesProjection>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub feed: Arc<CatalogFeed>,
}

impl AppState {
    /// Wire the services around one storage backend and one catalog.
    ///
    /// The favorites store hydrates here, so this is the single place that
    /// reads the persisted favorites.
    pub fn new(storage: Arc<dyn KeyValueRepository>, catalog: Arc<dyn MovieCatalog>) -> Self {
        let event_bus = Arc::new(create_event_bus());
        register_favorites_activity_handlers(&event_bus);
        let favorites = Arc::new(FavoritesStore::new(storage, Arc::clone(&event_bus)));
        let projection = Arc::new(FavoritesProjection::new(
            Arc::clone(&favorites),
            Arc::clone(&catalog),
        ));
        let feed = Arc::new(CatalogFeed::new(Arc::clone(&catalog)));

        Self {
            event_bus,
            favorites,
            projection,
            catalog,
            feed,
        }
    }
}
