// src/services/favorites_store.rs
//
// Favorites Store - single owner of the favorited movie ids
//
// CRITICAL RULES:
// - The ONLY reader and writer of the persisted favorites blob
// - Every mutation persists the full set before returning
// - Storage failures are logged and contained, never returned
// - Events are emitted after the lock is released

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{FavoriteId, FavoriteSet, FavoritesSnapshot, MovieRecord};
use crate::error::AppError;
use crate::events::{EventBus, FavoriteAdded, FavoriteRemoved, FavoritesCleared, FavoritesHydrated};
use crate::repositories::KeyValueRepository;

/// Storage key of the favorites blob
pub const FAVORITES_KEY: &str = "movies-hub-favorites";

struct StoreState {
    favorites: FavoriteSet,
    revision: u64,
}

pub struct FavoritesStore {
    storage: Arc<dyn KeyValueRepository>,
    event_bus: Arc<EventBus>,
    state: RwLock<StoreState>,
}

impl FavoritesStore {
    /// Build the store and hydrate it from storage.
    ///
    /// Never fails: unreadable state degrades to an empty set.
    pub fn new(storage: Arc<dyn KeyValueRepository>, event_bus: Arc<EventBus>) -> Self {
        let (favorites, recovered_cleanly) = Self::hydrate(storage.as_ref());
        let count = favorites.len();

        let store = Self {
            storage,
            event_bus,
            state: RwLock::new(StoreState {
                favorites,
                revision: 0,
            }),
        };

        log::debug!("Favorites hydrated with {} ids", count);
        store
            .event_bus
            .emit(FavoritesHydrated::new(0, count, recovered_cleanly));
        store
    }

    fn hydrate(storage: &dyn KeyValueRepository) -> (FavoriteSet, bool) {
        let raw = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (FavoriteSet::new(), true),
            Err(e) => {
                log::warn!("Could not read favorites from storage: {}", e);
                return (FavoriteSet::new(), false);
            }
        };

        match FavoriteSet::from_blob(&raw) {
            Ok(favorites) => (favorites, true),
            Err(e) => {
                log::warn!("Error parsing favorites from storage, starting empty: {}", e);
                (FavoriteSet::new(), false)
            }
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Flip membership of `id`. Returns true when it is now a favorite.
    pub fn toggle(&self, id: FavoriteId) -> bool {
        let (present, revision) = {
            let mut state = self.write_state();
            let present = state.favorites.toggle(id);
            (present, self.commit(&mut state, true))
        };

        if present {
            self.event_bus.emit(FavoriteAdded::new(id, revision));
        } else {
            self.event_bus.emit(FavoriteRemoved::new(id, revision));
        }
        present
    }

    /// Insert `id`; a no-op when already present.
    pub fn add(&self, id: FavoriteId) {
        let (inserted, revision) = {
            let mut state = self.write_state();
            let inserted = state.favorites.insert(id);
            (inserted, self.commit(&mut state, inserted))
        };

        if inserted {
            self.event_bus.emit(FavoriteAdded::new(id, revision));
        }
    }

    /// Remove `id`; a no-op when absent.
    pub fn remove(&self, id: FavoriteId) {
        let (removed, revision) = {
            let mut state = self.write_state();
            let removed = state.favorites.remove(id);
            (removed, self.commit(&mut state, removed))
        };

        if removed {
            self.event_bus.emit(FavoriteRemoved::new(id, revision));
        }
    }

    pub fn clear(&self) {
        let (removed, revision) = {
            let mut state = self.write_state();
            let removed = state.favorites.len();
            state.favorites.clear();
            (removed, self.commit(&mut state, removed > 0))
        };

        if removed > 0 {
            self.event_bus.emit(FavoritesCleared::new(removed, revision));
        }
    }

    /// Bumps the revision when the set changed and writes the whole set.
    fn commit(&self, state: &mut StoreState, changed: bool) -> u64 {
        if changed {
            state.revision += 1;
        }
        self.persist(&state.favorites);
        state.revision
    }

    fn persist(&self, favorites: &FavoriteSet) {
        let written = favorites
            .to_blob()
            .map_err(AppError::from)
            .and_then(|blob| self.storage.set(FAVORITES_KEY, &blob));

        if let Err(e) = written {
            log::error!("Failed to persist favorites, keeping in-memory state: {}", e);
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_favorite(&self, id: FavoriteId) -> bool {
        self.read_state().favorites.contains(id)
    }

    /// Keep the records that are favorites, in the order given.
    pub fn resolve<M: MovieRecord + Clone>(&self, records: &[M]) -> Vec<M> {
        let state = self.read_state();
        records
            .iter()
            .filter(|record| state.favorites.contains(record.id()))
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        let state = self.read_state();
        FavoritesSnapshot {
            revision: state.revision,
            ids: state.favorites.to_vec(),
        }
    }

    /// Increases on every mutation that changed the set.
    pub fn revision(&self) -> u64 {
        self.read_state().revision
    }

    pub fn ids(&self) -> Vec<FavoriteId> {
        self.read_state().favorites.to_vec()
    }

    pub fn len(&self) -> usize {
        self.read_state().favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().favorites.is_empty()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
