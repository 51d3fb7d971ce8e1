// src/services/favorites_projection.rs
//
// Favorites Projection - turns the favorite ids into a sorted listing
//
// CRITICAL RULES:
// - Never mutates the favorites store
// - No detail cache: every reload asks the catalog again
// - A batch is all-or-nothing: one failed lookup fails the listing
// - Results for an outdated id set are never shown

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;

use crate::domain::{sort_movies, FavoriteId, FavoritesSnapshot, MovieDetail, SortMode};
use crate::error::{AppError, AppResult};
use crate::integrations::MovieCatalog;
use crate::services::favorites_store::FavoritesStore;

/// Fetch details for every id concurrently.
///
/// Output follows the order of `ids`. The first failed lookup aborts the
/// remaining ones and fails the whole batch.
pub async fn load_favorite_details(
    ids: &[FavoriteId],
    catalog: Arc<dyn MovieCatalog>,
) -> AppResult<Vec<MovieDetail>> {
    let mut lookups = JoinSet::new();
    for (index, &id) in ids.iter().enumerate() {
        let catalog = Arc::clone(&catalog);
        lookups.spawn(async move { (index, id, catalog.movie_detail(id).await) });
    }

    let mut slots: Vec<Option<MovieDetail>> = vec![None; ids.len()];
    while let Some(joined) = lookups.join_next().await {
        let (index, id, result) = joined?;
        match result {
            Ok(detail) => slots[index] = Some(detail),
            Err(source) => {
                lookups.abort_all();
                log::error!("Detail lookup for movie {} failed: {}", id, source);
                return Err(AppError::DetailLookup {
                    movie_id: id,
                    source,
                });
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// What the favorites listing currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ListingState {
    Idle,
    Loading,
    Ready { movies: Vec<MovieDetail> },
    Failed { message: String },
}

impl ListingState {
    pub fn name(&self) -> &'static str {
        match self {
            ListingState::Idle => "idle",
            ListingState::Loading => "loading",
            ListingState::Ready { .. } => "ready",
            ListingState::Failed { .. } => "failed",
        }
    }
}

/// Result of a reload that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The listing now shows these movies, sorted.
    Ready(Vec<MovieDetail>),
    /// A newer reload started meanwhile; this result was dropped.
    Superseded,
}

struct ProjectionState {
    generation: u64,
    sort: SortMode,
    /// Store revision the resolved list belongs to
    loaded_revision: Option<u64>,
    /// Resolved records in id order, kept only for re-sorting
    resolved: Vec<MovieDetail>,
    listing: ListingState,
}

enum Settled {
    Done(AppResult<LoadOutcome>),
    IdsChanged,
}

pub struct FavoritesProjection {
    store: Arc<FavoritesStore>,
    catalog: Arc<dyn MovieCatalog>,
    state: Mutex<ProjectionState>,
}

impl FavoritesProjection {
    pub fn new(store: Arc<FavoritesStore>, catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            store,
            catalog,
            state: Mutex::new(ProjectionState {
                generation: 0,
                sort: SortMode::default(),
                loaded_revision: None,
                resolved: Vec::new(),
                listing: ListingState::Idle,
            }),
        }
    }

    pub fn view(&self) -> ListingState {
        self.lock().listing.clone()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.lock().sort
    }

    /// Change the ordering. A ready listing is re-sorted without fetching.
    pub fn set_sort(&self, mode: SortMode) -> ListingState {
        let mut state = self.lock();
        state.sort = mode;
        if let ListingState::Ready { .. } = state.listing {
            state.listing = ListingState::Ready {
                movies: sort_movies(&state.resolved, mode),
            };
        }
        state.listing.clone()
    }

    /// Enter `Loading` and resolve the current favorites.
    ///
    /// If the favorites change while the batch is in flight, the batch is
    /// thrown away and repeated for the new ids. If another reload starts
    /// meanwhile, this one yields [`LoadOutcome::Superseded`].
    pub async fn reload(&self) -> AppResult<LoadOutcome> {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.listing = ListingState::Loading;
            state.generation
        };

        loop {
            let snapshot = self.store.snapshot();
            log::debug!(
                "Loading {} favorite details (revision {})",
                snapshot.ids.len(),
                snapshot.revision
            );

            let result = load_favorite_details(&snapshot.ids, Arc::clone(&self.catalog)).await;

            match self.settle(generation, &snapshot, result) {
                Settled::Done(outcome) => return outcome,
                Settled::IdsChanged => {
                    log::debug!("Favorites changed during load, discarding stale batch");
                }
            }
        }
    }

    /// Manual retry after a failure.
    pub async fn retry(&self) -> AppResult<LoadOutcome> {
        log::debug!("Retrying favorites listing from state {}", self.view().name());
        self.reload().await
    }

    /// Reload only when the listing does not reflect the current favorites.
    pub async fn refresh_if_changed(&self) -> AppResult<LoadOutcome> {
        {
            let state = self.lock();
            if let ListingState::Ready { movies } = &state.listing {
                if state.loaded_revision == Some(self.store.revision()) {
                    return Ok(LoadOutcome::Ready(movies.clone()));
                }
            }
        }
        self.reload().await
    }

    fn settle(
        &self,
        generation: u64,
        snapshot: &FavoritesSnapshot,
        result: AppResult<Vec<MovieDetail>>,
    ) -> Settled {
        let mut state = self.lock();

        if state.generation != generation {
            log::debug!("Dropping favorites batch from superseded load {}", generation);
            return Settled::Done(Ok(LoadOutcome::Superseded));
        }
        if self.store.revision() != snapshot.revision {
            return Settled::IdsChanged;
        }

        match result {
            Ok(details) => {
                let sorted = sort_movies(&details, state.sort);
                state.resolved = details;
                state.loaded_revision = Some(snapshot.revision);
                state.listing = ListingState::Ready {
                    movies: sorted.clone(),
                };
                Settled::Done(Ok(LoadOutcome::Ready(sorted)))
            }
            Err(e) => {
                state.resolved.clear();
                state.loaded_revision = None;
                state.listing = ListingState::Failed {
                    message: e.to_string(),
                };
                Settled::Done(Err(e))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProjectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
