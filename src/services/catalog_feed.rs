// src/services/catalog_feed.rs
//
// Catalog Feed - incremental browsing of popular movies or search results
//
// CRITICAL RULES:
// - At most one page request in flight per feed
// - A page is appended once, and a movie id appears once
// - Responses for a previous query are dropped after a reset

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{FavoriteId, MoviePage, MovieSummary};
use crate::error::{AppError, AppResult};
use crate::integrations::{MovieCatalog, MAX_PAGE};

/// What the feed is paging through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Popular,
    Search(String),
}

impl FeedSource {
    /// Blank queries browse popular movies.
    pub fn from_query(query: Option<&str>) -> Self {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => FeedSource::Search(q.to_string()),
            None => FeedSource::Popular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// `added` new movies from `page` were appended.
    Appended { page: u32, added: usize },
    /// Another page request is still outstanding.
    Busy,
    /// The page was already appended earlier.
    AlreadyLoaded(u32),
    /// No pages left.
    Exhausted,
    /// The feed was reset while the request was in flight.
    Stale,
}

struct FeedState {
    source: FeedSource,
    generation: u64,
    items: Vec<MovieSummary>,
    seen: HashSet<FavoriteId>,
    loaded_pages: BTreeSet<u32>,
    next_page: u32,
    total_pages: Option<u32>,
    in_flight: bool,
    error: Option<String>,
}

impl FeedState {
    fn fresh(source: FeedSource, generation: u64) -> Self {
        Self {
            source,
            generation,
            items: Vec::new(),
            seen: HashSet::new(),
            loaded_pages: BTreeSet::new(),
            next_page: 1,
            total_pages: None,
            in_flight: false,
            error: None,
        }
    }

    fn has_more(&self) -> bool {
        let last = self.total_pages.map_or(MAX_PAGE, |total| total.min(MAX_PAGE));
        self.next_page <= last
    }

    fn append(&mut self, page: MoviePage) -> usize {
        let before = self.items.len();
        for movie in page.results {
            if self.seen.insert(movie.id) {
                self.items.push(movie);
            }
        }
        self.items.len() - before
    }
}

pub struct CatalogFeed {
    catalog: Arc<dyn MovieCatalog>,
    state: Mutex<FeedState>,
}

impl CatalogFeed {
    /// A feed over popular movies; call [`CatalogFeed::reset`] to search.
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(FeedState::fresh(FeedSource::Popular, 0)),
        }
    }

    /// Start over for `query` (popular movies when blank).
    ///
    /// An outstanding request becomes stale.
    pub fn reset(&self, query: Option<&str>) {
        self.reset_to(FeedSource::from_query(query));
    }

    /// Manual retry: drop everything and fetch the first page again.
    pub async fn reload(&self) -> AppResult<FeedOutcome> {
        let source = self.source();
        self.reset_to(source);
        self.load_next().await
    }

    fn reset_to(&self, source: FeedSource) {
        let mut state = self.lock();
        let generation = state.generation + 1;
        *state = FeedState::fresh(source, generation);
    }

    /// Fetch the page after the last one appended.
    pub async fn load_next(&self) -> AppResult<FeedOutcome> {
        let page = {
            let state = self.lock();
            if state.in_flight {
                return Ok(FeedOutcome::Busy);
            }
            if !state.has_more() {
                return Ok(FeedOutcome::Exhausted);
            }
            state.next_page
        };
        self.load_page(page).await
    }

    /// Fetch a specific page and append what is new in it.
    ///
    /// Pages outside `1..=MAX_PAGE` are `Exhausted` and leave the feed as it
    /// was.
    pub async fn load_page(&self, page: u32) -> AppResult<FeedOutcome> {
        if !(1..=MAX_PAGE).contains(&page) {
            return Ok(FeedOutcome::Exhausted);
        }

        let (generation, source) = {
            let mut state = self.lock();
            if state.in_flight {
                return Ok(FeedOutcome::Busy);
            }
            if state.loaded_pages.contains(&page) {
                return Ok(FeedOutcome::AlreadyLoaded(page));
            }
            if state.total_pages.is_some_and(|total| page > total) {
                return Ok(FeedOutcome::Exhausted);
            }
            state.in_flight = true;
            state.error = None;
            (state.generation, state.source.clone())
        };

        log::debug!("Fetching {:?} page {}", source, page);
        let result = match &source {
            FeedSource::Popular => self.catalog.popular(page).await,
            FeedSource::Search(query) => self.catalog.search(query, page).await,
        };

        let mut state = self.lock();
        if state.generation != generation {
            log::debug!("Dropping {:?} page {} after reset", source, page);
            return Ok(FeedOutcome::Stale);
        }
        state.in_flight = false;

        match result {
            Ok(movie_page) => {
                state.total_pages = Some(movie_page.total_pages);
                state.loaded_pages.insert(page);
                state.next_page = state.next_page.max(page.saturating_add(1));
                let added = state.append(movie_page);
                Ok(FeedOutcome::Appended { page, added })
            }
            Err(e) => {
                log::error!("Error loading movies: {}", e);
                state.error = Some(e.to_string());
                Err(AppError::Catalog(e))
            }
        }
    }

    pub fn source(&self) -> FeedSource {
        self.lock().source.clone()
    }

    pub fn items(&self) -> Vec<MovieSummary> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight
    }

    /// Message of the last failed request, cleared by the next request.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieDetail;
    use crate::error::CatalogError;
    use crate::integrations::MockMovieCatalog;
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use tokio::sync::Notify;

    fn summary(id: FavoriteId) -> MovieSummary {
        serde_json::from_value(serde_json::json!({ "id": id, "title": format!("Movie {}", id) }))
            .unwrap()
    }

    fn page(number: u32, ids: &[FavoriteId], total_pages: u32) -> MoviePage {
        MoviePage {
            page: number,
            results: ids.iter().copied().map(summary).collect(),
            total_pages,
            total_results: total_pages * 20,
        }
    }

    fn item_ids(feed: &CatalogFeed) -> Vec<FavoriteId> {
        feed.items().iter().map(|m| m.id).collect()
    }

    /// Popular pages whose first request blocks until released.
    struct BlockingCatalog {
        started: Notify,
        gate: Notify,
        blocked_once: Mutex<bool>,
    }

    impl BlockingCatalog {
        fn new() -> Self {
            Self {
                started: Notify::new(),
                gate: Notify::new(),
                blocked_once: Mutex::new(false),
            }
        }
    }

    #[async_trait]
    impl MovieCatalog for BlockingCatalog {
        async fn popular(&self, number: u32) -> Result<MoviePage, CatalogError> {
            let first = {
                let mut blocked = self.blocked_once.lock().unwrap();
                !std::mem::replace(&mut *blocked, true)
            };
            if first {
                self.started.notify_one();
                self.gate.notified().await;
            }
            Ok(page(number, &[1, 2], 3))
        }

        async fn search(&self, _query: &str, number: u32) -> Result<MoviePage, CatalogError> {
            Ok(page(number, &[100], 1))
        }

        async fn movie_detail(&self, _id: FavoriteId) -> Result<MovieDetail, CatalogError> {
            Err(CatalogError::Status(404))
        }
    }

    #[test]
    fn test_source_from_query() {
        assert_eq!(FeedSource::from_query(None), FeedSource::Popular);
        assert_eq!(FeedSource::from_query(Some("  ")), FeedSource::Popular);
        assert_eq!(
            FeedSource::from_query(Some(" batman ")),
            FeedSource::Search("batman".to_string())
        );
    }

    #[tokio::test]
    async fn test_pages_append_in_order() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_popular()
            .with(eq(1))
            .times(1)
            .returning(|n| Ok(page(n, &[1, 2], 2)));
        catalog
            .expect_popular()
            .with(eq(2))
            .times(1)
            .returning(|n| Ok(page(n, &[3, 4], 2)));
        let feed = CatalogFeed::new(Arc::new(catalog));

        assert_eq!(
            feed.load_next().await.unwrap(),
            FeedOutcome::Appended { page: 1, added: 2 }
        );
        assert!(feed.has_more());
        feed.load_next().await.unwrap();

        assert_eq!(item_ids(&feed), vec![1, 2, 3, 4]);
        assert!(!feed.has_more());
        assert_eq!(feed.load_next().await.unwrap(), FeedOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_popular().returning(|n| match n {
            1 => Ok(page(1, &[1, 2, 3], 3)),
            _ => Ok(page(n, &[3, 4], 3)),
        });
        let feed = CatalogFeed::new(Arc::new(catalog));

        feed.load_next().await.unwrap();
        let outcome = feed.load_next().await.unwrap();

        assert_eq!(outcome, FeedOutcome::Appended { page: 2, added: 1 });
        assert_eq!(item_ids(&feed), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_out_of_range_pages_leave_feed_untouched() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_popular()
            .with(eq(1))
            .times(1)
            .returning(|n| Ok(page(n, &[1, 2], 3)));
        let feed = CatalogFeed::new(Arc::new(catalog));

        for out_of_range in [0, MAX_PAGE + 1, u32::MAX] {
            assert_eq!(feed.load_page(out_of_range).await.unwrap(), FeedOutcome::Exhausted);
            assert!(feed.has_more());
            assert!(feed.is_empty());
            assert!(!feed.is_loading());
        }

        assert_eq!(
            feed.load_next().await.unwrap(),
            FeedOutcome::Appended { page: 1, added: 2 }
        );
        assert_eq!(item_ids(&feed), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_feed_stops_at_catalog_ceiling() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_popular()
            .with(eq(MAX_PAGE))
            .times(1)
            .returning(|n| Ok(page(n, &[7], 40_000)));
        let feed = CatalogFeed::new(Arc::new(catalog));

        feed.load_page(MAX_PAGE).await.unwrap();

        assert!(!feed.has_more());
        assert_eq!(feed.load_next().await.unwrap(), FeedOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_same_page_twice_is_not_appended_twice() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_popular()
            .times(1)
            .returning(|n| Ok(page(n, &[1, 2], 5)));
        let feed = CatalogFeed::new(Arc::new(catalog));

        feed.load_page(1).await.unwrap();
        let again = feed.load_page(1).await.unwrap();

        assert_eq!(again, FeedOutcome::AlreadyLoaded(1));
        assert_eq!(feed.len(), 2);
    }

    #[tokio::test]
    async fn test_search_source_uses_query() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .withf(|query, page| query == "duna" && *page == 1)
            .times(1)
            .returning(|_, n| Ok(page(n, &[438631], 1)));
        let feed = CatalogFeed::new(Arc::new(catalog));
        feed.reset(Some("duna"));

        feed.load_next().await.unwrap();

        assert_eq!(item_ids(&feed), vec![438631]);
        assert!(!feed.has_more());
    }

    #[tokio::test]
    async fn test_empty_result_set() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .returning(|_, n| Ok(MoviePage::empty(n)));
        let feed = CatalogFeed::new(Arc::new(catalog));
        feed.reset(Some("zzzz"));

        feed.load_next().await.unwrap();

        assert!(feed.is_empty());
        assert!(!feed.has_more());
    }

    #[tokio::test]
    async fn test_failure_is_reported_and_retry_restarts() {
        let mut catalog = MockMovieCatalog::new();
        let mut calls = 0;
        catalog.expect_popular().returning(move |n| {
            calls += 1;
            if calls == 1 {
                Err(CatalogError::Status(503))
            } else {
                Ok(page(n, &[9], 1))
            }
        });
        let feed = CatalogFeed::new(Arc::new(catalog));

        let error = feed.load_next().await.unwrap_err();
        assert!(error.is_remote());
        assert!(feed.error().unwrap().contains("503"));
        assert!(!feed.is_loading());

        feed.reload().await.unwrap();
        assert_eq!(item_ids(&feed), vec![9]);
        assert!(feed.error().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_request_is_refused() {
        let catalog = Arc::new(BlockingCatalog::new());
        let feed = Arc::new(CatalogFeed::new(catalog.clone()));

        let first = {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move { feed.load_next().await })
        };
        catalog.started.notified().await;

        assert!(feed.is_loading());
        assert_eq!(feed.load_next().await.unwrap(), FeedOutcome::Busy);

        catalog.gate.notify_one();
        assert_eq!(
            first.await.unwrap().unwrap(),
            FeedOutcome::Appended { page: 1, added: 2 }
        );
        assert!(!feed.is_loading());
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_page() {
        let catalog = Arc::new(BlockingCatalog::new());
        let feed = Arc::new(CatalogFeed::new(catalog.clone()));

        let first = {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move { feed.load_next().await })
        };
        catalog.started.notified().await;

        feed.reset(Some("alien"));
        feed.load_next().await.unwrap();

        catalog.gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), FeedOutcome::Stale);
        assert_eq!(item_ids(&feed), vec![100]);
    }
}
