// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers
//
// RULES:
// - Call the catalog or the feed
// - Mark favorites on the way out
// - Never contain business logic

use crate::application::error_handling::ToErrorResponse;
use crate::application::{dto::*, state::AppState};
use crate::domain::FavoriteId;
use crate::error::AppError;
use crate::services::{FeedOutcome, FeedSource};

/// One page of popular movies
pub async fn list_popular(state: &AppState, page: u32) -> Result<FeedPageDto, String> {
    let movies = state
        .catalog
        .popular(page)
        .await
        .map_err(AppError::from)
        .to_error_response()?;

    Ok(FeedPageDto::from_page(&movies, |id| state.favorites.is_favorite(id)))
}

/// One page of search results
pub async fn search_movies(
    state: &AppState,
    query: String,
    page: u32,
) -> Result<FeedPageDto, String> {
    let movies = state
        .catalog
        .search(&query, page)
        .await
        .map_err(AppError::from)
        .to_error_response()?;

    Ok(FeedPageDto::from_page(&movies, |id| state.favorites.is_favorite(id)))
}

pub async fn get_movie_detail(
    state: &AppState,
    movie_id: FavoriteId,
) -> Result<MovieDetailDto, String> {
    let movie = state
        .catalog
        .movie_detail(movie_id)
        .await
        .map_err(AppError::from)
        .to_error_response()?;

    Ok(MovieDetailDto::from_detail(
        &movie,
        state.favorites.is_favorite(movie_id),
    ))
}

// ============================================================================
// INFINITE FEED
// ============================================================================

/// Start a new feed for `query` (popular when blank) and load its first page.
pub async fn browse_feed(state: &AppState, query: Option<String>) -> Result<FeedDto, String> {
    state.feed.reset(query.as_deref());
    load_more(state).await
}

/// Append the next page to the current feed.
pub async fn load_more(state: &AppState) -> Result<FeedDto, String> {
    let outcome = state.feed.load_next().await.to_error_response()?;
    log::debug!("Feed load finished: {:?}", outcome);
    Ok(feed_dto(state))
}

/// Manual retry: restart the current feed from its first page.
pub async fn retry_feed(state: &AppState) -> Result<FeedDto, String> {
    match state.feed.reload().await.to_error_response()? {
        FeedOutcome::Stale => log::debug!("Feed retry overtaken by a reset"),
        outcome => log::debug!("Feed retry finished: {:?}", outcome),
    }
    Ok(feed_dto(state))
}

fn feed_dto(state: &AppState) -> FeedDto {
    let query = match state.feed.source() {
        FeedSource::Popular => None,
        FeedSource::Search(query) => Some(query),
    };

    FeedDto {
        query,
        movies: state
            .feed
            .items()
            .iter()
            .map(|m| MovieCardDto::from_summary(m, state.favorites.is_favorite(m.id)))
            .collect(),
        has_more: state.feed.has_more(),
        loading: state.feed.is_loading(),
        error: state.feed.error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovieDetail, MoviePage, MovieSummary};
    use crate::error::CatalogError;
    use crate::integrations::MockMovieCatalog;
    use crate::repositories::MemoryKeyValueRepository;
    use std::sync::Arc;

    fn summary(id: FavoriteId) -> MovieSummary {
        serde_json::from_value(serde_json::json!({ "id": id, "title": format!("Movie {}", id) }))
            .unwrap()
    }

    fn page(number: u32, ids: &[FavoriteId], total_pages: u32) -> MoviePage {
        MoviePage {
            page: number,
            results: ids.iter().copied().map(summary).collect(),
            total_pages,
            total_results: ids.len() as u32,
        }
    }

    fn state_with(catalog: MockMovieCatalog) -> AppState {
        AppState::new(
            Arc::new(MemoryKeyValueRepository::with_entry("movies-hub-favorites", "[2]")),
            Arc::new(catalog),
        )
    }

    #[tokio::test]
    async fn test_popular_marks_favorites() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_popular()
            .returning(|n| Ok(page(n, &[1, 2], 4)));
        let state = state_with(catalog);

        let dto = list_popular(&state, 1).await.unwrap();

        assert!(dto.has_more);
        assert_eq!(
            dto.movies.iter().map(|m| m.is_favorite).collect::<Vec<_>>(),
            vec![false, true]
        );
    }

    #[tokio::test]
    async fn test_search_failure_is_external_service() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .returning(|_, _| Err(CatalogError::Transport("offline".to_string())));
        let state = state_with(catalog);

        let error = search_movies(&state, "alien".to_string(), 1)
            .await
            .unwrap_err();

        assert!(error.contains("external_service"));
    }

    #[tokio::test]
    async fn test_detail_carries_favorite_flag() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_detail().returning(|id| {
            let detail: MovieDetail = serde_json::from_value(serde_json::json!({
                "id": id,
                "title": "Duna",
                "runtime": 155,
                "genres": [{"id": 878, "name": "Ficção científica"}],
            }))
            .unwrap();
            Ok(detail)
        });
        let state = state_with(catalog);

        let dto = get_movie_detail(&state, 2).await.unwrap();

        assert!(dto.is_favorite);
        assert_eq!(dto.runtime, Some(155));
        assert_eq!(dto.genres, vec!["Ficção científica".to_string()]);
    }

    #[tokio::test]
    async fn test_feed_accumulates_and_retries() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search().returning(|_, n| match n {
            1 => Ok(page(1, &[1, 2], 2)),
            _ => Ok(page(2, &[2, 3], 2)),
        });
        let state = state_with(catalog);

        let first = browse_feed(&state, Some("star".to_string())).await.unwrap();
        assert_eq!(first.query.as_deref(), Some("star"));
        assert!(first.has_more);

        let second = load_more(&state).await.unwrap();
        let ids: Vec<FavoriteId> = second.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!second.has_more);

        let retried = retry_feed(&state).await.unwrap();
        assert_eq!(retried.movies.len(), 2);
    }
}
