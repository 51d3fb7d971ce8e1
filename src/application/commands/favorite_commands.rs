// src/application/commands/favorite_commands.rs
//
// Favorite Command Handlers
//
// RULES:
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::error_handling::ToErrorResponse;
use crate::application::{dto::*, state::AppState};
use crate::domain::{FavoriteId, SortMode};
use crate::error::AppError;
use crate::services::LoadOutcome;

/// Flip a movie's favorite status. Returns the new status.
pub async fn toggle_favorite(state: &AppState, movie_id: FavoriteId) -> Result<bool, String> {
    Ok(state.favorites.toggle(movie_id))
}

pub async fn add_favorite(state: &AppState, movie_id: FavoriteId) -> Result<(), String> {
    state.favorites.add(movie_id);
    Ok(())
}

pub async fn remove_favorite(state: &AppState, movie_id: FavoriteId) -> Result<(), String> {
    state.favorites.remove(movie_id);
    Ok(())
}

pub async fn clear_favorites(state: &AppState) -> Result<(), String> {
    state.favorites.clear();
    Ok(())
}

pub async fn is_favorite(state: &AppState, movie_id: FavoriteId) -> Result<bool, String> {
    Ok(state.favorites.is_favorite(movie_id))
}

/// Favorite ids in ascending order
pub async fn list_favorite_ids(state: &AppState) -> Result<Vec<FavoriteId>, String> {
    Ok(state.favorites.ids())
}

/// Show the favorites page, fetching details only when the favorites
/// changed since the last load.
pub async fn load_favorites_listing(
    state: &AppState,
    sort: Option<String>,
) -> Result<FavoritesListingDto, String> {
    if let Some(sort) = sort {
        let mode = sort
            .parse::<SortMode>()
            .map_err(AppError::from)
            .to_error_response()?;
        state.projection.set_sort(mode);
    }

    let outcome = state.projection.refresh_if_changed().await.to_error_response()?;
    Ok(listing_dto(state, outcome))
}

/// Manual retry after a failed load.
pub async fn retry_favorites_listing(state: &AppState) -> Result<FavoritesListingDto, String> {
    let outcome = state.projection.retry().await.to_error_response()?;
    Ok(listing_dto(state, outcome))
}

fn listing_dto(state: &AppState, outcome: LoadOutcome) -> FavoritesListingDto {
    if let LoadOutcome::Superseded = outcome {
        log::debug!("Favorites listing superseded by a newer load");
    }
    FavoritesListingDto::from_state(&state.projection.view(), state.projection.sort_mode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieDetail;
    use crate::error::CatalogError;
    use crate::integrations::MockMovieCatalog;
    use crate::repositories::MemoryKeyValueRepository;
    use std::sync::Arc;

    fn detail(id: FavoriteId, title: &str, rating: f64) -> MovieDetail {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "vote_average": rating,
        }))
        .unwrap()
    }

    fn state_with(blob: &str, catalog: MockMovieCatalog) -> AppState {
        AppState::new(
            Arc::new(MemoryKeyValueRepository::with_entry("movies-hub-favorites", blob)),
            Arc::new(catalog),
        )
    }

    #[tokio::test]
    async fn test_toggle_and_query() {
        let state = state_with("[]", MockMovieCatalog::new());

        assert!(toggle_favorite(&state, 42).await.unwrap());
        assert!(is_favorite(&state, 42).await.unwrap());
        add_favorite(&state, 7).await.unwrap();
        assert_eq!(list_favorite_ids(&state).await.unwrap(), vec![7, 42]);

        remove_favorite(&state, 42).await.unwrap();
        clear_favorites(&state).await.unwrap();
        assert!(list_favorite_ids(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_sorted_by_rating() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_movie_detail().returning(|id| match id {
            1 => Ok(detail(1, "Low", 3.0)),
            _ => Ok(detail(id, "High", 9.0)),
        });
        let state = state_with("[1,2]", catalog);

        let listing = load_favorites_listing(&state, Some("rating-desc".to_string()))
            .await
            .unwrap();

        assert_eq!(listing.state, "ready");
        assert_eq!(listing.sort, SortMode::RatingDesc);
        let ids: Vec<FavoriteId> = listing.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(listing.movies.iter().all(|m| m.is_favorite));
    }

    #[tokio::test]
    async fn test_unknown_sort_is_rejected() {
        let state = state_with("[]", MockMovieCatalog::new());

        let error = load_favorites_listing(&state, Some("by-color".to_string()))
            .await
            .unwrap_err();

        assert!(error.contains("domain_error"));
    }

    #[tokio::test]
    async fn test_remote_failure_maps_to_external_service() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_movie_detail()
            .returning(|_| Err(CatalogError::Status(500)));
        let state = state_with("[10]", catalog);

        let error = load_favorites_listing(&state, None).await.unwrap_err();

        assert!(error.contains("external_service"));
        let error = retry_favorites_listing(&state).await.unwrap_err();
        assert!(error.contains("external_service"));
    }
}
