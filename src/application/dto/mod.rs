// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::domain::{FavoriteId, MovieDetail, MoviePage, MovieSummary, SortMode};
use crate::integrations::{poster_url, PosterSize};
use crate::services::ListingState;

// ============================================================================
// MOVIE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCardDto {
    pub id: FavoriteId,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub release_year: Option<i32>,
    pub rating: f64,
    pub is_favorite: bool,
}

impl MovieCardDto {
    pub fn from_summary(movie: &MovieSummary, is_favorite: bool) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            poster_url: poster_url(movie.poster_path.as_deref(), PosterSize::W500),
            release_year: movie.release_year(),
            rating: movie.vote_average,
            is_favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetailDto {
    pub id: FavoriteId,
    pub title: String,
    pub original_title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster_url: String,
    pub release_date: String,
    pub release_year: Option<i32>,
    /// Minutes.
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub rating: f64,
    pub vote_count: u64,
    pub status: Option<String>,
    pub is_favorite: bool,
}

impl MovieDetailDto {
    pub fn from_detail(movie: &MovieDetail, is_favorite: bool) -> Self {
        let summary = &movie.summary;
        Self {
            id: summary.id,
            title: summary.title.clone(),
            original_title: summary.original_title.clone(),
            tagline: movie.tagline.clone().filter(|t| !t.is_empty()),
            overview: summary.overview.clone(),
            poster_url: poster_url(summary.poster_path.as_deref(), PosterSize::W780),
            release_date: summary.release_date.clone(),
            release_year: summary.release_year(),
            runtime: movie.runtime,
            genres: movie.genre_names().into_iter().map(str::to_string).collect(),
            rating: summary.vote_average,
            vote_count: summary.vote_count,
            status: movie.status.clone(),
            is_favorite,
        }
    }
}

// ============================================================================
// LISTING DTOs
// ============================================================================

/// The favorites page: state name, sort, and the cards when ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesListingDto {
    /// `idle`, `loading`, `ready` or `failed`
    pub state: String,
    pub sort: SortMode,
    pub count: usize,
    pub movies: Vec<MovieCardDto>,
    pub error: Option<String>,
}

impl FavoritesListingDto {
    /// Every movie in a favorites listing is a favorite.
    pub fn from_state(listing: &ListingState, sort: SortMode) -> Self {
        let (movies, error) = match listing {
            ListingState::Ready { movies } => (
                movies
                    .iter()
                    .map(|m| MovieCardDto::from_summary(&m.summary, true))
                    .collect::<Vec<_>>(),
                None,
            ),
            ListingState::Failed { message } => (Vec::new(), Some(message.clone())),
            ListingState::Idle | ListingState::Loading => (Vec::new(), None),
        };

        Self {
            state: listing.name().to_string(),
            sort,
            count: movies.len(),
            movies,
            error,
        }
    }
}

/// A single catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPageDto {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub has_more: bool,
    pub movies: Vec<MovieCardDto>,
}

impl FeedPageDto {
    pub fn from_page<F>(page: &MoviePage, is_favorite: F) -> Self
    where
        F: Fn(FavoriteId) -> bool,
    {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            has_more: page.has_next(),
            movies: page
                .results
                .iter()
                .map(|m| MovieCardDto::from_summary(m, is_favorite(m.id)))
                .collect(),
        }
    }
}

/// Everything the feed has accumulated so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedDto {
    /// `None` while browsing popular movies
    pub query: Option<String>,
    pub movies: Vec<MovieCardDto>,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<String>,
}

// ============================================================================
// RESPONSE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(poster: Option<&str>) -> MovieSummary {
        serde_json::from_value(serde_json::json!({
            "id": 27205,
            "title": "A Origem",
            "poster_path": poster,
            "release_date": "2010-07-15",
            "vote_average": 8.4,
        }))
        .unwrap()
    }

    #[test]
    fn test_card_builds_poster_url_and_year() {
        let card = MovieCardDto::from_summary(&summary(Some("/abc.jpg")), true);
        assert_eq!(card.poster_url, "https://image.tmdb.org/t/p/w500/abc.jpg");
        assert_eq!(card.release_year, Some(2010));
        assert!(card.is_favorite);
    }

    #[test]
    fn test_card_without_poster_uses_placeholder() {
        let card = MovieCardDto::from_summary(&summary(None), false);
        assert_eq!(card.poster_url, "/placeholder-poster.png");
    }

    #[test]
    fn test_failed_listing_carries_message() {
        let listing = ListingState::Failed {
            message: "boom".to_string(),
        };
        let dto = FavoritesListingDto::from_state(&listing, SortMode::RatingDesc);
        assert_eq!(dto.state, "failed");
        assert_eq!(dto.error.as_deref(), Some("boom"));
        assert_eq!(dto.count, 0);
    }

    #[test]
    fn test_feed_page_marks_favorites() {
        let page = MoviePage {
            page: 1,
            results: vec![summary(None)],
            total_pages: 3,
            total_results: 60,
        };
        let dto = FeedPageDto::from_page(&page, |id| id == 27205);
        assert!(dto.has_more);
        assert!(dto.movies[0].is_favorite);
    }
}
