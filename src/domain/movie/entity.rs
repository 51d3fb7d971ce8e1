use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::FavoriteId;

/// Common view over summary and detail records.
pub trait MovieRecord {
    fn id(&self) -> FavoriteId;
    fn title(&self) -> &str;
    fn rating(&self) -> f64;
}

/// A movie as it appears in list and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: FavoriteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// `YYYY-MM-DD`, empty when the provider does not know it.
    #[serde(default)]
    pub release_date: String,
    /// Average rating on a 0-10 scale.
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub video: bool,
}

impl MovieSummary {
    /// Release year parsed from `release_date`.
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}

impl MovieRecord for MovieSummary {
    fn id(&self) -> FavoriteId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn rating(&self) -> f64 {
        self.vote_average
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Full record for a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl MovieDetail {
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

impl MovieRecord for MovieDetail {
    fn id(&self) -> FavoriteId {
        self.summary.id
    }

    fn title(&self) -> &str {
        &self.summary.title
    }

    fn rating(&self) -> f64 {
        self.summary.vote_average
    }
}

/// One page of a paginated listing. Pages are 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl MoviePage {
    /// A valid page with no results, used for out-of-range requests.
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
