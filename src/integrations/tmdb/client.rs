// src/integrations/tmdb/client.rs
//
// TMDB API Integration
//
// ARCHITECTURE:
// - REST client for the TMDB v3 API
// - Handles credentials, language and page bounds
// - Maps HTTP outcomes → CatalogError (NO retries)
// - Used through the MovieCatalog trait

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;

use crate::config::TmdbConfig;
use crate::domain::{FavoriteId, MovieDetail, MoviePage};
use crate::error::{AppError, AppResult, CatalogError};
use crate::integrations::catalog::MovieCatalog;

/// TMDB refuses pages above this number
pub const MAX_PAGE: u32 = 500;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_POSTER: &str = "/placeholder-poster.png";

/// Poster widths offered by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    #[default]
    W300,
    W500,
    W780,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W300 => "w300",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
        }
    }
}

/// Absolute image URL for a poster path, or the placeholder when the movie
/// has no poster.
pub fn poster_url(poster_path: Option<&str>, size: PosterSize) -> String {
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}{}", IMAGE_BASE_URL, size.as_str(), path),
        None => PLACEHOLDER_POSTER.to_string(),
    }
}

/// TMDB API Client
pub struct TmdbClient {
    config: TmdbConfig,
    http_client: Client,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn language(&self) -> &str {
        &self.config.language
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, CatalogError> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 2);
        if let Some(key) = &self.config.api_key {
            query.push(("api_key", key.clone()));
        }
        query.push(("language", self.config.language.clone()));
        query.extend(params.iter().cloned());

        Url::parse_with_params(&format!("{}{}", self.config.base_url, path), &query)
            .map_err(|e| CatalogError::Transport(format!("invalid TMDB URL: {}", e)))
    }

    async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        if self.config.api_key.is_none() && self.config.access_token.is_none() {
            return Err(CatalogError::MissingCredentials);
        }

        let url = self.endpoint_url(path, params)?;
        log::debug!("GET {}{}", self.config.base_url, path);

        let mut request = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("TMDB request to {} failed: {}", path, e);
            CatalogError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("TMDB returned status {} for {}", status, path);
            return Err(CatalogError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError> {
        if !(1..=MAX_PAGE).contains(&page) {
            return Ok(MoviePage::empty(page));
        }
        self.get_json("/movie/popular", &[("page", page.to_string())])
            .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        let query = query.trim();
        if query.is_empty() || !(1..=MAX_PAGE).contains(&page) {
            return Ok(MoviePage::empty(page));
        }
        self.get_json(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn movie_detail(&self, id: FavoriteId) -> Result<MovieDetail, CatalogError> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }
}
