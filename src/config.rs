// src/config.rs
//
// Runtime configuration, read once from the environment at startup.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use log::{info, warn};

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "pt-BR";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the TMDB client.
#[derive(Debug, Clone, PartialEq)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Read access token, sent as a bearer header when present
    pub access_token: Option<String>,
    pub language: String,
    pub timeout: Duration,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = TmdbConfig::default();

        let tmdb = TmdbConfig {
            base_url: lookup("TMDB_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: secret(&lookup, "TMDB_API_KEY"),
            access_token: secret(&lookup, "TMDB_ACCESS_TOKEN"),
            language: lookup("TMDB_LANGUAGE").unwrap_or(defaults.language),
            timeout: Duration::from_secs(try_load(
                &lookup,
                "TMDB_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        };

        if tmdb.api_key.is_none() && tmdb.access_token.is_none() {
            warn!("Neither TMDB_API_KEY nor TMDB_ACCESS_TOKEN is set; catalog lookups will fail");
        }

        let data_dir = match lookup("MOVIEHUB_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        Ok(Self { tmdb, data_dir })
    }
}

fn default_data_dir() -> AppResult<PathBuf> {
    let dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?
        .join("moviehub");
    info!("MOVIEHUB_DATA_DIR not set, using default: {}", dir.display());
    Ok(dir)
}

fn secret<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Other(format!("Invalid {key} value '{raw}': {e}"))
        }),
    }
}
