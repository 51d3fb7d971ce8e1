// src/main.rs
//
// moviehub CLI

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use moviehub::application::commands::*;
use moviehub::application::{highlight, AppState, FeedPageDto, MovieCardDto};
use moviehub::config::AppConfig;
use moviehub::db::{
    create_connection_pool, get_connection, initialize_database, verify_database_integrity,
};
use moviehub::domain::{FavoriteId, SortMode};
use moviehub::integrations::{MovieCatalog, TmdbClient};
use moviehub::repositories::{KeyValueRepository, SqliteKeyValueRepository};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One page of popular movies
    Popular {
        #[arg(default_value_t = 1)]
        page: u32,
    },
    /// One page of search results
    Search {
        query: String,
        #[arg(default_value_t = 1)]
        page: u32,
    },
    /// Accumulate several pages of popular movies or search results
    Browse {
        query: Option<String>,
        #[arg(long, default_value_t = 2)]
        pages: u32,
    },
    /// Full details of one movie
    Movie { id: FavoriteId },
    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FavCommand {
    Add { id: FavoriteId },
    Remove { id: FavoriteId },
    Toggle { id: FavoriteId },
    Clear,
    /// List favorites with their details
    List {
        /// title-asc, title-desc, rating-asc or rating-desc
        sort: Option<SortMode>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // 1. CONFIGURATION
    let config = AppConfig::load().context("loading configuration")?;

    // 2. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool(&config.data_dir)?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }

    // 3. CAPABILITIES
    let storage: Arc<dyn KeyValueRepository> = Arc::new(SqliteKeyValueRepository::new(pool));
    let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::new(config.tmdb)?);

    // 4. APPLICATION STATE
    let state = AppState::new(storage, catalog);

    run(&state, args.command).await
}

async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Popular { page } => {
            let dto = list_popular(state, page).await.map_err(command_error)?;
            print_page(&dto, None);
        }
        Command::Search { query, page } => {
            let dto = search_movies(state, query.clone(), page)
                .await
                .map_err(command_error)?;
            print_page(&dto, Some(&query));
        }
        Command::Browse { query, pages } => {
            let mut feed = browse_feed(state, query).await.map_err(command_error)?;
            for _ in 1..pages {
                if !feed.has_more {
                    break;
                }
                feed = load_more(state).await.map_err(command_error)?;
            }
            for movie in &feed.movies {
                print_card(movie, feed.query.as_deref());
            }
            println!("{} movies, more available: {}", feed.movies.len(), feed.has_more);
        }
        Command::Movie { id } => {
            let dto = get_movie_detail(state, id).await.map_err(command_error)?;
            println!("{}", serde_json::to_string_pretty(&dto)?);
        }
        Command::Fav { action } => run_favorites(state, action).await?,
    }

    Ok(())
}

async fn run_favorites(state: &AppState, action: FavCommand) -> Result<()> {
    match action {
        FavCommand::Add { id } => add_favorite(state, id).await.map_err(command_error)?,
        FavCommand::Remove { id } => remove_favorite(state, id).await.map_err(command_error)?,
        FavCommand::Toggle { id } => {
            let now = toggle_favorite(state, id).await.map_err(command_error)?;
            println!("{}", if now { "added" } else { "removed" });
        }
        FavCommand::Clear => clear_favorites(state).await.map_err(command_error)?,
        FavCommand::List { sort } => {
            let listing = load_favorites_listing(state, sort.map(|mode| mode.to_string()))
                .await
                .map_err(command_error)?;
            for movie in &listing.movies {
                print_card(movie, None);
            }
            println!("{} favorites ({})", listing.count, listing.sort);
        }
    }
    Ok(())
}

fn print_page(page: &FeedPageDto, query: Option<&str>) {
    for movie in &page.movies {
        print_card(movie, query);
    }
    println!(
        "page {}/{} ({} results)",
        page.page, page.total_pages, page.total_results
    );
}

fn print_card(movie: &MovieCardDto, query: Option<&str>) {
    let title: String = highlight(&movie.title, query.unwrap_or_default())
        .into_iter()
        .map(|segment| {
            if segment.matched {
                format!("*{}*", segment.text)
            } else {
                segment.text
            }
        })
        .collect();
    let year = movie
        .release_year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let marker = if movie.is_favorite { "♥" } else { " " };

    println!("{} {:>8}  {}{}  {:.1}", marker, movie.id, title, year, movie.rating);
}

fn command_error(message: String) -> anyhow::Error {
    anyhow!(message)
}
