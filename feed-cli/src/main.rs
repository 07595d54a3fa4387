//! # gallery
//!
//! CLI for browsing a remote image collection with offline fallback.
//!
//! ## Commands
//!
//! - `refresh`: Load the first page
//! - `browse`: Load several pages
//! - `favorite`: Add, remove, toggle, check or list favorites
//! - `cache`: Show or clear the offline snapshot
//! - `status`: Show connectivity and local data
//!
//! ## Example
//!
//! ```bash
//! # Load the first page (and cache it)
//! gallery refresh --sort name --desc
//!
//! # Load three pages
//! gallery browse --pages 3
//!
//! # Only images mentioning "sunset"
//! gallery browse --pages 3 --search sunset
//!
//! # Later, without network: served from the cache
//! gallery --offline refresh
//!
//! # Favorites
//! gallery favorite add 123456
//! gallery favorite list
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feed_types::{ImageId, SortField};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{cache, favorite, refresh, status, AppContext};
use config::{AppConfig, CONFIG_FILE};

/// CLI for browsing a gallery feed.
#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the cached snapshot, favorites and config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/gallery.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat the network as unreachable
    #[arg(long, global = true)]
    offline: bool,

    /// Verbose logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the first page
    Refresh {
        /// Sort field: capture, upload or name
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Only show images whose caption, author, note or name contains this
        #[arg(long)]
        search: Option<String>,
    },

    /// Load several pages
    Browse {
        /// Number of pages to load
        #[arg(long, default_value = "2")]
        pages: u32,

        /// Sort field: capture, upload or name
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Only show images whose caption, author, note or name contains this
        #[arg(long)]
        search: Option<String>,
    },

    /// Manage favorites
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Inspect the offline snapshot
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show connectivity and local data
    Status,
}

#[derive(Subcommand, Debug)]
enum FavoriteAction {
    /// Mark an image as favorite
    Add {
        /// Image id
        id: ImageId,
    },
    /// Unmark an image
    Remove {
        /// Image id
        id: ImageId,
    },
    /// Flip an image's favorite state
    Toggle {
        /// Image id
        id: ImageId,
    },
    /// Check whether an image is a favorite
    Check {
        /// Image id
        id: ImageId,
    },
    /// List favorites
    List,
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Show the cached snapshot
    Show,
    /// Delete the cached snapshot
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    let config_path = cli.config.unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let config = AppConfig::load_or_default(&config_path)?;
    debug!(
        data_dir = %data_dir.display(),
        config = %config_path.display(),
        offline = cli.offline,
        "starting"
    );
    let ctx = AppContext::new(&data_dir, config, cli.offline);

    match cli.command {
        Commands::Refresh { sort, desc, search } => {
            let sort = ctx.config.sort_override(sort, desc);
            refresh::run(&ctx, sort, search.as_deref()).await?;
        }
        Commands::Browse {
            pages,
            sort,
            desc,
            search,
        } => {
            let sort = ctx.config.sort_override(sort, desc);
            refresh::browse(&ctx, pages.max(1), sort, search.as_deref()).await?;
        }
        Commands::Favorite { action } => match action {
            FavoriteAction::Add { id } => favorite::add(&ctx, id).await?,
            FavoriteAction::Remove { id } => favorite::remove(&ctx, id).await?,
            FavoriteAction::Toggle { id } => favorite::toggle(&ctx, id).await?,
            FavoriteAction::Check { id } => favorite::check(&ctx, id).await?,
            FavoriteAction::List => favorite::list(&ctx).await?,
        },
        Commands::Cache { action } => match action {
            CacheAction::Show => cache::show(&ctx).await?,
            CacheAction::Clear => cache::clear(&ctx).await?,
        },
        Commands::Status => {
            status::run(&ctx).await?;
        }
    }

    Ok(())
}

/// Log to stderr so command output stays clean.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Get the default data directory for gallery.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "ydun", "gallery")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
