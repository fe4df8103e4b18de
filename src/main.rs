//! # Playlist Curator CLI (`plc`)
//!
//! The `plc` binary manages which playlists are curated and runs curation
//! cycles.
//!
//! ## Usage
//!
//! ```bash
//! plc --config ./config/curator.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `plc add` | Register a playlist (existing id, or create one by name) |
//! | `plc list` | Show the stored playlist configurations |
//! | `plc update <id>` | Change retention, cap, or sources of a stored playlist |
//! | `plc curate` | Run one curation cycle over all stored playlists |
//!
//! ## Examples
//!
//! ```bash
//! # Track an existing playlist, refreshed from two communities
//! plc add --playlist-id 37i9dQZF --source listentothis --source indieheads
//!
//! # Create a new playlist on the catalog service and track it
//! plc add --playlist-name "Daily Finds" --retention-days 14 --source popheads
//!
//! # Keep tracks forever on one playlist
//! plc update 37i9dQZF --retention-days -1
//!
//! # See what a cycle would do without mutating anything
//! plc curate --dry-run
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use playlist_curator::{config, curate, store};

/// Playlist Curator — keeps streaming playlists fresh from community feeds.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/curator.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "plc",
    about = "Playlist Curator — keeps streaming playlists fresh from community feeds",
    version,
    long_about = "Playlist Curator removes tracks that have aged past a per-playlist retention \
    window and appends new tracks matched from the top posts of configured feed communities, \
    one capped batch per community per cycle."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/curator.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Register a playlist for curation.
    ///
    /// Provide exactly one of `--playlist-id` (an existing playlist on the
    /// catalog service) or `--playlist-name` (a new public playlist is
    /// created first; requires catalog credentials and `catalog.user`).
    Add {
        /// Id of an existing playlist on the catalog service.
        #[arg(long)]
        playlist_id: Option<String>,

        /// Name for a new playlist to create on the catalog service.
        #[arg(long)]
        playlist_name: Option<String>,

        /// Days a track may stay before removal; negative means never.
        #[arg(long, default_value_t = 7, allow_hyphen_values = true)]
        retention_days: i64,

        /// Maximum matched tracks appended per feed source per cycle.
        #[arg(long, default_value_t = 25)]
        result_cap: usize,

        /// Feed community to pull top posts from (repeatable, ordered).
        #[arg(long = "source", required = true)]
        sources: Vec<String>,
    },

    /// Show the stored playlist configurations.
    List,

    /// Change a stored playlist configuration.
    ///
    /// Only the provided options change; repeated `--source` flags replace
    /// the whole source list.
    Update {
        /// Id of the stored playlist to change.
        playlist_id: String,

        /// Days a track may stay before removal; negative means never.
        #[arg(long, allow_hyphen_values = true)]
        retention_days: Option<i64>,

        /// Maximum matched tracks appended per feed source per cycle.
        #[arg(long)]
        result_cap: Option<usize>,

        /// Replacement feed source list (repeatable, ordered).
        #[arg(long = "source")]
        sources: Vec<String>,
    },

    /// Run one curation cycle over all stored playlists.
    ///
    /// Playlists are processed in stored order; a failure in one playlist
    /// is reported and does not stop the others. Requires feed and catalog
    /// credentials in the environment.
    Curate {
        /// Compute removals and matches but issue no mutation calls.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Add {
            playlist_id,
            playlist_name,
            retention_days,
            result_cap,
            sources,
        } => {
            store::run_add(
                &cfg,
                playlist_id,
                playlist_name,
                retention_days,
                result_cap,
                sources,
            )
            .await?;
        }
        Commands::List => {
            store::run_list(&cfg)?;
        }
        Commands::Update {
            playlist_id,
            retention_days,
            result_cap,
            sources,
        } => {
            store::run_update(&cfg, &playlist_id, retention_days, result_cap, sources)?;
        }
        Commands::Curate { dry_run } => {
            curate::run_curate(&cfg, dry_run).await?;
        }
    }

    Ok(())
}
