//! Playlist configuration store.
//!
//! The store is a TOML file of `[[playlist]]` entries at the path named by
//! `[playlists].path` in the application config. It is read once per cycle
//! and rewritten whole on every change; nothing else persists between runs.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog_spotify::SpotifyCatalog;
use crate::config::Config;
use crate::models::PlaylistConfig;
use crate::services::CatalogService;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PlaylistStore {
    #[serde(default, rename = "playlist")]
    pub playlists: Vec<PlaylistConfig>,
}

impl PlaylistStore {
    /// Load the store from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read playlist file: {}", path.display()))?;

        let store: Self =
            toml::from_str(&content).with_context(|| "Failed to parse playlist file")?;

        Ok(store)
    }

    /// Load the store, treating a missing file as an empty store.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the store back to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write playlist file: {}", path.display()))?;
        Ok(())
    }

    pub fn contains(&self, playlist_id: &str) -> bool {
        self.playlists.iter().any(|p| p.id == playlist_id)
    }

    /// Add a new configuration. Ids are unique within a store.
    pub fn add(&mut self, config: PlaylistConfig) -> Result<()> {
        if self.contains(&config.id) {
            bail!("Store already contains playlist id {}", config.id);
        }
        validate_entry(&config)?;
        self.playlists.push(config);
        Ok(())
    }

    /// Partially update an existing configuration.
    pub fn update(
        &mut self,
        playlist_id: &str,
        retention_days: Option<i64>,
        result_cap: Option<usize>,
        feed_sources: Option<Vec<String>>,
    ) -> Result<()> {
        let entry = self
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| anyhow::anyhow!("Store does not contain playlist id {}", playlist_id))?;

        if let Some(days) = retention_days {
            entry.retention_days = days;
        }
        if let Some(cap) = result_cap {
            entry.result_cap = cap;
        }
        if let Some(sources) = feed_sources {
            entry.feed_sources = sources;
        }

        validate_entry(entry)
    }
}

fn validate_entry(config: &PlaylistConfig) -> Result<()> {
    if config.id.is_empty() {
        bail!("Playlist id must not be empty");
    }
    if config.result_cap == 0 {
        bail!("result_cap must be > 0");
    }
    if config.feed_sources.is_empty() {
        bail!("At least one feed source is required");
    }
    Ok(())
}

/// `plc add` — register a playlist for curation.
///
/// With `--playlist-id`, the playlist must already exist on the catalog
/// service and must not already be stored. With `--playlist-name`, a new
/// public playlist is created via the catalog service first.
pub async fn run_add(
    config: &Config,
    playlist_id: Option<String>,
    playlist_name: Option<String>,
    retention_days: i64,
    result_cap: usize,
    sources: Vec<String>,
) -> Result<()> {
    let mut store = PlaylistStore::load_or_default(&config.playlists.path)?;

    let id = match (playlist_id, playlist_name) {
        (Some(id), None) => {
            if store.contains(&id) {
                bail!("Store already contains playlist id {}", id);
            }
            id
        }
        (None, Some(name)) => {
            let catalog = SpotifyCatalog::connect(&config.catalog).await?;
            let id = catalog.create_playlist(&name).await?;
            println!("created playlist {:?} ({})", name, id);
            id
        }
        _ => bail!("Specify exactly one of --playlist-id or --playlist-name"),
    };

    store.add(PlaylistConfig {
        id: id.clone(),
        retention_days,
        result_cap,
        feed_sources: sources,
    })?;
    store.save(&config.playlists.path)?;

    println!("added playlist {}", id);
    Ok(())
}

/// `plc list` — print the stored configurations.
pub fn run_list(config: &Config) -> Result<()> {
    let store = PlaylistStore::load(&config.playlists.path)?;

    println!(
        "{:<28} {:>6} {:>10}  SOURCES",
        "PLAYLIST", "CAP", "RETENTION"
    );
    for playlist in &store.playlists {
        let retention = if playlist.retention_days < 0 {
            "never".to_string()
        } else {
            format!("{}d", playlist.retention_days)
        };
        println!(
            "{:<28} {:>6} {:>10}  {}",
            playlist.id,
            playlist.result_cap,
            retention,
            playlist.feed_sources.join(", ")
        );
    }

    Ok(())
}

/// `plc update` — change a stored configuration.
pub fn run_update(
    config: &Config,
    playlist_id: &str,
    retention_days: Option<i64>,
    result_cap: Option<usize>,
    sources: Vec<String>,
) -> Result<()> {
    let mut store = PlaylistStore::load(&config.playlists.path)?;

    let sources = if sources.is_empty() {
        None
    } else {
        Some(sources)
    };
    store.update(playlist_id, retention_days, result_cap, sources)?;
    store.save(&config.playlists.path)?;

    println!("updated playlist {}", playlist_id);
    Ok(())
}
