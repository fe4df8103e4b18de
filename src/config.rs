use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub playlists: PlaylistStoreConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaylistStoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_feed_api_base")]
    pub api_base: String,
    #[serde(default = "default_feed_token_url")]
    pub token_url: String,
    /// Posts requested per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: default_feed_api_base(),
            token_url: default_feed_token_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_feed_api_base() -> String {
    "https://oauth.reddit.com".to_string()
}
fn default_feed_token_url() -> String {
    "https://www.reddit.com/api/v1/access_token".to_string()
}
fn default_page_size() -> u32 {
    100
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_api_base")]
    pub api_base: String,
    #[serde(default = "default_catalog_token_url")]
    pub token_url: String,
    /// Catalog account that owns created playlists. Only required by
    /// `plc add --playlist-name`.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: default_catalog_api_base(),
            token_url: default_catalog_token_url(),
            user: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_catalog_api_base() -> String {
    "https://api.spotify.com/v1".to_string()
}
fn default_catalog_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Host markers that qualify a post URL as a plausible song link.
    /// Matched as case-sensitive substrings of the whole URL.
    #[serde(default = "default_link_hosts")]
    pub link_hosts: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            link_hosts: default_link_hosts(),
        }
    }
}

fn default_link_hosts() -> Vec<String> {
    ["youtube", "youtu.be", "spotify", "bandcamp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.feed.page_size == 0 {
        anyhow::bail!("feed.page_size must be > 0");
    }
    if config.feed.timeout_secs == 0 || config.catalog.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be > 0");
    }
    if config.matching.link_hosts.is_empty() {
        anyhow::bail!("matching.link_hosts must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [playlists]
            path = "./playlists.toml"
            "#,
        )
        .unwrap();

        assert_eq!(config.feed.page_size, 100);
        assert_eq!(config.catalog.api_base, "https://api.spotify.com/v1");
        assert!(config.matching.link_hosts.contains(&"youtu.be".to_string()));
        assert!(config.catalog.user.is_none());
    }

    #[test]
    fn test_link_hosts_override() {
        let config: Config = toml::from_str(
            r#"
            [playlists]
            path = "./playlists.toml"

            [matching]
            link_hosts = ["soundcloud"]
            "#,
        )
        .unwrap();

        assert_eq!(config.matching.link_hosts, vec!["soundcloud".to_string()]);
    }
}
