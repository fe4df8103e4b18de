//! Spotify catalog adapter.
//!
//! Implements [`CatalogService`] against the Spotify Web API using the
//! refresh-token grant (playlist mutation needs a user-scoped token).
//!
//! # Environment Variables
//!
//! - `SPOTIFY_CLIENT_ID` — required
//! - `SPOTIFY_CLIENT_SECRET` — required
//! - `SPOTIFY_REFRESH_TOKEN` — required, issued with the
//!   `playlist-modify-public` scope
//!
//! # Pagination
//!
//! Playlist listings use the API's `next` URL verbatim as the continuation
//! token; the engine treats it as opaque.
//!
//! # Batching
//!
//! The API accepts at most 100 track ids per mutation request. One logical
//! removal or append is submitted as as many chunked requests as needed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::CatalogConfig;
use crate::http::send_json;
use crate::models::{CatalogTrack, TrackEntry, TrackPage};
use crate::services::CatalogService;

/// Maximum track ids per mutation request (API limit).
const MUTATION_BATCH: usize = 100;

/// Tracks requested per search; only the first result is consumed, but the
/// API minimum page is worth keeping for diagnostics.
const SEARCH_LIMIT: u32 = 20;

/// Entries requested per playlist listing page.
const LISTING_PAGE: u32 = 100;

/// Spotify credentials loaded from environment variables.
struct SpotifyCredentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl SpotifyCredentials {
    fn from_env() -> Result<Self> {
        let client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .context("SPOTIFY_CLIENT_ID environment variable not set")?;
        let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .context("SPOTIFY_CLIENT_SECRET environment variable not set")?;
        let refresh_token = std::env::var("SPOTIFY_REFRESH_TOKEN")
            .context("SPOTIFY_REFRESH_TOKEN environment variable not set")?;

        Ok(Self {
            client_id,
            client_secret,
            refresh_token,
        })
    }
}

/// A connected Spotify client implementing [`CatalogService`].
pub struct SpotifyCatalog {
    client: reqwest::Client,
    api_base: String,
    max_retries: u32,
    token: String,
    user: Option<String>,
}

impl SpotifyCatalog {
    /// Read credentials from the environment and exchange the refresh token
    /// for an access token.
    pub async fn connect(config: &CatalogConfig) -> Result<Self> {
        let creds = SpotifyCredentials::from_env()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let request = client
            .post(&config.token_url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", creds.refresh_token.as_str()),
            ]);

        let json = send_json(request, config.max_retries)
            .await
            .context("Spotify token request failed")?;

        let token = json
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                anyhow::anyhow!("Invalid Spotify token response: missing access_token")
            })?
            .to_string();

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            max_retries: config.max_retries,
            token,
            user: config.user.clone(),
        })
    }
}

#[async_trait]
impl CatalogService for SpotifyCatalog {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        let limit = SEARCH_LIMIT.to_string();
        let request = self
            .client
            .get(format!("{}/search", self.api_base))
            .bearer_auth(&self.token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())]);

        let json = send_json(request, self.max_retries)
            .await
            .with_context(|| format!("Track search failed for {:?}", query))?;

        parse_search(&json)
    }

    async fn playlist_tracks(&self, playlist_id: &str, page: Option<&str>) -> Result<TrackPage> {
        // The continuation token is the API's `next` URL; the first page is
        // built here.
        let url = match page {
            Some(next) => next.to_string(),
            None => format!(
                "{}/playlists/{}/tracks?fields=items(added_at,track(id)),next&limit={}",
                self.api_base, playlist_id, LISTING_PAGE
            ),
        };

        let request = self.client.get(&url).bearer_auth(&self.token);

        let json = send_json(request, self.max_retries)
            .await
            .with_context(|| format!("Failed to list tracks of playlist {}", playlist_id))?;

        parse_track_page(&json)
    }

    async fn remove_tracks(&self, playlist_id: &str, track_ids: &BTreeSet<String>) -> Result<()> {
        let ids: Vec<&String> = track_ids.iter().collect();
        for chunk in ids.chunks(MUTATION_BATCH) {
            let tracks: Vec<serde_json::Value> = chunk
                .iter()
                .map(|id| serde_json::json!({ "uri": format!("spotify:track:{}", id) }))
                .collect();

            let request = self
                .client
                .delete(format!("{}/playlists/{}/tracks", self.api_base, playlist_id))
                .bearer_auth(&self.token)
                .json(&serde_json::json!({ "tracks": tracks }));

            send_json(request, self.max_retries)
                .await
                .with_context(|| format!("Failed to remove tracks from playlist {}", playlist_id))?;
        }

        Ok(())
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        for chunk in track_ids.chunks(MUTATION_BATCH) {
            let uris: Vec<String> = chunk
                .iter()
                .map(|id| format!("spotify:track:{}", id))
                .collect();

            let request = self
                .client
                .post(format!("{}/playlists/{}/tracks", self.api_base, playlist_id))
                .bearer_auth(&self.token)
                .json(&serde_json::json!({ "uris": uris }));

            send_json(request, self.max_retries)
                .await
                .with_context(|| format!("Failed to append tracks to playlist {}", playlist_id))?;
        }

        Ok(())
    }

    async fn create_playlist(&self, name: &str) -> Result<String> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("catalog.user required to create playlists"))?;

        let request = self
            .client
            .post(format!("{}/users/{}/playlists", self.api_base, user))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "name": name, "public": true }));

        let json = send_json(request, self.max_retries)
            .await
            .with_context(|| format!("Failed to create playlist {:?}", name))?;

        json.get("id")
            .and_then(|id| id.as_str())
            .map(|id| id.to_string())
            .ok_or_else(|| anyhow::anyhow!("Invalid create-playlist response: missing id"))
    }
}

/// Parse a search response into ranked [`CatalogTrack`]s.
fn parse_search(json: &serde_json::Value) -> Result<Vec<CatalogTrack>> {
    let items = json
        .get("tracks")
        .and_then(|t| t.get("items"))
        .and_then(|i| i.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid search response: missing tracks.items"))?;

    let tracks = items
        .iter()
        .filter_map(|item| item.get("id").and_then(|id| id.as_str()))
        .map(|id| CatalogTrack { id: id.to_string() })
        .collect();

    Ok(tracks)
}

/// Parse one playlist listing page into a [`TrackPage`].
///
/// Entries without a track id (local tracks) or without a parseable
/// `added_at` are skipped.
fn parse_track_page(json: &serde_json::Value) -> Result<TrackPage> {
    let items = json
        .get("items")
        .and_then(|i| i.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid playlist listing: missing items"))?;

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let track_id = item
            .get("track")
            .and_then(|t| t.get("id"))
            .and_then(|id| id.as_str());
        let added_at = item
            .get("added_at")
            .and_then(|a| a.as_str())
            .and_then(|a| DateTime::parse_from_rfc3339(a).ok())
            .map(|a| a.with_timezone(&Utc));

        if let (Some(track_id), Some(added_at)) = (track_id, added_at) {
            entries.push(TrackEntry {
                track_id: track_id.to_string(),
                added_at,
            });
        }
    }

    let next = json
        .get("next")
        .and_then(|n| n.as_str())
        .map(|n| n.to_string());

    Ok(TrackPage { entries, next })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_ranked_order() {
        let json = serde_json::json!({
            "tracks": {
                "items": [
                    { "id": "first", "name": "A" },
                    { "id": "second", "name": "B" }
                ]
            }
        });

        let tracks = parse_search(&json).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "first");
    }

    #[test]
    fn test_parse_search_empty() {
        let json = serde_json::json!({ "tracks": { "items": [] } });
        assert!(parse_search(&json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_skips_null_ids() {
        // Local tracks come back with a null id.
        let json = serde_json::json!({
            "tracks": {
                "items": [
                    { "id": null },
                    { "id": "real" }
                ]
            }
        });

        let tracks = parse_search(&json).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "real");
    }

    #[test]
    fn test_parse_track_page() {
        let json = serde_json::json!({
            "items": [
                { "added_at": "2026-07-20T12:00:00Z", "track": { "id": "a" } },
                { "added_at": "2026-08-01T09:30:00Z", "track": { "id": "b" } }
            ],
            "next": "https://api.spotify.com/v1/playlists/p/tracks?offset=100"
        });

        let page = parse_track_page(&json).unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].track_id, "a");
        assert_eq!(
            page.entries[1].added_at,
            DateTime::parse_from_rfc3339("2026-08-01T09:30:00Z").unwrap()
        );
        assert!(page.next.is_some());
    }

    #[test]
    fn test_parse_track_page_last_page() {
        let json = serde_json::json!({ "items": [], "next": null });
        let page = parse_track_page(&json).unwrap();
        assert!(page.entries.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn test_parse_track_page_skips_local_tracks() {
        let json = serde_json::json!({
            "items": [
                { "added_at": "2026-07-20T12:00:00Z", "track": { "id": null } },
                { "added_at": "2026-07-21T12:00:00Z", "track": { "id": "kept" } }
            ],
            "next": null
        });

        let page = parse_track_page(&json).unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].track_id, "kept");
    }
}
