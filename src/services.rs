//! Capability contracts for the remote feed and catalog services.
//!
//! The curation engine never talks to a remote service directly; it is
//! driven through these two traits. The production adapters are
//! [`crate::feed_reddit::RedditFeed`] and
//! [`crate::catalog_spotify::SpotifyCatalog`]; tests substitute in-memory
//! implementations.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::models::{CatalogTrack, FeedPage, TrackPage};

/// A social-feed service that ranks community posts.
#[async_trait]
pub trait FeedService: Send + Sync {
    /// Fetch one page of `source`'s top posts for the current day, in
    /// descending rank order.
    ///
    /// `after` is the continuation token from the previous page; `None`
    /// requests the first page. The returned page's `after` is `None` once
    /// the listing is exhausted. Callers stop fetching early when they have
    /// collected enough posts.
    async fn top_posts(&self, source: &str, after: Option<&str>) -> Result<FeedPage>;
}

/// The music-streaming backend providing search and playlist mutation.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Search the track category. Results are in the service's relevance
    /// order and may be empty.
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>>;

    /// Fetch one page of a playlist's track listing.
    ///
    /// `page` is the continuation token from the previous page; `None`
    /// requests the first page.
    async fn playlist_tracks(&self, playlist_id: &str, page: Option<&str>) -> Result<TrackPage>;

    /// Remove every occurrence of each listed id from the playlist.
    /// Removing an absent id is a no-op.
    async fn remove_tracks(&self, playlist_id: &str, track_ids: &BTreeSet<String>) -> Result<()>;

    /// Append tracks in order. Not idempotent: re-appending duplicates.
    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Create a new public playlist and return its id.
    async fn create_playlist(&self, name: &str) -> Result<String>;
}
