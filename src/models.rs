//! Core data models used throughout the curator.
//!
//! These types represent the playlist configurations, feed posts, and catalog
//! entries that flow through a curation cycle, plus the per-playlist reports
//! produced at the end of one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One curated playlist's settings, as stored in the playlist file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Remote playlist id on the catalog service.
    pub id: String,
    /// Maximum age in whole days before a track is removed.
    /// Negative means tracks never expire.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Maximum number of newly matched tracks appended per feed source
    /// per cycle.
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
    /// Communities whose top posts are scanned, in order.
    pub feed_sources: Vec<String>,
}

fn default_retention_days() -> i64 {
    7
}

fn default_result_cap() -> usize {
    25
}

/// A post pulled from a feed source's top-of-day listing.
#[derive(Debug, Clone)]
pub struct FeedPost {
    pub title: String,
    pub url: String,
}

/// One page of a source's ranked posts.
#[derive(Debug, Clone)]
pub struct FeedPage {
    /// Posts in descending rank order.
    pub posts: Vec<FeedPost>,
    /// Opaque continuation token; `None` means the listing is exhausted.
    pub after: Option<String>,
}

/// A track returned by the catalog search, in relevance order.
#[derive(Debug, Clone)]
pub struct CatalogTrack {
    pub id: String,
}

/// A track currently sitting in a remote playlist.
#[derive(Debug, Clone)]
pub struct TrackEntry {
    pub track_id: String,
    pub added_at: DateTime<Utc>,
}

/// One page of a playlist's track listing.
#[derive(Debug, Clone)]
pub struct TrackPage {
    pub entries: Vec<TrackEntry>,
    /// Opaque continuation token; `None` means the listing is exhausted.
    pub next: Option<String>,
}

/// The stage of a playlist's cycle at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Scan,
    Remove,
    Fetch,
    Append,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Scan => "scan",
            Stage::Remove => "remove",
            Stage::Fetch => "fetch",
            Stage::Append => "append",
        };
        f.write_str(name)
    }
}

/// A recorded per-playlist failure.
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub stage: Stage,
    pub cause: String,
}

/// Appended-track count for one feed source.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub appended: usize,
}

/// Outcome of one playlist's cycle.
#[derive(Debug, Clone)]
pub struct PlaylistReport {
    pub playlist_id: String,
    /// Number of expired tracks removed; `None` when expiration is disabled
    /// for this playlist.
    pub removed: Option<usize>,
    /// Per-source append counts, in processing order. Sources the cycle
    /// never reached (after a failure) are absent.
    pub sources: Vec<SourceReport>,
    /// Set when the cycle aborted before completing.
    pub failure: Option<StageFailure>,
}

impl PlaylistReport {
    pub fn new(playlist_id: &str) -> Self {
        Self {
            playlist_id: playlist_id.to_string(),
            removed: None,
            sources: Vec::new(),
            failure: None,
        }
    }

    /// Record a failure and return `self` for early exit from a cycle.
    pub fn fail(mut self, stage: Stage, cause: impl fmt::Display) -> Self {
        self.failure = Some(StageFailure {
            stage,
            cause: cause.to_string(),
        });
        self
    }
}
