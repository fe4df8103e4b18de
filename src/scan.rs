//! Playlist expiration scanner.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::services::CatalogService;

/// Walk a playlist's full track listing and collect the ids of entries
/// whose retention age strictly exceeds `retention_days`.
///
/// `now` must be captured once before the first page fetch and held fixed,
/// so entries on later pages are evaluated against the same instant as
/// entries on earlier ones. Ages are whole days; an entry exactly
/// `retention_days` old is retained. Duplicate ids across playlist slots
/// collapse into one set entry — removal targets every occurrence of an id.
pub async fn scan_expired(
    catalog: &dyn CatalogService,
    playlist_id: &str,
    retention_days: i64,
    now: DateTime<Utc>,
) -> Result<BTreeSet<String>> {
    let mut expired = BTreeSet::new();
    let mut page: Option<String> = None;

    loop {
        let listing = catalog.playlist_tracks(playlist_id, page.as_deref()).await?;

        for entry in listing.entries {
            let age_days = (now - entry.added_at).num_days();
            if age_days > retention_days {
                expired.insert(entry.track_id);
            }
        }

        match listing.next {
            Some(next) => page = Some(next),
            None => break,
        }
    }

    Ok(expired)
}
