//! Post-to-track matching.

use anyhow::Result;

use crate::links::is_song_link;
use crate::models::FeedPost;
use crate::normalize::normalize_title;
use crate::services::CatalogService;

/// Converts a qualifying feed post into at most one catalog track id.
///
/// The catalog's ranking is authoritative: a non-empty search result yields
/// the first id with no re-ranking or validation against the post. Callers
/// wanting higher precision must verify outside this component.
pub struct Matcher<'a> {
    catalog: &'a dyn CatalogService,
    link_hosts: &'a [String],
}

impl<'a> Matcher<'a> {
    pub fn new(catalog: &'a dyn CatalogService, link_hosts: &'a [String]) -> Self {
        Self {
            catalog,
            link_hosts,
        }
    }

    /// Classify, normalize, and search. Returns `Ok(None)` for posts that
    /// fail classification (no search is issued) and for empty search
    /// results; a failed search call propagates as an error.
    pub async fn match_post(&self, post: &FeedPost) -> Result<Option<String>> {
        if !is_song_link(&post.url, self.link_hosts) {
            return Ok(None);
        }

        let query = normalize_title(&post.title);
        let results = self.catalog.search_tracks(&query).await?;

        Ok(results.into_iter().next().map(|track| track.id))
    }
}
