//! In-memory service doubles for unit tests.
//!
//! Both mocks paginate their fixtures with a numeric-offset continuation
//! token so tests can exercise the engine's page loops, and both record the
//! calls they receive so tests can assert on call order and call absence.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use crate::models::{CatalogTrack, FeedPage, FeedPost, TrackEntry, TrackPage};
use crate::services::{CatalogService, FeedService};

/// A mutation observed by [`MockCatalog`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOp {
    Removed(String, BTreeSet<String>),
    Appended(String, Vec<String>),
}

pub struct MockCatalog {
    pub playlists: HashMap<String, Vec<TrackEntry>>,
    pub page_size: usize,
    pub search: HashMap<String, Vec<CatalogTrack>>,
    pub fail_list: HashSet<String>,
    pub fail_remove: HashSet<String>,
    pub fail_append: HashSet<String>,
    pub fail_search: HashSet<String>,
    pub search_calls: Mutex<Vec<String>>,
    pub list_calls: Mutex<usize>,
    pub ops: Mutex<Vec<CatalogOp>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self {
            playlists: HashMap::new(),
            page_size: 100,
            search: HashMap::new(),
            fail_list: HashSet::new(),
            fail_remove: HashSet::new(),
            fail_append: HashSet::new(),
            fail_search: HashSet::new(),
            search_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
            ops: Mutex::new(Vec::new()),
        }
    }
}

impl MockCatalog {
    pub fn with_playlist(id: &str, entries: Vec<TrackEntry>, page_size: usize) -> Self {
        let mut mock = Self {
            page_size,
            ..Self::default()
        };
        mock.playlists.insert(id.to_string(), entries);
        mock
    }

    pub fn add_search_result(&mut self, query: &str, ids: &[&str]) {
        self.search.insert(
            query.to_string(),
            ids.iter()
                .map(|id| CatalogTrack { id: id.to_string() })
                .collect(),
        );
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        if self.fail_search.contains(query) {
            bail!("mock search failure for {:?}", query);
        }
        Ok(self.search.get(query).cloned().unwrap_or_default())
    }

    async fn playlist_tracks(&self, playlist_id: &str, page: Option<&str>) -> Result<TrackPage> {
        *self.list_calls.lock().unwrap() += 1;
        if self.fail_list.contains(playlist_id) {
            bail!("mock listing failure for playlist {}", playlist_id);
        }
        let entries = self
            .playlists
            .get(playlist_id)
            .ok_or_else(|| anyhow::anyhow!("unknown playlist {}", playlist_id))?;

        let offset: usize = page.map(|p| p.parse().unwrap()).unwrap_or(0);
        let end = (offset + self.page_size).min(entries.len());
        let next = if end < entries.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(TrackPage {
            entries: entries[offset..end].to_vec(),
            next,
        })
    }

    async fn remove_tracks(&self, playlist_id: &str, track_ids: &BTreeSet<String>) -> Result<()> {
        if self.fail_remove.contains(playlist_id) {
            bail!("mock removal failure for playlist {}", playlist_id);
        }
        self.ops.lock().unwrap().push(CatalogOp::Removed(
            playlist_id.to_string(),
            track_ids.clone(),
        ));
        Ok(())
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        if self.fail_append.contains(playlist_id) {
            bail!("mock append failure for playlist {}", playlist_id);
        }
        self.ops.lock().unwrap().push(CatalogOp::Appended(
            playlist_id.to_string(),
            track_ids.to_vec(),
        ));
        Ok(())
    }

    async fn create_playlist(&self, name: &str) -> Result<String> {
        Ok(format!("created-{}", name))
    }
}

pub struct MockFeed {
    pub posts: HashMap<String, Vec<FeedPost>>,
    pub page_size: usize,
    pub fail_sources: HashSet<String>,
    pub pages_served: Mutex<usize>,
}

impl Default for MockFeed {
    fn default() -> Self {
        Self {
            posts: HashMap::new(),
            page_size: 100,
            fail_sources: HashSet::new(),
            pages_served: Mutex::new(0),
        }
    }
}

impl MockFeed {
    pub fn add_source(&mut self, source: &str, posts: Vec<FeedPost>) {
        self.posts.insert(source.to_string(), posts);
    }
}

#[async_trait]
impl FeedService for MockFeed {
    async fn top_posts(&self, source: &str, after: Option<&str>) -> Result<FeedPage> {
        if self.fail_sources.contains(source) {
            bail!("mock feed failure for {}", source);
        }
        let posts = self
            .posts
            .get(source)
            .ok_or_else(|| anyhow::anyhow!("unknown feed source {}", source))?;

        *self.pages_served.lock().unwrap() += 1;

        let offset: usize = after.map(|a| a.parse().unwrap()).unwrap_or(0);
        let end = (offset + self.page_size).min(posts.len());
        let next = if end < posts.len() {
            Some(end.to_string())
        } else {
            None
        };

        Ok(FeedPage {
            posts: posts[offset..end].to_vec(),
            after: next,
        })
    }
}
