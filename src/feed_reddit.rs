//! Reddit feed adapter.
//!
//! Implements [`FeedService`] against the Reddit OAuth API using the
//! app-only (client-credentials) grant. Listings use Reddit's cursor
//! pagination: each page carries an `after` fullname that requests the
//! next page.
//!
//! # Environment Variables
//!
//! - `REDDIT_CLIENT_ID` — required
//! - `REDDIT_CLIENT_SECRET` — required
//! - `REDDIT_USER_AGENT` — required (Reddit rejects default agents)

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::http::send_json;
use crate::models::{FeedPage, FeedPost};
use crate::services::FeedService;

/// The ranking window for top-post listings. The curator always pulls the
/// top of the current day.
const TOP_PERIOD: &str = "day";

/// Reddit credentials loaded from environment variables.
struct RedditCredentials {
    client_id: String,
    client_secret: String,
    user_agent: String,
}

impl RedditCredentials {
    fn from_env() -> Result<Self> {
        let client_id = std::env::var("REDDIT_CLIENT_ID")
            .context("REDDIT_CLIENT_ID environment variable not set")?;
        let client_secret = std::env::var("REDDIT_CLIENT_SECRET")
            .context("REDDIT_CLIENT_SECRET environment variable not set")?;
        let user_agent = std::env::var("REDDIT_USER_AGENT")
            .context("REDDIT_USER_AGENT environment variable not set")?;

        Ok(Self {
            client_id,
            client_secret,
            user_agent,
        })
    }
}

/// A connected Reddit client implementing [`FeedService`].
pub struct RedditFeed {
    client: reqwest::Client,
    api_base: String,
    page_size: u32,
    max_retries: u32,
    token: String,
    user_agent: String,
}

impl RedditFeed {
    /// Read credentials from the environment and obtain an app-only token.
    pub async fn connect(config: &FeedConfig) -> Result<Self> {
        let creds = RedditCredentials::from_env()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let request = client
            .post(&config.token_url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .header("User-Agent", &creds.user_agent)
            .form(&[("grant_type", "client_credentials")]);

        let json = send_json(request, config.max_retries)
            .await
            .context("Reddit token request failed")?;

        let token = json
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid Reddit token response: missing access_token"))?
            .to_string();

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            page_size: config.page_size,
            max_retries: config.max_retries,
            token,
            user_agent: creds.user_agent,
        })
    }
}

#[async_trait]
impl FeedService for RedditFeed {
    async fn top_posts(&self, source: &str, after: Option<&str>) -> Result<FeedPage> {
        let url = format!("{}/r/{}/top", self.api_base, source);

        let mut query: Vec<(&str, String)> = vec![
            ("t", TOP_PERIOD.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if let Some(cursor) = after {
            query.push(("after", cursor.to_string()));
        }

        let request = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("User-Agent", &self.user_agent)
            .query(&query);

        let json = send_json(request, self.max_retries)
            .await
            .with_context(|| format!("Failed to list top posts for r/{}", source))?;

        parse_listing(&json)
    }
}

/// Parse a Reddit listing response into a [`FeedPage`].
///
/// Posts without a title or URL are skipped.
fn parse_listing(json: &serde_json::Value) -> Result<FeedPage> {
    let data = json
        .get("data")
        .ok_or_else(|| anyhow::anyhow!("Invalid listing response: missing data"))?;

    let children = data
        .get("children")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid listing response: missing children"))?;

    let mut posts = Vec::with_capacity(children.len());
    for child in children {
        let post = &child["data"];
        let title = post.get("title").and_then(|t| t.as_str());
        let url = post.get("url").and_then(|u| u.as_str());
        if let (Some(title), Some(url)) = (title, url) {
            posts.push(FeedPost {
                title: title.to_string(),
                url: url.to_string(),
            });
        }
    }

    let after = data
        .get("after")
        .and_then(|a| a.as_str())
        .map(|a| a.to_string());

    Ok(FeedPage { posts, after })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let json = serde_json::json!({
            "kind": "Listing",
            "data": {
                "after": "t3_abc",
                "children": [
                    { "kind": "t3", "data": { "title": "Song A", "url": "https://youtu.be/a" } },
                    { "kind": "t3", "data": { "title": "Song B", "url": "https://example.com/b" } }
                ]
            }
        });

        let page = parse_listing(&json).unwrap();
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].title, "Song A");
        assert_eq!(page.posts[1].url, "https://example.com/b");
        assert_eq!(page.after.as_deref(), Some("t3_abc"));
    }

    #[test]
    fn test_parse_listing_end_of_pagination() {
        let json = serde_json::json!({
            "data": { "after": null, "children": [] }
        });

        let page = parse_listing(&json).unwrap();
        assert!(page.posts.is_empty());
        assert!(page.after.is_none());
    }

    #[test]
    fn test_parse_listing_skips_malformed_children() {
        let json = serde_json::json!({
            "data": {
                "after": null,
                "children": [
                    { "kind": "t3", "data": { "title": "No url here" } },
                    { "kind": "t3", "data": { "title": "Ok", "url": "https://youtu.be/x" } }
                ]
            }
        });

        let page = parse_listing(&json).unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].title, "Ok");
    }

    #[test]
    fn test_parse_listing_rejects_non_listing() {
        let json = serde_json::json!({ "error": 403 });
        assert!(parse_listing(&json).is_err());
    }
}
