//! Curation orchestration.
//!
//! One cycle walks the configured playlists strictly in order. Per playlist
//! the flow is linear: scan for expired tracks, remove them in one bulk
//! call, then per feed source match top posts against the catalog and
//! append that source's batch. A failure at any of those stages aborts the
//! rest of that playlist's cycle only; remaining playlists still run. No
//! state survives between cycles — everything is recomputed from the remote
//! services.

use anyhow::{bail, Result};
use chrono::Utc;

use crate::catalog_spotify::SpotifyCatalog;
use crate::config::Config;
use crate::feed_reddit::RedditFeed;
use crate::matcher::Matcher;
use crate::models::{PlaylistConfig, PlaylistReport, SourceReport, Stage};
use crate::scan::scan_expired;
use crate::services::{CatalogService, FeedService};
use crate::store::PlaylistStore;

/// Run one curation cycle over `configs`, in input order.
///
/// Always returns one report per configuration; failures are recorded in
/// the report rather than propagated, so one playlist cannot prevent the
/// next from being processed. With `dry_run` the cycle computes removal
/// sets and matches but issues no mutation calls.
pub async fn curate(
    feed: &dyn FeedService,
    catalog: &dyn CatalogService,
    configs: &[PlaylistConfig],
    link_hosts: &[String],
    dry_run: bool,
) -> Vec<PlaylistReport> {
    let mut reports = Vec::with_capacity(configs.len());
    for config in configs {
        reports.push(curate_playlist(feed, catalog, config, link_hosts, dry_run).await);
    }
    reports
}

fn validate_config(config: &PlaylistConfig) -> Result<()> {
    if config.id.is_empty() {
        bail!("playlist id is empty");
    }
    if config.result_cap == 0 {
        bail!("result_cap must be > 0");
    }
    if config.feed_sources.is_empty() {
        bail!("no feed sources configured");
    }
    Ok(())
}

async fn curate_playlist(
    feed: &dyn FeedService,
    catalog: &dyn CatalogService,
    config: &PlaylistConfig,
    link_hosts: &[String],
    dry_run: bool,
) -> PlaylistReport {
    let mut report = PlaylistReport::new(&config.id);

    if let Err(e) = validate_config(config) {
        return report.fail(Stage::Config, e);
    }

    // Trim first: removal must fully complete before any append.
    if config.retention_days >= 0 {
        // One fixed instant for the whole scan, regardless of pagination
        // latency.
        let now = Utc::now();
        let expired = match scan_expired(catalog, &config.id, config.retention_days, now).await {
            Ok(expired) => expired,
            Err(e) => return report.fail(Stage::Scan, e),
        };

        if !expired.is_empty() && !dry_run {
            if let Err(e) = catalog.remove_tracks(&config.id, &expired).await {
                return report.fail(Stage::Remove, e);
            }
        }
        report.removed = Some(expired.len());
    }

    let matcher = Matcher::new(catalog, link_hosts);

    for source in &config.feed_sources {
        let matched =
            match collect_matches(feed, &matcher, source, config.result_cap).await {
                Ok(matched) => matched,
                Err(e) => return report.fail(Stage::Fetch, e),
            };

        // One append per source; batches are never merged across sources.
        if !matched.is_empty() && !dry_run {
            if let Err(e) = catalog.append_tracks(&config.id, &matched).await {
                return report.fail(Stage::Append, e);
            }
        }

        report.sources.push(SourceReport {
            source: source.clone(),
            appended: matched.len(),
        });
    }

    report
}

/// Page through `source`'s top posts in ranking order, collecting up to
/// `cap` matched track ids. Stops requesting pages once the cap is reached.
///
/// A failed search call skips that post only; posts that fail
/// classification or search do not consume the cap.
async fn collect_matches(
    feed: &dyn FeedService,
    matcher: &Matcher<'_>,
    source: &str,
    cap: usize,
) -> Result<Vec<String>> {
    let mut matched = Vec::new();
    let mut after: Option<String> = None;

    'pages: loop {
        let page = feed.top_posts(source, after.as_deref()).await?;

        for post in &page.posts {
            match matcher.match_post(post).await {
                Ok(Some(track_id)) => {
                    matched.push(track_id);
                    if matched.len() == cap {
                        break 'pages;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    eprintln!("Warning: search failed for {:?} in {}: {}", post.title, source, e);
                }
            }
        }

        match page.after {
            Some(next) if !page.posts.is_empty() => after = Some(next),
            _ => break,
        }
    }

    Ok(matched)
}

/// `plc curate` — run one full cycle over the stored configurations and
/// print the per-playlist reports.
pub async fn run_curate(config: &Config, dry_run: bool) -> Result<()> {
    let store = PlaylistStore::load(&config.playlists.path)?;
    if store.playlists.is_empty() {
        println!("no playlists configured");
        return Ok(());
    }

    let feed = RedditFeed::connect(&config.feed).await?;
    let catalog = SpotifyCatalog::connect(&config.catalog).await?;

    let reports = curate(
        &feed,
        &catalog,
        &store.playlists,
        &config.matching.link_hosts,
        dry_run,
    )
    .await;

    let mut failed = 0usize;
    for report in &reports {
        if dry_run {
            println!("curate {} (dry-run)", report.playlist_id);
        } else {
            println!("curate {}", report.playlist_id);
        }

        match report.removed {
            Some(count) => println!("  removed expired: {}", count),
            None if report.failure.is_none() => println!("  expiration: disabled"),
            None => {}
        }
        for source in &report.sources {
            println!("  {}: appended {}", source.source, source.appended);
        }
        if let Some(failure) = &report.failure {
            failed += 1;
            println!("  failed at {}: {}", failure.stage, failure.cause);
        }
    }

    println!("{} playlists, {} failed", reports.len(), failed);
    println!("ok");
    Ok(())
}
