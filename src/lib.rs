//! # Playlist Curator
//!
//! Curates music-streaming playlists from community feed posts.
//!
//! Each cycle trims tracks that have outlived a per-playlist retention
//! window, then matches the day's top posts from configured feed sources
//! against the catalog's track search and appends the results, one capped
//! batch per source.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────────────┐   ┌──────────────┐
//! │ Feed service │──▶│     Curation engine       │◀─▶│   Catalog    │
//! │ (top posts)  │   │ scan → remove             │   │ search/list/ │
//! └──────────────┘   │ match → append per source │   │ remove/append│
//!                    └────────────┬──────────────┘   └──────────────┘
//!                                 │
//!                          ┌──────┴──────┐
//!                          │  CLI (plc)  │
//!                          │ + TOML store│
//!                          └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! plc add --playlist-id 37i9dQZF --source listentothis   # register a playlist
//! plc list                                               # show configurations
//! plc curate                                             # run one cycle
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`store`] | Playlist configuration store |
//! | [`services`] | Feed/catalog capability traits |
//! | [`feed_reddit`] | Reddit feed adapter |
//! | [`catalog_spotify`] | Spotify catalog adapter |
//! | [`normalize`] | Post-title noise stripping |
//! | [`links`] | Song-link acceptance filter |
//! | [`scan`] | Playlist expiration scanner |
//! | [`matcher`] | Post-to-track matching |
//! | [`curate`] | Per-playlist curation orchestration |

pub mod catalog_spotify;
pub mod config;
pub mod curate;
pub mod feed_reddit;
pub mod http;
pub mod links;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod scan;
pub mod services;
pub mod store;

#[cfg(test)]
pub(crate) mod mocks;
