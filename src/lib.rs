//! # Newsstand
//!
//! Reads many RSS/Atom/JSON feeds at once and presents them as a single
//! newest-first list that can be searched as you type and opened in a
//! browser or media player.
//!
//! ## Architecture
//!
//! ```text
//! feeds.csv → Aggregator (N workers × Fetcher → Normalizer) → sort
//!           → FilteredView ⇄ TUI → resolve → Launcher
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # One `name,url` pair per line
//! echo 'Rust Blog,https://blog.rust-lang.org/feed.xml' >> ~/.config/newsstand/feeds.csv
//!
//! # Fetch and browse
//! newsstand
//!
//! # Fetch and print items mentioning "release"
//! newsstand list --query release
//! ```

/// Decides how an item is opened and launches the external viewer.
///
/// - [`resolve`](action::resolve()): item → target URL and [`LaunchMode`](action::LaunchMode)
/// - [`Launchers`](action::Launchers): media player or system opener
pub mod action;

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
///
/// - `tui` (default) - fetch everything, then browse
/// - `list [--query Q] [-n N]` - fetch everything, then print
/// - `sources` - print the feed list
pub mod cli;

/// `config.toml` settings and the `feeds.csv` source list.
pub mod config;

/// Core domain models and the display helpers derived from them.
pub mod domain;

/// Feed retrieval and the bounded worker pool that drives it.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for retrieving a feed body
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`Aggregator`](fetcher::Aggregator): fans sources out over N workers
pub mod fetcher;

/// Substring search over precomputed item text.
pub mod index;

/// Feed parsing and normalization into [`FeedItem`](domain::FeedItem)s.
pub mod normalizer;

/// Terminal user interface.
///
/// Item table beside a preview pane, with a search bar underneath.
/// j/k navigate, / searches, Enter opens, Esc clears, q quits.
pub mod tui;
