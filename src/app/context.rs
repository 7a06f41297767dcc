use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::action::Launchers;
use crate::app::error::Result;
use crate::config::{load_sources, Config};
use crate::domain::FeedSource;
use crate::fetcher::{Aggregator, Fetcher, HttpFetcher};
use crate::normalizer::Normalizer;

/// Everything a command needs, built once from the loaded [`Config`].
pub struct AppContext {
    pub config: Config,
    pub feeds_path: PathBuf,
    pub aggregator: Aggregator,
    pub launchers: Launchers,
}

impl AppContext {
    pub fn new(config: Config, feeds_path: PathBuf) -> Result<Self> {
        let timeout = Duration::from_secs(config.fetch.timeout_secs.max(1));
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::new(timeout, &config.fetch.user_agent)?);
        Ok(Self::with_fetcher(config, feeds_path, fetcher))
    }

    pub fn with_fetcher(
        config: Config,
        feeds_path: PathBuf,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Self {
        let normalizer = Normalizer::new(config.feed.undated, config.mirrors.clone());
        // Slightly looser than the HTTP timeout so the client reports first.
        let timeout = Duration::from_secs(config.fetch.timeout_secs.max(1) + 5);
        let aggregator = Aggregator::with_workers(fetcher, normalizer, config.fetch.workers)
            .with_timeout(timeout);
        let launchers = Launchers::from_config(&config.player);

        Self {
            config,
            feeds_path,
            aggregator,
            launchers,
        }
    }

    pub fn load_sources(&self) -> Result<Vec<FeedSource>> {
        load_sources(&self.feeds_path)
    }
}
