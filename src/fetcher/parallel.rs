//! Fans the source list out over a fixed pool of fetch workers.
//!
//! Sources are queued up front on a channel sized to the whole list; each
//! worker pulls the next source, fetches and normalizes it, and sends the
//! finished batch (or the failure) back to the caller. The caller is the
//! only owner of the aggregate item list, so no lock guards it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::app::{NewsError, Result};
use crate::domain::{sort_newest_first, FeedItem, FeedSource};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

pub const DEFAULT_WORKERS: usize = 5;

/// A source that contributed no items this run.
#[derive(Debug)]
pub struct FetchFailure {
    pub source: FeedSource,
    pub error: NewsError,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing feed {}: {}", self.source.url, self.error)
    }
}

/// Emitted once per finished source, success or not.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub processed: usize,
    pub total: usize,
    pub failure: Option<&'a FetchFailure>,
}

#[derive(Debug, Default)]
pub struct AggregateReport {
    /// Every normalized item, newest first.
    pub items: Vec<FeedItem>,
    pub failures: Vec<FetchFailure>,
    pub processed: usize,
}

impl AggregateReport {
    pub fn succeeded(&self) -> usize {
        self.processed - self.failures.len()
    }
}

struct SourceOutcome {
    source: FeedSource,
    result: Result<Vec<FeedItem>>,
}

pub struct Aggregator {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    workers: usize,
    timeout: Option<Duration>,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, normalizer: Normalizer) -> Self {
        Self::with_workers(fetcher, normalizer, DEFAULT_WORKERS)
    }

    pub fn with_workers(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        workers: usize,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            workers: workers.max(1),
            timeout: None,
        }
    }

    /// Bound each source's fetch, independent of the fetcher's own limits.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fetch and normalize every source, returning once all are done.
    ///
    /// A failing source is recorded in [`AggregateReport::failures`] and
    /// never stops the others. `on_progress` runs on the calling task after
    /// each source completes.
    pub async fn aggregate<F>(&self, sources: Vec<FeedSource>, mut on_progress: F) -> AggregateReport
    where
        F: FnMut(Progress<'_>),
    {
        let total = sources.len();
        let mut report = AggregateReport::default();
        if total == 0 {
            return report;
        }

        let (job_tx, job_rx) = mpsc::channel::<FeedSource>(total);
        for source in sources {
            // Capacity equals the source count, so this never waits.
            if job_tx.send(source).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<SourceOutcome>();

        let worker_count = self.workers.min(total);
        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let fetcher = self.fetcher.clone();
            let normalizer = self.normalizer.clone();
            let timeout = self.timeout;

            handles.push(tokio::spawn(async move {
                loop {
                    let next = job_rx.lock().await.recv().await;
                    let Some(source) = next else { break };

                    debug!(worker_id, url = %source.url, "fetching feed");
                    let result = fetch_source(fetcher.as_ref(), &normalizer, &source, timeout).await;
                    if result_tx.send(SourceOutcome { source, result }).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(result_tx);

        while let Some(SourceOutcome { source, result }) = result_rx.recv().await {
            report.processed += 1;
            match result {
                Ok(items) => {
                    debug!("{} items from {}", items.len(), source.display_name());
                    report.items.extend(items);
                    on_progress(Progress {
                        processed: report.processed,
                        total,
                        failure: None,
                    });
                }
                Err(error) => {
                    let failure = FetchFailure { source, error };
                    warn!("{}", failure);
                    report.failures.push(failure);
                    on_progress(Progress {
                        processed: report.processed,
                        total,
                        failure: report.failures.last(),
                    });
                }
            }
        }

        for joined in futures::future::join_all(handles).await {
            if let Err(e) = joined {
                error!("Fetch worker join error: {}", e);
            }
        }

        sort_newest_first(&mut report.items);
        info!(
            "Aggregated {} items from {}/{} feeds",
            report.items.len(),
            report.succeeded(),
            total
        );
        report
    }
}

async fn fetch_source(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    source: &FeedSource,
    timeout: Option<Duration>,
) -> Result<Vec<FeedItem>> {
    let body = match timeout {
        Some(limit) => tokio::time::timeout(limit, fetcher.fetch(&source.url))
            .await
            .map_err(|_| NewsError::Timeout(limit))??,
        None => fetcher.fetch(&source.url).await?,
    };
    normalizer.normalize(source, &body, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    fn rss(title: &str, entries: &[(&str, &str)]) -> String {
        let items: String = entries
            .iter()
            .map(|(t, date)| {
                format!(
                    "<item><title>{}</title><link>https://example.com/{}</link><pubDate>{}</pubDate></item>",
                    t, t, date
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>{}</title>{}</channel></rss>"#,
            title, items
        )
    }

    struct StubFetcher {
        bodies: HashMap<String, String>,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.bodies
                .get(url)
                .map(|b| b.as_bytes().to_vec())
                .ok_or_else(|| NewsError::Other(format!("connection refused: {}", url)))
        }
    }

    fn stub(bodies: &[(&str, String)]) -> Arc<dyn Fetcher + Send + Sync> {
        Arc::new(StubFetcher {
            bodies: bodies.iter().map(|(u, b)| (u.to_string(), b.clone())).collect(),
        })
    }

    #[tokio::test]
    async fn test_partial_failure_isolated() {
        let fetcher = stub(&[
            ("https://a.example/rss", rss("A", &[("a1", "Mon, 01 Jan 2024 10:00:00 GMT")])),
            ("https://b.example/rss", "this is not a feed".to_string()),
            ("https://c.example/rss", rss("C", &[("c1", "Tue, 02 Jan 2024 10:00:00 GMT")])),
        ]);
        let aggregator = Aggregator::new(fetcher, Normalizer::default());
        let sources = vec![
            FeedSource::new("A", "https://a.example/rss"),
            FeedSource::new("B", "https://b.example/rss"),
            FeedSource::new("C", "https://c.example/rss"),
        ];

        let mut seen = Vec::new();
        let report = aggregator
            .aggregate(sources, |p| seen.push((p.processed, p.total, p.failure.is_some())))
            .await;

        assert_eq!(report.processed, 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source.url, "https://b.example/rss");
        assert!(matches!(report.failures[0].error, NewsError::FeedParse(_)));

        let feeds: Vec<_> = report.items.iter().map(|i| i.feed_title()).collect();
        assert_eq!(feeds, vec!["C", "A"]);

        let counts: Vec<_> = seen.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(counts, vec![1, 2, 3]);
        assert!(seen.iter().all(|(_, total, _)| *total == 3));
        assert_eq!(seen.iter().filter(|(_, _, failed)| *failed).count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_source_recorded() {
        let fetcher = stub(&[]);
        let aggregator = Aggregator::new(fetcher, Normalizer::default());
        let report = aggregator
            .aggregate(vec![FeedSource::new("", "https://down.example/rss")], |_| {})
            .await;

        assert!(report.items.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].to_string(),
            "error parsing feed https://down.example/rss: connection refused: https://down.example/rss"
        );
    }

    #[tokio::test]
    async fn test_zero_sources_is_empty() {
        let aggregator = Aggregator::new(stub(&[]), Normalizer::default());
        let mut calls = 0;
        let report = aggregator.aggregate(Vec::new(), |_| calls += 1).await;

        assert!(report.items.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.processed, 0);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_items_merged_newest_first() {
        let fetcher = stub(&[
            (
                "https://a.example/rss",
                rss(
                    "A",
                    &[
                        ("a-old", "Mon, 01 Jan 2024 10:00:00 GMT"),
                        ("a-new", "Fri, 05 Jan 2024 10:00:00 GMT"),
                    ],
                ),
            ),
            ("https://b.example/rss", rss("B", &[("b-mid", "Wed, 03 Jan 2024 10:00:00 GMT")])),
        ]);
        let aggregator = Aggregator::with_workers(fetcher, Normalizer::default(), 1);
        let report = aggregator
            .aggregate(
                vec![
                    FeedSource::new("", "https://a.example/rss"),
                    FeedSource::new("", "https://b.example/rss"),
                ],
                |_| {},
            )
            .await;

        let titles: Vec<_> = report.items.iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["a-new", "b-mid", "a-old"]);
    }

    #[tokio::test]
    async fn test_zero_workers_clamped() {
        let fetcher = stub(&[("https://a.example/rss", rss("A", &[("a1", "Mon, 01 Jan 2024 10:00:00 GMT")]))]);
        let aggregator = Aggregator::with_workers(fetcher, Normalizer::default(), 0);
        assert_eq!(aggregator.workers(), 1);

        let report = aggregator
            .aggregate(vec![FeedSource::new("A", "https://a.example/rss")], |_| {})
            .await;
        assert_eq!(report.items.len(), 1);
    }

    struct SlowFetcher {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl Fetcher for SlowFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(rss("Slow", &[("s", "Mon, 01 Jan 2024 10:00:00 GMT")]).into_bytes())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bounded_by_worker_count() {
        let fetcher = Arc::new(SlowFetcher {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::from_millis(20),
        });
        let aggregator = Aggregator::with_workers(fetcher.clone(), Normalizer::default(), 3);
        let sources: Vec<_> = (0..10)
            .map(|i| FeedSource::new("", format!("https://{}.example/rss", i)))
            .collect();

        let report = aggregator.aggregate(sources, |_| {}).await;

        assert_eq!(report.processed, 10);
        assert_eq!(report.items.len(), 10);
        let max = fetcher.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 3, "max in flight was {}", max);
        assert!(max >= 2, "max in flight was {}", max);
    }

    #[tokio::test]
    async fn test_hung_fetch_times_out() {
        let fetcher = Arc::new(SlowFetcher {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::from_secs(60),
        });
        let aggregator = Aggregator::new(fetcher, Normalizer::default())
            .with_timeout(Duration::from_millis(20));

        let report = aggregator
            .aggregate(vec![FeedSource::new("", "https://hung.example/rss")], |_| {})
            .await;

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, NewsError::Timeout(_)));
    }
}
