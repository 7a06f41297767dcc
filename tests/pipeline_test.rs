use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use newsstand::action::{resolve, LaunchMode};
use newsstand::app::{AppContext, NewsError, Result};
use newsstand::config::Config;
use newsstand::fetcher::Fetcher;
use newsstand::index::filter;
use newsstand::normalizer::UndatedPolicy;

struct MapFetcher {
    bodies: HashMap<&'static str, &'static str>,
}

#[async_trait]
impl Fetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.bodies
            .get(url)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| NewsError::Other(format!("404 for {}", url)))
    }
}

const PODCAST: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Pod Declared</title>
  <item>
    <title>Episode 12: Ownership</title>
    <link>https://pod.example/12</link>
    <pubDate>Wed, 10 Jan 2024 08:00:00 GMT</pubDate>
    <description>We talk about the borrow checker</description>
    <enclosure url="https://cdn.pod.example/12.mp3" type="audio/mpeg" length="1"/>
  </item>
</channel></rss>"#;

const BLOG: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog Declared</title>
  <id>urn:blog</id>
  <updated>2024-01-12T00:00:00Z</updated>
  <entry>
    <title>Announcing 2.0</title>
    <id>urn:blog:2</id>
    <link href="https://blog.example/2.0.html"/>
    <updated>2024-01-12T00:00:00Z</updated>
    <summary>Faster builds</summary>
  </entry>
  <entry>
    <title>Undated musings</title>
    <id>urn:blog:3</id>
    <link href="https://blog.example/musings"/>
  </entry>
</feed>"#;

const SOCIAL: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>someone</title>
  <item>
    <title>Watch this</title>
    <link>https://nitter.example.org/someone/status/42#m</link>
    <pubDate>Thu, 11 Jan 2024 08:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;

fn context(feeds_csv: &str, undated: UndatedPolicy) -> (AppContext, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(feeds_csv.as_bytes()).unwrap();

    let fetcher = Arc::new(MapFetcher {
        bodies: HashMap::from([
            ("https://pod.example/rss", PODCAST),
            ("https://blog.example/atom", BLOG),
            ("https://nitter.example.org/someone/rss", SOCIAL),
            ("https://broken.example/rss", "<html><body>oops</body></html>"),
        ]),
    });

    let mut config = Config::default();
    config.feed.undated = undated;
    config.fetch.workers = 2;
    let ctx = AppContext::with_fetcher(config, file.path().to_path_buf(), fetcher);
    (ctx, file)
}

const FEEDS: &str = "\
Pod,https://pod.example/rss
,https://blog.example/atom
Social,https://nitter.example.org/someone/rss
Broken,https://broken.example/rss
Gone,https://gone.example/rss
";

#[test]
fn test_fetch_sort_filter_resolve() {
    let (ctx, _file) = context(FEEDS, UndatedPolicy::Oldest);
    let sources = ctx.load_sources().unwrap();
    assert_eq!(sources.len(), 5);

    let report = tokio_test::block_on(ctx.aggregator.aggregate(sources, |_| {}));

    assert_eq!(report.processed, 5);
    assert_eq!(report.succeeded(), 3);
    let mut failed: Vec<_> = report.failures.iter().map(|f| f.source.name.as_str()).collect();
    failed.sort();
    assert_eq!(failed, vec!["Broken", "Gone"]);

    let titles: Vec<_> = report.items.iter().map(|i| i.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Announcing 2.0",
            "Watch this",
            "Episode 12: Ownership",
            "Undated musings"
        ]
    );
    assert_eq!(report.items[0].feed_title(), "Blog Declared");
    assert_eq!(report.items[1].link(), "https://x.com/someone/status/42");

    let hits = filter("BORROW", &report.items);
    assert_eq!(hits.len(), 1);
    let resolution = resolve(hits[0]);
    assert_eq!(resolution.target, "https://cdn.pod.example/12.mp3");
    assert_eq!(resolution.mode, LaunchMode::Media);
    assert_eq!(resolution.label, "Episode 12: Ownership");

    let blog = resolve(&report.items[0]);
    assert_eq!(blog.target, "https://blog.example/2.0.html");
    assert_eq!(blog.mode, LaunchMode::Generic);

    assert_eq!(filter("", &report.items).len(), report.items.len());
}

#[test]
fn test_undated_newest_sorts_first() {
    let (ctx, _file) = context(",https://blog.example/atom\n", UndatedPolicy::Newest);
    let sources = ctx.load_sources().unwrap();
    let report = tokio_test::block_on(ctx.aggregator.aggregate(sources, |_| {}));

    assert_eq!(report.items[0].title(), "Undated musings");
    assert!(report.items[0].published_at().is_some());
}

#[test]
fn test_undated_excluded() {
    let (ctx, _file) = context(",https://blog.example/atom\n", UndatedPolicy::Excluded);
    let sources = ctx.load_sources().unwrap();
    let report = tokio_test::block_on(ctx.aggregator.aggregate(sources, |_| {}));

    let titles: Vec<_> = report.items.iter().map(|i| i.title()).collect();
    assert_eq!(titles, vec!["Announcing 2.0"]);
}

#[test]
fn test_malformed_feed_list_is_fatal() {
    let (ctx, _file) = context("Pod,https://pod.example/rss,extra\n", UndatedPolicy::Newest);
    let err = ctx.load_sources().unwrap_err();
    assert!(matches!(err, NewsError::SourceList { .. }));
}
