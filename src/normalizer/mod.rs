//! Turns fetched feed bodies into [`FeedItem`]s.

pub mod rewrite;

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};

use crate::app::{NewsError, Result};
use crate::domain::{FeedItem, FeedSource};

pub use rewrite::{default_mirrors, rewrite_link, MirrorRule};

/// What to do with entries that carry no usable publish time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UndatedPolicy {
    /// Stamp the entry with the time it was normalized, so it sorts as newest.
    #[default]
    Newest,
    /// Keep the timestamp unknown; the entry sorts last.
    Oldest,
    /// Drop the entry.
    Excluded,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    undated: UndatedPolicy,
    mirrors: Vec<MirrorRule>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(UndatedPolicy::default(), default_mirrors())
    }
}

impl Normalizer {
    pub fn new(undated: UndatedPolicy, mirrors: Vec<MirrorRule>) -> Self {
        Self { undated, mirrors }
    }

    pub fn undated_policy(&self) -> UndatedPolicy {
        self.undated
    }

    pub fn parse(&self, body: &[u8]) -> Result<Feed> {
        parser::parse(body).map_err(|e| NewsError::FeedParse(e.to_string()))
    }

    /// Parse `body` and normalize every entry against `source`.
    ///
    /// `now` stands in for missing publish times under
    /// [`UndatedPolicy::Newest`].
    pub fn normalize(
        &self,
        source: &FeedSource,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Vec<FeedItem>> {
        let feed = self.parse(body)?;

        let feed_title = if source.name.is_empty() {
            feed.title
                .as_ref()
                .map(|t| decode_html_entities(&t.content).to_string())
                .unwrap_or_default()
        } else {
            source.name.clone()
        };

        Ok(feed
            .entries
            .into_iter()
            .filter_map(|entry| self.normalize_entry(source, &feed_title, entry, now))
            .collect())
    }

    /// Map one entry to an item. Returns `None` only when the entry is
    /// undated and the policy excludes undated entries.
    pub fn normalize_entry(
        &self,
        source: &FeedSource,
        feed_title: &str,
        entry: Entry,
        now: DateTime<Utc>,
    ) -> Option<FeedItem> {
        let published_at = match (entry.published.or(entry.updated), self.undated) {
            (Some(dt), _) => Some(dt.with_timezone(&Utc)),
            (None, UndatedPolicy::Newest) => Some(now),
            (None, UndatedPolicy::Oldest) => None,
            (None, UndatedPolicy::Excluded) => return None,
        };

        let media_url = first_audio_enclosure(&entry).unwrap_or_default();

        let title = entry
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_default();

        let raw_link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();
        let link = rewrite_link(&self.mirrors, &source.url, &raw_link);

        let description = entry
            .summary
            .map(|s| s.content)
            .filter(|s| !s.is_empty())
            .or_else(|| entry.content.and_then(|c| c.body))
            .map(|d| decode_html_entities(&d).to_string())
            .unwrap_or_default();

        Some(FeedItem::new(
            title,
            published_at,
            feed_title.to_string(),
            link,
            media_url,
            description,
        ))
    }
}

/// URL of the first enclosure whose media type starts with `audio/`.
///
/// RSS `<enclosure>` elements surface as media objects; Atom enclosures
/// stay as `rel="enclosure"` links. Both are scanned in document order,
/// media objects first.
fn first_audio_enclosure(entry: &Entry) -> Option<String> {
    let from_media = entry
        .media
        .iter()
        .flat_map(|media| media.content.iter())
        .find_map(|content| {
            let mime = content.content_type.as_ref()?.to_string();
            let url = content.url.as_ref()?;
            is_audio(&mime).then(|| url.to_string())
        });

    from_media.or_else(|| {
        entry
            .links
            .iter()
            .filter(|link| link.rel.as_deref() == Some("enclosure"))
            .find(|link| link.media_type.as_deref().is_some_and(is_audio))
            .map(|link| link.href.clone())
    })
}

fn is_audio(media_type: &str) -> bool {
    media_type.starts_with("audio/")
}
