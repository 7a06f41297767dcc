use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized entry from one feed.
///
/// Items are plain values: two entries with the same fields are
/// indistinguishable and nothing deduplicates them across feeds.
/// `search_text` is derived once in [`FeedItem::new`] and never
/// recomputed, so the fields are read-only outside this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    title: String,
    published_at: Option<DateTime<Utc>>,
    feed_title: String,
    link: String,
    media_url: String,
    description: String,
    search_text: String,
}

impl FeedItem {
    pub fn new(
        title: String,
        published_at: Option<DateTime<Utc>>,
        feed_title: String,
        link: String,
        media_url: String,
        description: String,
    ) -> Self {
        let search_text = build_search_text(&title, &feed_title, &description);
        Self {
            title,
            published_at,
            feed_title,
            link,
            media_url,
            description,
            search_text,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publish time in UTC; `None` means unknown.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn feed_title(&self) -> &str {
        &self.feed_title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    /// URL of the first `audio/*` enclosure, or empty.
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }
}

fn build_search_text(title: &str, feed_title: &str, description: &str) -> String {
    let mut text = String::with_capacity(title.len() + feed_title.len() + description.len() + 2);
    text.push_str(&title.to_lowercase());
    text.push(' ');
    text.push_str(&feed_title.to_lowercase());
    text.push(' ');
    text.push_str(&description.to_lowercase());
    text
}

/// Sort items most recent first.
///
/// The sort is stable, so items sharing a timestamp keep their insertion
/// order. Undated items go after every dated one.
pub fn sort_newest_first(items: &mut [FeedItem]) {
    // Option orders None before Some, so comparing b to a puts None last.
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
