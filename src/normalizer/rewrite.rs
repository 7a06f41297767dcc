use serde::{Deserialize, Serialize};
use url::Url;

/// Rewrites links from a mirror front-end back onto the canonical site.
///
/// A rule applies when the *source* URL contains `marker`; the entry link
/// then keeps its path and query but takes `origin` as scheme and host.
/// Fragments are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorRule {
    pub marker: String,
    pub origin: String,
}

impl MirrorRule {
    pub fn new(marker: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            origin: origin.into(),
        }
    }

    /// Nitter instances mirror X/Twitter.
    pub fn nitter() -> Self {
        Self::new("nitter.", "https://x.com")
    }

    pub fn matches(&self, source_url: &str) -> bool {
        !self.marker.is_empty() && source_url.contains(&self.marker)
    }

    /// Move `link` onto this rule's origin. Only `http(s)` links with a
    /// host and at least one `/` after it are moved; anything else is
    /// returned unchanged. The path and query are copied as written.
    pub fn rewrite(&self, link: &str) -> String {
        let is_web = Url::parse(link)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
        let tail = link
            .split_once("://")
            .and_then(|(_, rest)| rest.split_once('/'))
            .map(|(_, tail)| tail);

        match tail {
            Some(tail) if is_web => {
                let path = tail.split('#').next().unwrap_or_default();
                format!("{}/{}", self.origin.trim_end_matches('/'), path)
            }
            _ => link.to_string(),
        }
    }
}

pub fn default_mirrors() -> Vec<MirrorRule> {
    vec![MirrorRule::nitter()]
}

/// Apply the first rule matching `source_url`, or pass `link` through.
pub fn rewrite_link(rules: &[MirrorRule], source_url: &str, link: &str) -> String {
    rules
        .iter()
        .find(|rule| rule.matches(source_url))
        .map(|rule| rule.rewrite(link))
        .unwrap_or_else(|| link.to_string())
}
