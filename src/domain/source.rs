use serde::{Deserialize, Serialize};

/// One configured feed: a display name (possibly empty) and its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Name used in progress and error messages.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_name() {
        let source = FeedSource::new("Rust Blog", "https://blog.rust-lang.org/feed.xml");
        assert_eq!(source.display_name(), "Rust Blog");
    }

    #[test]
    fn test_display_name_falls_back_to_url() {
        let source = FeedSource::new("", "https://blog.rust-lang.org/feed.xml");
        assert_eq!(source.display_name(), "https://blog.rust-lang.org/feed.xml");
    }
}
