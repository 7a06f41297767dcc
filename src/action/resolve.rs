use url::Url;

use crate::domain::FeedItem;

/// File extensions handed to the media player.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "m4a", "ogg", "opus", "flac", "aac", "mp4", "m4v", "mkv", "webm", "mov",
];

/// Hosts whose pages the media player can stream directly.
pub const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Audio/video: prefer the media player.
    Media,
    /// Anything else: the system opener.
    Generic,
}

/// What opening an item means: which URL, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: String,
    pub mode: LaunchMode,
    /// Display title for players that show one.
    pub label: String,
}

/// Prefer the item's audio enclosure, else its link.
pub fn resolve(item: &FeedItem) -> Resolution {
    let target = if item.media_url().is_empty() {
        item.link()
    } else {
        item.media_url()
    };

    Resolution {
        target: target.to_string(),
        mode: classify(target),
        label: item.title().to_string(),
    }
}

pub fn classify(target: &str) -> LaunchMode {
    let lower = target.to_lowercase();

    let (path, host) = match Url::parse(&lower) {
        Ok(url) => (url.path().to_string(), url.host_str().map(str::to_string)),
        // Not absolute: judge the text up to any query or fragment.
        Err(_) => (
            lower.split(['?', '#']).next().unwrap_or_default().to_string(),
            None,
        ),
    };

    if has_media_extension(&path) || host.as_deref().is_some_and(is_video_host) {
        LaunchMode::Media
    } else {
        LaunchMode::Generic
    }
}

fn has_media_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .is_some_and(|(_, ext)| MEDIA_EXTENSIONS.contains(&ext))
}

fn is_video_host(host: &str) -> bool {
    VIDEO_HOSTS.iter().any(|known| {
        host == *known
            || host
                .strip_suffix(known)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
