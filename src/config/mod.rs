//! Configuration management.
//!
//! Settings are read from `~/.config/newsstand/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! The feed list itself lives next to it in `feeds.csv` (see [`sources`]).

pub mod colors;
pub mod keybindings;
pub mod sources;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;
pub use sources::{load_sources, FEEDS_FILE_NAME};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fetcher::parallel::DEFAULT_WORKERS;
use crate::normalizer::{default_mirrors, MirrorRule, UndatedPolicy};

const APP_DIR: &str = "newsstand";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub feed: FeedConfig,
    pub player: PlayerConfig,
    pub mirrors: Vec<MirrorRule>,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            feed: FeedConfig::default(),
            player: PlayerConfig::default(),
            mirrors: default_mirrors(),
            colors: ColorConfig::default(),
            keybindings: KeybindingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Number of feeds fetched concurrently.
    pub workers: usize,
    /// Per-request timeout; a hung feed only stalls its own worker until then.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: 15,
            user_agent: concat!("newsstand/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub undated: UndatedPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Launch audio/video through `command` instead of the system opener.
    pub enabled: bool,
    pub command: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "mpv".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. Missing fields use default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/newsstand`, honouring `XDG_CONFIG_HOME`.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(APP_DIR))
    }

    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn default_feeds_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(FEEDS_FILE_NAME))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_config_content() -> &'static str {
        r##"# Newsstand Configuration
#
# The feed list lives next to this file in feeds.csv, one `name,url`
# pair per line. Leave the name empty to use the feed's own title.

[fetch]
# Feeds fetched at the same time
workers = 5
# Give up on a single feed after this many seconds
timeout_secs = 15

[feed]
# Entries without a publish date: "newest" (stamp with fetch time),
# "oldest" (sort last, shown as "Unknown date") or "excluded" (hide)
undated = "newest"

[player]
# Audio, video and YouTube links open in this player when available
enabled = true
command = "mpv"

# Links from mirror front-ends are rewritten onto the original site
# whenever the feed URL contains `marker`.
[[mirrors]]
marker = "nitter."
origin = "https://x.com"

[colors]
# Named colors (Green, DarkGray, Reset, ...), hex ("#RRGGBB", "#RGB")
# or a 256-color palette index ("16")
feed_name = "Green"
title = "Red"
date = "Reset"
selection_bg = "White"
selection_fg = "Black"
preview_border = "Reset"
preview_title = "Yellow"
preview_feed = "Green"
search_fg = "White"
search_bg = "16"

[keybindings]
# Single characters ("j"), special keys (Enter, Esc, PageDown, Home, F1-F12)
# and modifiers ("Ctrl+c", "Shift+Tab")
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
page_up = ["PageUp", "Ctrl+b"]
page_down = ["PageDown", "Ctrl+f"]
top = ["g", "Home"]
bottom = ["G", "End"]
search = ["/"]
clear_search = ["Esc"]
open = ["Enter", "o"]
preview_down = ["J"]
preview_up = ["K"]
"##
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
