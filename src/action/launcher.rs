//! External viewers: a media player for audio/video, the system opener for
//! everything else.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::action::resolve::{resolve, LaunchMode, Resolution};
use crate::app::{NewsError, Result};
use crate::config::PlayerConfig;
use crate::domain::FeedItem;

/// Something that can open a URL outside this process.
pub trait Launcher: Send + Sync {
    fn name(&self) -> &str;

    /// Start the viewer without waiting for it. `label` is a display title
    /// that launchers may ignore.
    fn launch(&self, target: &str, label: &str) -> Result<()>;
}

/// Runs a media player such as mpv, detached from the terminal.
pub struct MediaLauncher {
    command: String,
}

impl MediaLauncher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Launcher for MediaLauncher {
    fn name(&self) -> &str {
        &self.command
    }

    fn launch(&self, target: &str, label: &str) -> Result<()> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(format!("--force-media-title={}", label))
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group, so closing the TUI does not signal the player.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        cmd.spawn()
            .map(|_| ())
            .map_err(|e| NewsError::launch(target, format!("{}: {}", self.command, e)))
    }
}

/// The platform opener: `xdg-open`, `open` or `start`.
pub struct GenericLauncher;

impl Launcher for GenericLauncher {
    fn name(&self) -> &str {
        "system opener"
    }

    fn launch(&self, target: &str, _label: &str) -> Result<()> {
        open::that_detached(target).map_err(|e| NewsError::launch(target, e))
    }
}

/// Picks a launcher for each [`Resolution`].
pub struct Launchers {
    media: Option<Box<dyn Launcher>>,
    generic: Box<dyn Launcher>,
}

impl Launchers {
    pub fn new(media: Option<Box<dyn Launcher>>, generic: Box<dyn Launcher>) -> Self {
        Self { media, generic }
    }

    /// The media player is used on Linux and macOS when enabled.
    pub fn from_config(player: &PlayerConfig) -> Self {
        let supported = cfg!(any(target_os = "linux", target_os = "macos"));
        let media: Option<Box<dyn Launcher>> =
            if supported && player.enabled && !player.command.trim().is_empty() {
                Some(Box::new(MediaLauncher::new(player.command.trim())))
            } else {
                None
            };
        Self::new(media, Box::new(GenericLauncher))
    }

    /// Launch `resolution`. Media falls back to the generic opener when no
    /// player is configured or the player cannot be started.
    pub fn dispatch(&self, resolution: &Resolution) -> Result<()> {
        let target = resolution.target.as_str();
        if target.is_empty() {
            return Err(NewsError::launch(target, "item has no link"));
        }

        if let (LaunchMode::Media, Some(media)) = (resolution.mode, &self.media) {
            debug!("Opening {} with {}", target, media.name());
            match media.launch(target, &resolution.label) {
                Ok(()) => return Ok(()),
                Err(e) => warn!("{}; falling back to {}", e, self.generic.name()),
            }
        }

        debug!("Opening {} with {}", target, self.generic.name());
        self.generic.launch(target, &resolution.label)
    }

    /// Resolve `item` and launch it.
    pub fn open(&self, item: &FeedItem) -> Result<Resolution> {
        let resolution = resolve(item);
        self.dispatch(&resolution)?;
        Ok(resolution)
    }
}
