//! Decides how an item is opened and hands it to an external viewer.

pub mod launcher;
pub mod resolve;

pub use launcher::{GenericLauncher, Launcher, Launchers, MediaLauncher};
pub use resolve::{classify, resolve, LaunchMode, Resolution};
