use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}", source_list_message(.path, .message))]
    SourceList { path: PathBuf, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open {target}: {message}")]
    Launch { target: String, message: String },

    #[error("{0}")]
    Other(String),
}

fn source_list_message(path: &std::path::Path, message: &str) -> String {
    format!(
        "Error reading feed list {}: {}\n\
         Please create the file and fill it with one `name,url` pair per line, e.g.\n\
         \n    Rust Blog,https://blog.rust-lang.org/feed.xml",
        path.display(),
        message
    )
}

impl NewsError {
    pub fn source_list(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        NewsError::SourceList {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn launch(target: &str, message: impl ToString) -> Self {
        NewsError::Launch {
            target: target.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
