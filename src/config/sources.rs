//! Loads the feed list: a headerless CSV file of `name,url` records.
//!
//! ```text
//! Rust Blog, https://blog.rust-lang.org/feed.xml
//! ,https://example.com/feed.xml
//! ```
//!
//! An empty name means "use the feed's own title". Every record is a
//! feed; there is no comment syntax.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::app::{NewsError, Result};
use crate::domain::FeedSource;

pub const FEEDS_FILE_NAME: &str = "feeds.csv";

pub fn load_sources(path: &Path) -> Result<Vec<FeedSource>> {
    let file = File::open(path).map_err(|e| NewsError::source_list(path, e))?;
    parse_sources(file, path)
}

/// Parse CSV records from `reader`. `path` is used for error messages only.
pub fn parse_sources<R: Read>(reader: R, path: &Path) -> Result<Vec<FeedSource>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut sources = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| NewsError::source_list(path, e))?;
        if record.len() != 2 {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(NewsError::source_list(
                path,
                format!(
                    "line {}: expected 2 fields (name, url), found {}",
                    line,
                    record.len()
                ),
            ));
        }
        sources.push(FeedSource::new(&record[0], &record[1]));
    }

    tracing::debug!("Loaded {} feed sources from {}", sources.len(), path.display());
    Ok(sources)
}
