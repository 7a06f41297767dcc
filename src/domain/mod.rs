pub mod display;
pub mod item;
pub mod source;

pub use display::{clean_text, fit_width, format_relative_date, relative_date, strip_html};
pub use item::{sort_newest_first, FeedItem};
pub use source::FeedSource;
