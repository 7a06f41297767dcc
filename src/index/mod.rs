//! Substring search over the items' precomputed search text.
//!
//! Matching is a literal, case-insensitive substring test against
//! [`FeedItem::search_text`], which is already lowercase; only the query is
//! lowercased here. Results keep the canonical order.

use crate::domain::FeedItem;

/// Items whose search text contains `query`, in their original order.
/// An empty query returns every item.
pub fn filter<'a>(query: &str, items: &'a [FeedItem]) -> Vec<&'a FeedItem> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.search_text().contains(query.as_str()))
        .collect()
}

/// The live filtered view: positions into the canonical item list.
///
/// Rebuilt wholesale by [`FilteredView::apply`] whenever the query changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    query: String,
    indices: Vec<usize>,
}

impl FilteredView {
    /// The unfiltered view over `items`.
    pub fn all(items: &[FeedItem]) -> Self {
        Self {
            query: String::new(),
            indices: (0..items.len()).collect(),
        }
    }

    pub fn apply(query: &str, items: &[FeedItem]) -> Self {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Self::all(items);
        }

        let indices = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.search_text().contains(query.as_str()))
            .map(|(i, _)| i)
            .collect();

        Self { query, indices }
    }

    /// The lowercased query this view was built from.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The item at `position` within the view.
    pub fn get<'a>(&self, position: usize, items: &'a [FeedItem]) -> Option<&'a FeedItem> {
        self.indices.get(position).and_then(|&i| items.get(i))
    }

    pub fn iter<'a>(&'a self, items: &'a [FeedItem]) -> impl Iterator<Item = &'a FeedItem> + 'a {
        self.indices.iter().filter_map(move |&i| items.get(i))
    }
}
