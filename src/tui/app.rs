use ratatui::widgets::TableState;

use crate::domain::FeedItem;
use crate::index::FilteredView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys drive the item list.
    Normal,
    /// Keys edit the search query.
    Search,
}

pub const PAGE_SIZE: usize = 10;

/// UI session state: the canonical items, the live filtered view over
/// them, and what the user is pointing at.
pub struct Session {
    items: Vec<FeedItem>,
    view: FilteredView,
    query: String,
    pub input_mode: InputMode,
    pub table_state: TableState,
    pub preview_scroll: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(items: Vec<FeedItem>) -> Self {
        let view = FilteredView::all(&items);
        let mut table_state = TableState::default();
        if !view.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            items,
            view,
            query: String::new(),
            input_mode: InputMode::Normal,
            table_state,
            preview_scroll: 0,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Query text as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &FeedItem> {
        self.view.iter(&self.items)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.table_state
            .selected()
            .and_then(|pos| self.view.get(pos, &self.items))
    }

    fn select(&mut self, position: usize) {
        if self.view.is_empty() {
            self.table_state.select(None);
        } else {
            let clamped = position.min(self.view.len() - 1);
            if self.table_state.selected() != Some(clamped) {
                self.preview_scroll = 0;
            }
            self.table_state.select(Some(clamped));
        }
    }

    pub fn move_up(&mut self) {
        let current = self.selected_index().unwrap_or(0);
        self.select(current.saturating_sub(1));
    }

    pub fn move_down(&mut self) {
        let next = self.selected_index().map_or(0, |i| i + 1);
        self.select(next);
    }

    pub fn page_up(&mut self) {
        let current = self.selected_index().unwrap_or(0);
        self.select(current.saturating_sub(PAGE_SIZE));
    }

    pub fn page_down(&mut self) {
        let current = self.selected_index().unwrap_or(0);
        self.select(current + PAGE_SIZE);
    }

    pub fn select_first(&mut self) {
        self.select(0);
        *self.table_state.offset_mut() = 0;
    }

    pub fn select_last(&mut self) {
        self.select(usize::MAX);
    }

    /// Focus the search bar with an empty query, which shows every item.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.set_query(String::new());
    }

    /// Leave the search bar, keeping the filter.
    pub fn finish_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Drop the filter and return to the top of the full list.
    pub fn clear_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.set_query(String::new());
    }

    pub fn push_query_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    /// Replace the query and rebuild the view from scratch.
    pub fn set_query(&mut self, query: String) {
        self.view = FilteredView::apply(&query, &self.items);
        self.query = query;
        self.select_first();
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn scroll_preview_down(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_add(1);
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(1);
    }
}
