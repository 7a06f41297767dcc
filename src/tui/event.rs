use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

use crate::app::Result;

pub enum AppEvent {
    Key(KeyEvent),
    ScrollUp,
    ScrollDown,
    Tick,
}

/// Wheel events closer together than this are dropped.
const SCROLL_THROTTLE: Duration = Duration::from_millis(10);

pub struct EventHandler {
    tick_rate: Duration,
    last_scroll: Option<Instant>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            tick_rate,
            last_scroll: None,
        }
    }

    pub fn next(&mut self) -> Result<AppEvent> {
        if !event::poll(self.tick_rate)? {
            return Ok(AppEvent::Tick);
        }

        let app_event = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp if self.take_scroll() => AppEvent::ScrollUp,
                MouseEventKind::ScrollDown if self.take_scroll() => AppEvent::ScrollDown,
                _ => AppEvent::Tick,
            },
            _ => AppEvent::Tick,
        };
        Ok(app_event)
    }

    fn take_scroll(&mut self) -> bool {
        let now = Instant::now();
        if self
            .last_scroll
            .is_some_and(|last| now.duration_since(last) < SCROLL_THROTTLE)
        {
            return false;
        }
        self.last_scroll = Some(now);
        true
    }
}

/// List-mode commands. Search-mode keys are handled as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    StartSearch,
    ClearSearch,
    Open,
    ScrollPreviewDown,
    ScrollPreviewUp,
    None,
}
