pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::action::Launchers;
use crate::app::{AppContext, Result};
use crate::config::KeybindingConfig;
use crate::domain::FeedItem;

use self::app::{InputMode, Session};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Browse `items` until the user quits.
pub fn run(ctx: &AppContext, items: Vec<FeedItem>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, items);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(terminal: &mut Tui, ctx: &AppContext, items: Vec<FeedItem>) -> Result<()> {
    let mut session = Session::new(items);
    let mut event_handler = EventHandler::new(Duration::from_millis(100));

    for binding in ctx.config.keybindings.invalid_bindings() {
        tracing::warn!("Ignoring unknown key binding: {}", binding);
    }

    loop {
        terminal.draw(|frame| layout::render(frame, &mut session, &ctx.config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                handle_key(&mut session, key, &ctx.config.keybindings, &ctx.launchers)
            }
            AppEvent::ScrollUp => session.move_up(),
            AppEvent::ScrollDown => session.move_down(),
            AppEvent::Tick => {}
        }

        if session.should_quit {
            break;
        }
    }

    Ok(())
}

pub fn handle_key(
    session: &mut Session,
    key: KeyEvent,
    keybindings: &KeybindingConfig,
    launchers: &Launchers,
) {
    session.clear_status();
    match session.input_mode {
        InputMode::Search => handle_search_key(session, key),
        InputMode::Normal => apply_action(session, keybindings.get_action(&key), launchers),
    }
}

fn handle_search_key(session: &mut Session, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => session.clear_search(),
        KeyCode::Enter => session.finish_search(),
        KeyCode::Backspace => session.pop_query_char(),
        KeyCode::Up => session.move_up(),
        KeyCode::Down => session.move_down(),
        KeyCode::Char('c') if ctrl => session.should_quit = true,
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            session.push_query_char(c)
        }
        _ => {}
    }
}

fn apply_action(session: &mut Session, action: Action, launchers: &Launchers) {
    match action {
        Action::Quit => session.should_quit = true,
        Action::MoveUp => session.move_up(),
        Action::MoveDown => session.move_down(),
        Action::PageUp => session.page_up(),
        Action::PageDown => session.page_down(),
        Action::Top => session.select_first(),
        Action::Bottom => session.select_last(),
        Action::StartSearch => session.start_search(),
        Action::ClearSearch => session.clear_search(),
        Action::Open => open_selected(session, launchers),
        Action::ScrollPreviewDown => session.scroll_preview_down(),
        Action::ScrollPreviewUp => session.scroll_preview_up(),
        Action::None => {}
    }
}

fn open_selected(session: &mut Session, launchers: &Launchers) {
    let Some(item) = session.selected_item() else {
        return;
    };

    let message = match launchers.open(item) {
        Ok(resolution) => format!("Opened {}", resolution.target),
        Err(e) => e.to_string(),
    };
    session.set_status(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::action::Launcher;
    use crate::app::NewsError;

    struct Opener {
        opened: Arc<Mutex<Vec<String>>>,
    }

    impl Launcher for Opener {
        fn name(&self) -> &str {
            "test opener"
        }

        fn launch(&self, target: &str, _label: &str) -> Result<()> {
            if target.contains("broken") {
                return Err(NewsError::launch(target, "no handler"));
            }
            self.opened.lock().unwrap().push(target.to_string());
            Ok(())
        }
    }

    fn setup(links: &[&str]) -> (Session, Launchers, Arc<Mutex<Vec<String>>>) {
        let items = links
            .iter()
            .map(|link| {
                FeedItem::new(
                    format!("Title {}", link),
                    None,
                    "Feed".into(),
                    link.to_string(),
                    String::new(),
                    String::new(),
                )
            })
            .collect();
        let opened = Arc::new(Mutex::new(Vec::new()));
        let launchers = Launchers::new(
            None,
            Box::new(Opener {
                opened: opened.clone(),
            }),
        );
        (Session::new(items), launchers, opened)
    }

    fn press(session: &mut Session, launchers: &Launchers, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        handle_key(session, key, &KeybindingConfig::default(), launchers);
    }

    #[test]
    fn test_open_selected_item() {
        let (mut session, launchers, opened) = setup(&["https://a.example/1", "https://b.example/2"]);
        press(&mut session, &launchers, KeyCode::Char('j'));
        press(&mut session, &launchers, KeyCode::Enter);

        assert_eq!(*opened.lock().unwrap(), vec!["https://b.example/2".to_string()]);
        assert_eq!(
            session.status_message.as_deref(),
            Some("Opened https://b.example/2")
        );
    }

    #[test]
    fn test_launch_error_reported_not_fatal() {
        let (mut session, launchers, _) = setup(&["https://broken.example/x"]);
        press(&mut session, &launchers, KeyCode::Enter);

        let status = session.status_message.clone().unwrap();
        assert!(status.contains("no handler"), "{}", status);
        assert!(!session.should_quit);
    }

    #[test]
    fn test_search_keys_edit_query() {
        let (mut session, launchers, _) = setup(&["https://a.example/rust", "https://b.example/go"]);
        press(&mut session, &launchers, KeyCode::Char('/'));
        assert_eq!(session.input_mode, InputMode::Search);

        for c in "go".chars() {
            press(&mut session, &launchers, KeyCode::Char(c));
        }
        assert!(!session.should_quit);
        assert_eq!(session.query(), "go");
        assert_eq!(session.visible_len(), 1);

        press(&mut session, &launchers, KeyCode::Enter);
        assert_eq!(session.input_mode, InputMode::Normal);
        assert_eq!(session.visible_len(), 1);

        press(&mut session, &launchers, KeyCode::Esc);
        assert_eq!(session.visible_len(), 2);
        assert_eq!(session.query(), "");
    }

    #[test]
    fn test_search_again_after_filtering_shows_all() {
        let (mut session, launchers, _) = setup(&["https://a.example/rust", "https://b.example/go"]);
        press(&mut session, &launchers, KeyCode::Char('/'));
        press(&mut session, &launchers, KeyCode::Char('g'));
        press(&mut session, &launchers, KeyCode::Char('o'));
        press(&mut session, &launchers, KeyCode::Enter);
        assert_eq!(session.visible_len(), 1);

        press(&mut session, &launchers, KeyCode::Char('/'));
        press(&mut session, &launchers, KeyCode::Enter);

        assert_eq!(session.input_mode, InputMode::Normal);
        assert_eq!(session.query(), "");
        assert_eq!(session.visible_len(), session.items().len());
    }

    #[test]
    fn test_quit_key() {
        let (mut session, launchers, _) = setup(&[]);
        press(&mut session, &launchers, KeyCode::Char('q'));
        assert!(session.should_quit);
    }
}
