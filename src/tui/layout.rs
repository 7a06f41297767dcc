use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::domain::{clean_text, relative_date, strip_html};
use crate::tui::app::{InputMode, Session};

const FEED_WIDTH: u16 = 25;
const DATE_WIDTH: u16 = 26;

pub fn render(frame: &mut Frame, session: &mut Session, colors: &ColorConfig) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Items + preview
            Constraint::Length(1), // Search bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(rows[0]);

    render_items_table(frame, session, columns[0], colors);
    render_preview_pane(frame, session, columns[1], colors);
    render_search_bar(frame, session, rows[1], colors);
}

fn render_items_table(frame: &mut Frame, session: &mut Session, area: Rect, colors: &ColorConfig) {
    let now = Utc::now();

    let rows: Vec<Row> = session
        .visible_items()
        .map(|item| {
            Row::new(vec![
                Cell::from(format!(" {}", clean_text(item.feed_title())))
                    .style(Style::default().fg(colors.feed_name)),
                Cell::from(format!(" {}", clean_text(item.title())))
                    .style(Style::default().fg(colors.title)),
                Cell::from(format!(" {}", relative_date(item.published_at(), now)))
                    .style(Style::default().fg(colors.date)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(FEED_WIDTH),
            Constraint::Min(20),
            Constraint::Length(DATE_WIDTH),
        ],
    )
    .column_spacing(0)
    .row_highlight_style(
        Style::default()
            .bg(colors.selection_bg)
            .fg(colors.selection_fg),
    );

    frame.render_stateful_widget(table, area, &mut session.table_state);
}

fn render_preview_pane(frame: &mut Frame, session: &Session, area: Rect, colors: &ColorConfig) {
    let content = match session.selected_item() {
        Some(item) => {
            let description = clean_text(&strip_html(item.description()));
            Text::from(vec![
                Line::from(Span::styled(
                    clean_text(item.title()),
                    Style::default()
                        .fg(colors.preview_title)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    clean_text(item.feed_title()),
                    Style::default().fg(colors.preview_feed),
                )),
                Line::from(relative_date(item.published_at(), Utc::now())),
                Line::from(""),
                Line::from(description),
            ])
        }
        None if session.items().is_empty() => Text::from("No items"),
        None => Text::from("No matching items"),
    };

    let block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.preview_border));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((session.preview_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_search_bar(frame: &mut Frame, session: &Session, area: Rect, colors: &ColorConfig) {
    let text = match session.input_mode {
        InputMode::Search => format!("/{}", session.query()),
        InputMode::Normal => {
            if let Some(ref msg) = session.status_message {
                msg.clone()
            } else if !session.query().is_empty() {
                format!(
                    "/{}  ({} of {})  Esc:Clear",
                    session.query(),
                    session.visible_len(),
                    session.items().len()
                )
            } else {
                format!(
                    "{} items  j/k:Nav  J/K:Preview  g/G:Top/Bottom  /:Search  Enter:Open  q:Quit",
                    session.items().len()
                )
            }
        }
    };

    let paragraph =
        Paragraph::new(text).style(Style::default().fg(colors.search_fg).bg(colors.search_bg));
    frame.render_widget(paragraph, area);

    if session.input_mode == InputMode::Search {
        let column = cursor_column(session.query(), area.width);
        frame.set_cursor_position((area.x + column, area.y));
    }
}

/// Cursor column after the `/` prompt and `query`, kept inside `width`.
fn cursor_column(query: &str, width: u16) -> u16 {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    typed.saturating_add(1).min(width.saturating_sub(1))
}
