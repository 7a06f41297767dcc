//! Presentation helpers applied at render time.
//!
//! The item model keeps raw feed text; everything here is a pure function
//! of that text (or of a timestamp) so the UI can re-derive it freely.

use std::fmt;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

/// Collapse whitespace runs, swap square brackets for parentheses and trim.
pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('[', "(")
        .replace(']', ")")
}

/// Truncate or right-pad `s` to exactly `width` characters.
pub fn fit_width(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count > width {
        s.chars().take(width).collect()
    } else {
        let mut out = String::with_capacity(s.len() + width - count);
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - count));
        out
    }
}

/// Drop markup tags and collapse whitespace for the preview pane.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut last_was_space = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                if c.is_whitespace() {
                    if !last_was_space {
                        result.push(' ');
                        last_was_space = true;
                    }
                } else {
                    result.push(c);
                    last_was_space = false;
                }
            }
            _ => {}
        }
    }

    result.trim().to_string()
}

/// Human-friendly date relative to `now`, in the local time zone.
pub fn relative_date(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    format_relative_date(date, now, &Local)
}

/// Human-friendly date relative to `now`, rendered in `tz`.
///
/// - no timestamp: `Unknown date`
/// - same calendar day: `Today at 9:00 AM`
/// - previous calendar day: `Yesterday at 9:00 AM`
/// - less than a week old: `Wednesday at 9:00 AM`
/// - otherwise: `January 1, 2023`
pub fn format_relative_date<Tz>(date: Option<DateTime<Utc>>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let Some(date) = date else {
        return "Unknown date".to_string();
    };

    let local_date = date.with_timezone(tz);
    let local_now = now.with_timezone(tz);
    let day = local_date.date_naive();
    let today = local_now.date_naive();

    if day == today {
        format!("Today at {}", local_date.format("%-I:%M %p"))
    } else if today.pred_opt() == Some(day) {
        format!("Yesterday at {}", local_date.format("%-I:%M %p"))
    } else if now.signed_duration_since(date) < Duration::days(7) {
        local_date.format("%A at %-I:%M %p").to_string()
    } else {
        local_date.format("%B %-d, %Y").to_string()
    }
}
