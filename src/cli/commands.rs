use chrono::Utc;

use crate::action::resolve;
use crate::app::{AppContext, Result};
use crate::domain::{clean_text, fit_width, relative_date, FeedItem};
use crate::fetcher::{AggregateReport, Progress};
use crate::index::filter;

/// Fetch every configured feed, reporting progress on stderr.
pub async fn fetch_all(ctx: &AppContext) -> Result<AggregateReport> {
    let sources = ctx.load_sources()?;

    if sources.is_empty() {
        eprintln!("No feeds listed in {}", ctx.feeds_path.display());
        return Ok(AggregateReport::default());
    }

    let report = ctx.aggregator.aggregate(sources, print_progress).await;

    eprintln!("\rFinished fetching all feeds.           ");
    eprintln!(
        "Fetched {} items from {}/{} feeds",
        report.items.len(),
        report.succeeded(),
        report.processed
    );
    Ok(report)
}

fn print_progress(progress: Progress<'_>) {
    if let Some(failure) = progress.failure {
        eprintln!("\r{:<32}", failure);
    }
    eprint!("\rFetching {}/{} feeds...", progress.processed, progress.total);
}

pub async fn list_items(ctx: &AppContext, query: Option<&str>, limit: Option<usize>) -> Result<()> {
    let report = fetch_all(ctx).await?;
    let matches = filter(query.unwrap_or_default(), &report.items);

    if matches.is_empty() {
        println!("No items");
        return Ok(());
    }

    let now = Utc::now();
    for item in matches.into_iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{}", format_item_line(item, now));
    }

    Ok(())
}

fn format_item_line(item: &FeedItem, now: chrono::DateTime<Utc>) -> String {
    format!(
        "{}  {}  {}\n    {}",
        fit_width(&relative_date(item.published_at(), now), 24),
        fit_width(&clean_text(item.feed_title()), 20),
        clean_text(item.title()),
        resolve(item).target
    )
}

pub fn list_sources(ctx: &AppContext) -> Result<()> {
    let sources = ctx.load_sources()?;

    if sources.is_empty() {
        println!("No feeds listed in {}", ctx.feeds_path.display());
        return Ok(());
    }

    for source in sources {
        if source.name.is_empty() {
            println!("(feed title)\n  {}", source.url);
        } else {
            println!("{}\n  {}", source.name, source.url);
        }
    }

    Ok(())
}

pub async fn run_tui(ctx: &AppContext) -> Result<()> {
    let report = fetch_all(ctx).await?;
    crate::tui::run(ctx, report.items)
}
