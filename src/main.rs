use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsstand::app::AppContext;
use newsstand::cli::{commands, Cli, Commands};
use newsstand::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay off the TUI screen.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);

    let feeds_path = match &cli.feeds {
        Some(path) => path.clone(),
        None => Config::default_feeds_path()?,
    };
    let ctx = AppContext::new(config, feeds_path)?;

    match cli.command.clone().unwrap_or(Commands::Tui) {
        Commands::Tui => {
            commands::run_tui(&ctx).await?;
        }
        Commands::List { query, limit } => {
            commands::list_items(&ctx, query.as_deref(), limit).await?;
        }
        Commands::Sources => {
            commands::list_sources(&ctx)?;
        }
    }

    Ok(())
}
