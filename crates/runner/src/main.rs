//! Task reminder binary entrypoint.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reminder_common::config::AppConfig;
use reminder_notifier::Mailer;
use reminder_runner::cli::{Cli, Command};
use reminder_runner::orchestrator::Orchestrator;
use reminder_runner::schedule::run_daily;
use reminder_tracker::TaskFetcher;

const DEFAULT_FILTER: &str =
    "reminder_runner=info,reminder_tracker=info,reminder_engine=info,reminder_notifier=info";
const DEBUG_FILTER: &str = "reminder_runner=debug,reminder_tracker=debug,reminder_engine=debug,\
                            reminder_notifier=debug,lettre=trace";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.mail.debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    config.mail.validate()?;

    let fetcher = TaskFetcher::new(&config.tracker)?;
    let mailer = Mailer::from_config(&config.mail);
    let orchestrator = Orchestrator::new(fetcher, mailer).with_mode(cli.notify_mode());

    match cli.command {
        None => {
            orchestrator.run(cli.days, cli.past_days).await?;
        }
        Some(Command::Daemon) => {
            // Run until Ctrl+C
            tokio::select! {
                _ = run_daily(&orchestrator) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received shutdown signal, stopping scheduler");
                }
            }
        }
    }

    Ok(())
}
