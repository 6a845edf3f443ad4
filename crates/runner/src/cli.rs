use clap::{Parser, Subcommand};

use crate::orchestrator::NotifyMode;

/// Check tracker tasks nearing their due date and email the people responsible.
#[derive(Debug, Parser)]
#[command(name = "task-reminder", version)]
pub struct Cli {
    /// Include tasks due up to N days from today
    #[arg(long, default_value_t = 1)]
    pub days: u32,

    /// Include tasks that were due up to N days ago
    #[arg(long, default_value_t = 0)]
    pub past_days: u32,

    /// Send one alert per task instead of one summary per recipient
    #[arg(long)]
    pub per_task: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stay running and check every day at 15:30 UTC+7 with a ±1 day window
    Daemon,
}

impl Cli {
    pub fn notify_mode(&self) -> NotifyMode {
        if self.per_task {
            NotifyMode::PerTask
        } else {
            NotifyMode::Summary
        }
    }
}
