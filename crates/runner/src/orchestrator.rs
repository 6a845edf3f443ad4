//! One reminder run: fetch → group → compose → deliver.
//!
//! Recipients are processed strictly one after another. A failed delivery is
//! logged and counted but never stops the remaining recipients; a failed fetch
//! aborts the run before anything is sent.

use tracing::Instrument;
use uuid::Uuid;

use reminder_common::error::AppError;
use reminder_common::types::{NotificationPayload, Task};
use reminder_engine::composer::{compose_single, compose_summary};
use reminder_engine::grouping::group_by_recipient;
use reminder_notifier::{Delivery, MailTransport, Mailer};
use reminder_tracker::TaskSource;

/// How tasks are turned into messages for a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// One summary per recipient.
    #[default]
    Summary,
    /// One alert per task.
    PerTask,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    /// Tasks without a recipient.
    pub skipped: usize,
    pub recipients: usize,
    /// Messages actually handed to the SMTP server.
    pub sent: usize,
    /// Messages only previewed.
    pub dry_run: usize,
    pub failed: usize,
}

pub struct Orchestrator<S, T> {
    source: S,
    mailer: Mailer<T>,
    mode: NotifyMode,
}

impl<S: TaskSource, T: MailTransport> Orchestrator<S, T> {
    pub fn new(source: S, mailer: Mailer<T>) -> Self {
        Self {
            source,
            mailer,
            mode: NotifyMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: NotifyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Notify every recipient about tasks due in `[today - lookback, today + lookahead]`.
    pub async fn run(&self, lookahead_days: u32, lookback_days: u32) -> Result<RunReport, AppError> {
        let span = tracing::info_span!("run", run_id = %Uuid::new_v4());
        self.run_inner(lookahead_days, lookback_days)
            .instrument(span)
            .await
    }

    async fn run_inner(&self, lookahead_days: u32, lookback_days: u32) -> Result<RunReport, AppError> {
        tracing::info!(lookahead_days, lookback_days, "Checking for tasks near their deadline");

        let tasks = self.source.fetch(lookahead_days, lookback_days).await?;
        let mut report = RunReport {
            fetched: tasks.len(),
            ..Default::default()
        };

        if tasks.is_empty() {
            tracing::info!("No tasks approaching their deadline");
            return Ok(report);
        }

        let grouped = group_by_recipient(tasks);
        report.skipped = grouped.skipped.len();
        report.recipients = grouped.groups.len();

        for (recipient, tasks) in &grouped.groups {
            let (mut sent, mut dry_run, mut failed) = (0usize, 0usize, 0usize);
            for payload in self.compose(tasks) {
                match self.mailer.deliver(&payload, recipient).await {
                    Ok(Delivery::Sent) => sent += 1,
                    Ok(Delivery::DryRun) => dry_run += 1,
                    Err(e) => {
                        tracing::error!(recipient = %recipient, error = %e, "Failed to send notification");
                        failed += 1;
                    }
                }
            }

            if sent > 0 && failed == 0 {
                tracing::info!(recipient = %recipient, tasks = tasks.len(), sent, "Notification sent");
            } else if sent > 0 {
                tracing::warn!(
                    recipient = %recipient,
                    tasks = tasks.len(),
                    sent,
                    failed,
                    "Notification partially sent"
                );
            } else {
                tracing::info!(
                    recipient = %recipient,
                    tasks = tasks.len(),
                    dry_run,
                    failed,
                    "Notification not sent (dry-run or failed)"
                );
            }

            report.sent += sent;
            report.dry_run += dry_run;
            report.failed += failed;
        }

        tracing::info!(
            fetched = report.fetched,
            skipped = report.skipped,
            recipients = report.recipients,
            sent = report.sent,
            dry_run = report.dry_run,
            failed = report.failed,
            "Run finished"
        );

        Ok(report)
    }

    fn compose(&self, tasks: &[Task]) -> Vec<NotificationPayload> {
        match self.mode {
            NotifyMode::Summary => vec![compose_summary(tasks)],
            NotifyMode::PerTask => tasks.iter().map(compose_single).collect(),
        }
    }
}
