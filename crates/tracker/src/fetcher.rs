use async_trait::async_trait;

use reminder_common::config::TrackerConfig;
use reminder_common::error::AppError;
use reminder_common::types::Task;

use crate::client::{SearchOutcome, TrackerClient};
use crate::query::DueWindow;

/// Anything that can produce the due-soon tasks for a run.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Tasks due in `[today - lookback_days, today + lookahead_days]` (UTC).
    ///
    /// Either every task is returned or the call fails; there are no partial results.
    async fn fetch(&self, lookahead_days: u32, lookback_days: u32) -> Result<Vec<Task>, AppError>;
}

/// Fetches due-soon issues from the tracker.
pub struct TaskFetcher {
    client: TrackerClient,
    leader_email: Option<String>,
}

impl TaskFetcher {
    pub fn new(config: &TrackerConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: TrackerClient::new(config)?,
            leader_email: config.leader_email.clone(),
        })
    }

    /// Fetch tasks for an explicit window.
    pub async fn fetch_window(&self, window: DueWindow) -> Result<Vec<Task>, AppError> {
        let jql = window.jql();

        let issues = match self.client.search_basic(&jql).await? {
            SearchOutcome::Issues(issues) => issues,
            SearchOutcome::BasicAuthRejected => {
                tracing::warn!("Basic auth disabled on tracker, retrying with bearer token");
                self.client.search_bearer(&jql).await?
            }
        };

        tracing::info!(
            start = %window.start,
            end = %window.end,
            issues = issues.len(),
            "Fetched due-soon issues"
        );

        let leader = self.leader_email.as_deref();
        Ok(issues
            .into_iter()
            .map(|issue| issue.into_task(leader))
            .collect())
    }
}

#[async_trait]
impl TaskSource for TaskFetcher {
    async fn fetch(&self, lookahead_days: u32, lookback_days: u32) -> Result<Vec<Task>, AppError> {
        self.fetch_window(DueWindow::from_today(lookahead_days, lookback_days))
            .await
    }
}
