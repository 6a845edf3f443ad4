//! End-to-end tests for the reminder run.
//!
//! Uses an in-memory task source and a transport that records every SMTP
//! session instead of opening connections.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::Message;

use reminder_common::config::MailConfig;
use reminder_common::error::AppError;
use reminder_common::types::Task;
use reminder_notifier::plan::Attempt;
use reminder_notifier::{MailTransport, Mailer};
use reminder_runner::orchestrator::{NotifyMode, Orchestrator, RunReport};
use reminder_tracker::TaskSource;

// ============================================================
// Helpers
// ============================================================

#[derive(Clone, Default)]
struct FakeSource {
    tasks: Option<Vec<Task>>,
    calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl FakeSource {
    fn with(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskSource for FakeSource {
    async fn fetch(&self, lookahead_days: u32, lookback_days: u32) -> Result<Vec<Task>, AppError> {
        self.calls.lock().unwrap().push((lookahead_days, lookback_days));
        self.tasks.clone().ok_or_else(|| AppError::Tracker {
            status: 503,
            body: "Service Unavailable".to_string(),
        })
    }
}

/// A sent message as seen by the SMTP server.
struct Sent {
    to: Vec<String>,
    raw: String,
}

/// Records every SMTP session. Clones share the same log.
#[derive(Clone, Default)]
struct RecordingTransport {
    /// Recipients whose sessions always fail.
    reject: Vec<String>,
    /// Messages containing any of these strings always fail.
    reject_containing: Vec<String>,
    sessions: Arc<Mutex<Vec<Attempt>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn probe(&self, _host: &str, _port: u16) -> Result<(), AppError> {
        Ok(())
    }

    async fn send(&self, _host: &str, attempt: Attempt, message: Message) -> Result<(), AppError> {
        self.sessions.lock().unwrap().push(attempt);

        let to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        if to.iter().any(|addr| self.reject.contains(addr))
            || self.reject_containing.iter().any(|needle| raw.contains(needle))
        {
            return Err(AppError::Mail("550 mailbox unavailable".to_string()));
        }

        self.sent.lock().unwrap().push(Sent { to, raw });
        Ok(())
    }
}

fn mail_config(dry_run: bool) -> MailConfig {
    MailConfig {
        host: Some("smtp.example.com".to_string()),
        port: 587,
        username: Some("reminder@example.com".to_string()),
        password: Some("pw".to_string()),
        from: Some("reminder@example.com".to_string()),
        dry_run,
        debug: false,
    }
}

fn orchestrator(
    tasks: Vec<Task>,
    transport: &RecordingTransport,
) -> Orchestrator<FakeSource, RecordingTransport> {
    Orchestrator::new(
        FakeSource::with(tasks),
        Mailer::with_transport(&mail_config(false), transport.clone()),
    )
}

fn make_task(key: &str, recipient: Option<&str>, project: Option<&str>) -> Task {
    Task {
        key: key.to_string(),
        summary: format!("Summary of {key}"),
        due_date: Some("2025-06-01 07:00 UTC+7".to_string()),
        assignee: Some("alice".to_string()),
        recipient: recipient.map(str::to_string),
        project: project.map(str::to_string),
    }
}

// ============================================================
// Scenarios
// ============================================================

#[tokio::test]
async fn test_single_task_single_summary() {
    let transport = RecordingTransport::default();
    let source = FakeSource::with(vec![make_task("A-1", Some("alice@example.com"), Some("Alpha"))]);
    let orch = Orchestrator::new(
        source.clone(),
        Mailer::with_transport(&mail_config(false), transport.clone()),
    );

    let report = orch.run(1, 0).await.unwrap();

    assert_eq!(
        report,
        RunReport {
            fetched: 1,
            skipped: 0,
            recipients: 1,
            sent: 1,
            dry_run: 0,
            failed: 0,
        }
    );

    assert_eq!(*source.calls.lock().unwrap(), vec![(1, 0)]);
    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["alice@example.com".to_string()]);
    assert!(sent[0].raw.contains("A-1"));
    assert!(sent[0].raw.contains("Alpha"));
}

#[tokio::test]
async fn test_no_tasks_no_deliveries() {
    let transport = RecordingTransport::default();
    let orch = orchestrator(Vec::new(), &transport);

    let report = orch.run(1, 0).await.unwrap();

    assert_eq!(report, RunReport::default());
    assert!(transport.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_same_recipient_two_projects() {
    let transport = RecordingTransport::default();
    let orch = orchestrator(
        vec![
            make_task("A-1", Some("alice@example.com"), Some("Alpha")),
            make_task("B-1", Some("alice@example.com"), Some("Beta")),
        ],
        &transport,
    );

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.recipients, 1);
    assert_eq!(report.sent, 1);

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let raw = &sent[0].raw;
    assert!(raw.contains("Summary: 2 tasks"));
    assert_eq!(raw.matches("Project: Alpha").count(), 1);
    assert_eq!(raw.matches("Project: Beta").count(), 1);
    assert!(raw.contains("A-1:"));
    assert!(raw.contains("B-1:"));
}

#[tokio::test]
async fn test_tasks_without_recipient_are_skipped() {
    let transport = RecordingTransport::default();
    let orch = orchestrator(
        vec![
            make_task("A-1", Some("alice@example.com"), Some("Alpha")),
            make_task("X-9", None, Some("Alpha")),
        ],
        &transport,
    );

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.sent, 1);

    let sent = transport.sent.lock().unwrap();
    assert!(!sent[0].raw.contains("X-9"));
}

#[tokio::test]
async fn test_one_email_per_recipient() {
    let transport = RecordingTransport::default();
    let orch = orchestrator(
        vec![
            make_task("A-1", Some("alice@example.com"), Some("Alpha")),
            make_task("B-1", Some("bob@example.com"), Some("Alpha")),
            make_task("A-2", Some("alice@example.com"), None),
        ],
        &transport,
    );

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.recipients, 2);
    assert_eq!(report.sent, 2);

    let sent = transport.sent.lock().unwrap();
    let alice = sent
        .iter()
        .find(|s| s.to == ["alice@example.com"])
        .unwrap();
    assert!(alice.raw.contains("A-1:") && alice.raw.contains("A-2:"));
    assert!(!alice.raw.contains("B-1:"));
    assert!(alice.raw.contains("Project: Unknown Project"));
}

#[tokio::test]
async fn test_failed_recipient_does_not_stop_others() {
    let transport = RecordingTransport {
        reject: vec!["bob@example.com".to_string()],
        ..Default::default()
    };
    let orch = orchestrator(
        vec![
            make_task("A-1", Some("alice@example.com"), Some("Alpha")),
            make_task("B-1", Some("bob@example.com"), Some("Beta")),
        ],
        &transport,
    );

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);

    // Bob's message went through both strategies before giving up.
    assert_eq!(transport.sessions.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_fetch_failure_aborts_run() {
    let transport = RecordingTransport::default();
    let orch = Orchestrator::new(
        FakeSource::failing(),
        Mailer::with_transport(&mail_config(false), transport.clone()),
    );

    let err = orch.run(1, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Tracker { status: 503, .. }));
    assert!(transport.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_sends_nothing() {
    let transport = RecordingTransport::default();
    let orch = Orchestrator::new(
        FakeSource::with(vec![make_task("A-1", Some("alice@example.com"), None)]),
        Mailer::with_transport(&mail_config(true), transport.clone()),
    );

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.sent, 0);
    assert_eq!(report.dry_run, 1);
    assert!(transport.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_per_task_mode() {
    let transport = RecordingTransport::default();
    let orch = orchestrator(
        vec![
            make_task("A-1", Some("alice@example.com"), Some("Alpha")),
            make_task("A-2", Some("alice@example.com"), Some("Beta")),
        ],
        &transport,
    )
    .with_mode(NotifyMode::PerTask);

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.recipients, 1);
    assert_eq!(report.sent, 2);

    let sent = transport.sent.lock().unwrap();
    assert!(sent[0].raw.contains("Task A-1 is approaching its deadline"));
    assert!(sent[1].raw.contains("Task A-2 is approaching its deadline"));
}

#[tokio::test]
async fn test_per_task_mode_counts_each_message() {
    let transport = RecordingTransport {
        reject_containing: vec!["Task A-2 is approaching".to_string()],
        ..Default::default()
    };
    let orch = orchestrator(
        vec![
            make_task("A-1", Some("alice@example.com"), Some("Alpha")),
            make_task("A-2", Some("alice@example.com"), Some("Alpha")),
            make_task("A-3", Some("alice@example.com"), Some("Alpha")),
        ],
        &transport,
    )
    .with_mode(NotifyMode::PerTask);

    let report = orch.run(1, 0).await.unwrap();
    assert_eq!(report.recipients, 1);
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 1);

    let sent = transport.sent.lock().unwrap();
    assert!(sent.iter().all(|s| !s.raw.contains("Task A-2")));
}
