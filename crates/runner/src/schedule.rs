//! In-process daily trigger: runs the reminder every day at 15:30 UTC+7.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use reminder_common::types::{DISPLAY_OFFSET, DISPLAY_TZ_LABEL};
use reminder_notifier::MailTransport;
use reminder_tracker::TaskSource;

use crate::orchestrator::Orchestrator;

/// Local (UTC+7) wall-clock time of the daily run.
pub const DAILY_RUN_HOUR: u32 = 15;
pub const DAILY_RUN_MINUTE: u32 = 30;

const DAILY_RUN_TIME: NaiveTime =
    match NaiveTime::from_hms_opt(DAILY_RUN_HOUR, DAILY_RUN_MINUTE, 0) {
        Some(time) => time,
        None => panic!("invalid daily run time"),
    };

/// Scheduled runs use a fixed ±1 day window.
pub const SCHEDULED_LOOKAHEAD_DAYS: u32 = 1;
pub const SCHEDULED_LOOKBACK_DAYS: u32 = 1;

/// First 15:30 UTC+7 strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_now = now.naive_utc() + DISPLAY_OFFSET;
    let mut next = local_now.date().and_time(DAILY_RUN_TIME);
    if next <= local_now {
        next += Duration::days(1);
    }

    Utc.from_utc_datetime(&(next - DISPLAY_OFFSET))
}

/// Run forever, once per day. A failed run is logged and the loop waits for the next tick.
pub async fn run_daily<S: TaskSource, T: MailTransport>(orchestrator: &Orchestrator<S, T>) {
    tracing::info!(
        "Scheduler started, will run daily at {DAILY_RUN_HOUR:02}:{DAILY_RUN_MINUTE:02} {DISPLAY_TZ_LABEL}"
    );

    loop {
        let now = Utc::now();
        let next = next_run_after(now);
        tracing::info!(
            next_run = %next.with_timezone(&DISPLAY_OFFSET).format("%Y-%m-%d %H:%M"),
            "Waiting for next scheduled run"
        );
        tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

        tracing::info!("Running scheduled reminder");
        if let Err(e) = orchestrator
            .run(SCHEDULED_LOOKAHEAD_DAYS, SCHEDULED_LOOKBACK_DAYS)
            .await
        {
            tracing::error!(error = %e, "Scheduled run failed");
        }
    }
}
