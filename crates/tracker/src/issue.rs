//! Raw search-response shapes and their normalization into [`Task`].

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use reminder_common::types::{DISPLAY_OFFSET, DISPLAY_TZ_LABEL, Task};

/// Body of a search response. A missing `issues` array means no results.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    pub summary: Option<String>,
    pub duedate: Option<String>,
    pub assignee: Option<RawUser>,
    pub status: Option<RawStatus>,
    pub project: Option<RawProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStatus {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProject {
    pub name: Option<String>,
    pub key: Option<String>,
}

impl RawIssue {
    /// Flatten into a [`Task`], resolving its recipient against the leader override.
    pub fn into_task(self, leader_email: Option<&str>) -> Task {
        let IssueFields {
            summary,
            duedate,
            assignee,
            project,
            ..
        } = self.fields;

        Task {
            key: self.key,
            summary: summary.unwrap_or_default(),
            due_date: format_due_date(duedate.as_deref()),
            recipient: resolve_recipient(leader_email, assignee.as_ref()),
            assignee: assignee.and_then(|a| a.display_name),
            project: project.and_then(project_label),
        }
    }
}

/// Leader override wins for every task; otherwise the assignee's address, if any.
pub fn resolve_recipient(leader_email: Option<&str>, assignee: Option<&RawUser>) -> Option<String> {
    match leader_email {
        Some(leader) => Some(leader.to_string()),
        None => assignee
            .and_then(|a| a.email_address.as_deref())
            .filter(|email| !email.is_empty())
            .map(str::to_string),
    }
}

/// Convert a date-only due value (midnight UTC) to the UTC+7 display form.
///
/// Values that don't parse as `YYYY-MM-DD` are passed through untouched.
pub fn format_due_date(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|r| !r.is_empty())?;

    let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
        tracing::debug!(due = raw, "Unparseable due date, passing through");
        return Some(raw.to_string());
    };

    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let local = midnight.with_timezone(&DISPLAY_OFFSET);
    Some(format!("{} {}", local.format("%Y-%m-%d %H:%M"), DISPLAY_TZ_LABEL))
}

fn project_label(project: RawProject) -> Option<String> {
    project
        .name
        .filter(|n| !n.is_empty())
        .or(project.key.filter(|k| !k.is_empty()))
}
