use chrono::FixedOffset;

/// Offset of the timezone due dates are displayed in, in hours east of UTC.
pub const DISPLAY_UTC_OFFSET_HOURS: i32 = 7;

/// Label appended to every displayed due date.
pub const DISPLAY_TZ_LABEL: &str = "UTC+7";

/// The fixed display offset (UTC+7).
pub const DISPLAY_OFFSET: FixedOffset =
    match FixedOffset::east_opt(DISPLAY_UTC_OFFSET_HOURS * 3600) {
        Some(offset) => offset,
        None => panic!("display offset out of range"),
    };

/// A due-soon issue flattened from the tracker's search response.
///
/// Created per fetch and discarded at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Tracker-assigned identifier (e.g. `A-1`).
    pub key: String,
    pub summary: String,
    /// Display string in UTC+7, or the raw tracker value if it could not be parsed.
    pub due_date: Option<String>,
    /// Assignee display name.
    pub assignee: Option<String>,
    /// Resolved notification address; tasks without one are skipped.
    pub recipient: Option<String>,
    /// Project name, falling back to the project key.
    pub project: Option<String>,
}

/// Human-readable message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub subject: String,
    pub body: String,
}
