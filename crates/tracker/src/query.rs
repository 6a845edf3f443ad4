use chrono::{Days, NaiveDate, Utc};

/// Fields requested from the search endpoint.
pub const SEARCH_FIELDS: &str = "key,summary,duedate,assignee,status,project";

/// Status name treated as terminal; issues in it are never reported.
pub const DONE_STATUS: &str = "Done";

/// Inclusive range of due dates to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DueWindow {
    /// `[today - lookback_days, today + lookahead_days]`, both ends inclusive.
    pub fn around(today: NaiveDate, lookahead_days: u32, lookback_days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let end = today
            .checked_add_days(Days::new(u64::from(lookahead_days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Window around the current UTC date.
    pub fn from_today(lookahead_days: u32, lookback_days: u32) -> Self {
        Self::around(Utc::now().date_naive(), lookahead_days, lookback_days)
    }

    /// JQL selecting unfinished issues whose due date falls inside the window.
    pub fn jql(&self) -> String {
        format!(
            "status != {} AND duedate >= \"{}\" AND duedate <= \"{}\"",
            DONE_STATUS,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
        )
    }
}
