//! Turns fetched tasks into per-recipient notifications.
//!
//! 1. Groups tasks by resolved recipient (via [`grouping::group_by_recipient`])
//! 2. Renders single-task alerts and per-recipient summaries (via [`composer`])

pub mod composer;
pub mod grouping;
