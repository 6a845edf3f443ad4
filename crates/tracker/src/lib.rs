//! Issue fetcher: queries the tracker's search endpoint for open issues due
//! inside a date window and flattens them into [`Task`] records.
//!
//! [`Task`]: reminder_common::types::Task

pub mod client;
pub mod fetcher;
pub mod issue;
pub mod query;

pub use fetcher::{TaskFetcher, TaskSource};
