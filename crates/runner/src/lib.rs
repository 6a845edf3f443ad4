//! Orchestration for the task reminder: fetch due-soon tasks, group them by
//! recipient, compose and deliver one notification per recipient.

pub mod cli;
pub mod orchestrator;
pub mod schedule;
