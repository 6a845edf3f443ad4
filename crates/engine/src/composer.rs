//! Plain-text templates for reminder emails. Pure: no I/O, never fails.

use std::fmt::Write;

use reminder_common::types::{DISPLAY_TZ_LABEL, NotificationPayload, Task};

const SUBJECT_PREFIX: &str = "[Jira]";
const UNKNOWN_PROJECT: &str = "Unknown Project";
const UNASSIGNED: &str = "Unassigned";
const NO_DUE_DATE: &str = "n/a";
const SIGNATURE: &str = "Regards,\nTask Reminder System";
const CLOSING: &str = "Please check and remind team members to stay on schedule.";

/// Alert for a single task.
pub fn compose_single(task: &Task) -> NotificationPayload {
    let subject = format!(
        "{SUBJECT_PREFIX} Task {} is approaching its deadline!",
        task.key
    );

    let mut body = String::from("Hello,\n\nThe following task is approaching its deadline:\n");
    let _ = writeln!(body, "- Key: {}", task.key);
    let _ = writeln!(body, "- Title: {}", task.summary);
    if let Some(project) = &task.project {
        let _ = writeln!(body, "- Project: {project}");
    }
    let _ = writeln!(body, "- Deadline: {}", due_label(task));
    let _ = writeln!(body, "- Assignee: {}", assignee_label(task));
    let _ = write!(body, "\n{CLOSING}\n\n{SIGNATURE}\n");

    NotificationPayload { subject, body }
}

/// One summary for all of a recipient's tasks, grouped under project headings.
///
/// Projects appear in first-seen order, tasks in input order. Tasks without a
/// project land under a single "Unknown Project" heading.
pub fn compose_summary(tasks: &[Task]) -> NotificationPayload {
    let subject = format!(
        "{SUBJECT_PREFIX} Summary: {} tasks approaching deadline",
        tasks.len()
    );

    let mut body = format!("(Times shown in {DISPLAY_TZ_LABEL})\n\n");
    body.push_str("Hello,\n\nBelow are the tasks approaching their deadline:\n\n");

    for (project, group) in group_by_project(tasks) {
        let _ = writeln!(body, "Project: {project}");
        for task in group {
            let _ = writeln!(
                body,
                "  - {}: {} (due: {}) - {}",
                task.key,
                task.summary,
                due_label(task),
                assignee_label(task)
            );
        }
        body.push('\n');
    }

    let _ = write!(body, "\n{CLOSING}\n\n{SIGNATURE}");

    NotificationPayload { subject, body }
}

fn group_by_project(tasks: &[Task]) -> Vec<(&str, Vec<&Task>)> {
    let mut groups: Vec<(&str, Vec<&Task>)> = Vec::new();
    for task in tasks {
        let project = task.project.as_deref().unwrap_or(UNKNOWN_PROJECT);
        match groups.iter().position(|(name, _)| *name == project) {
            Some(idx) => groups[idx].1.push(task),
            None => groups.push((project, vec![task])),
        }
    }
    groups
}

fn due_label(task: &Task) -> &str {
    task.due_date.as_deref().unwrap_or(NO_DUE_DATE)
}

fn assignee_label(task: &Task) -> &str {
    task.assignee.as_deref().unwrap_or(UNASSIGNED)
}
