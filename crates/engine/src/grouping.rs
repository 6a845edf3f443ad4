use std::collections::HashMap;

use reminder_common::types::Task;

/// Tasks bucketed by recipient, plus the tasks that had nobody to notify.
#[derive(Debug, Default)]
pub struct RecipientGroups {
    /// Recipient address → tasks in fetch order.
    pub groups: HashMap<String, Vec<Task>>,
    /// Tasks without a resolvable recipient, in fetch order.
    pub skipped: Vec<Task>,
}

impl RecipientGroups {
    pub fn total_grouped(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group tasks by resolved recipient. Every task lands in exactly one group or in `skipped`.
///
/// Iteration order over recipients is unspecified.
pub fn group_by_recipient(tasks: Vec<Task>) -> RecipientGroups {
    let mut result = RecipientGroups::default();

    for task in tasks {
        match task.recipient.clone() {
            Some(recipient) => result.groups.entry(recipient).or_default().push(task),
            None => {
                tracing::info!(key = %task.key, "Task has no recipient, skipping");
                result.skipped.push(task);
            }
        }
    }

    result
}
