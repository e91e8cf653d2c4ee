//! Compare a fresh task list against the snapshot.

use std::collections::HashSet;

use crate::domains::tasks::models::snapshot::SnapshotStore;
use crate::domains::tasks::models::task::{StatusChange, Task};

/// Tasks whose status differs from the stored one.
///
/// Unknown records are inserted with their current status and never reported
/// on the cycle they first appear. The store is otherwise left untouched;
/// applying the changes is up to the caller. A record id that appears more
/// than once is only compared on its first occurrence.
pub fn diff_tasks(tasks: Vec<Task>, store: &mut SnapshotStore) -> Vec<StatusChange> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut changes = Vec::new();

    for task in tasks {
        if !seen.insert(task.record_id.clone()) {
            continue;
        }

        let previous = store.get_or_init(&task.record_id, &task.status);
        if previous != task.status {
            let previous = previous.to_string();
            changes.push(StatusChange::new(task, previous));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_record_is_not_a_change() {
        let mut store = SnapshotStore::new();

        let changes = diff_tasks(vec![Task::new("r1", "Todo", "X")], &mut store);

        assert!(changes.is_empty());
        assert_eq!(store.get("r1"), Some("Todo"));
    }

    #[test]
    fn test_changed_status_is_reported() {
        let mut store = SnapshotStore::new();
        store.set("r1", "Todo");

        let changes = diff_tasks(vec![Task::new("r1", "Done", "X")], &mut store);

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            StatusChange {
                record_id: "r1".into(),
                title: "X".into(),
                previous: "Todo".into(),
                current: "Done".into(),
            }
        );

        // diff does not apply the change itself
        assert_eq!(store.get("r1"), Some("Todo"));
        for change in &changes {
            store.set(&change.record_id, &change.current);
        }
        assert_eq!(store.get("r1"), Some("Done"));
    }

    #[test]
    fn test_unchanged_list_is_stable() {
        let mut store = SnapshotStore::new();
        store.set("r1", "Todo");
        let tasks = vec![Task::new("r1", "Todo", "X"), Task::new("r2", "Done", "Y")];

        assert!(diff_tasks(tasks.clone(), &mut store).is_empty());
        assert!(diff_tasks(tasks, &mut store).is_empty());
    }

    #[test]
    fn test_duplicate_record_reported_once() {
        let mut store = SnapshotStore::new();
        store.set("r1", "Todo");

        let changes = diff_tasks(
            vec![Task::new("r1", "Done", "X"), Task::new("r1", "Done", "X")],
            &mut store,
        );

        assert_eq!(changes.len(), 1);
    }
}
