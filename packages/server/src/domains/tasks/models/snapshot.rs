//! Last-known status per record.

use std::collections::HashMap;

use super::task::Task;

/// Mapping from record id to the last status observed for it.
///
/// Entries are never removed: a record deleted remotely keeps its stale
/// status until the process exits.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    statuses: HashMap<String, String>,
}

impl SnapshotStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load statuses, overwriting whatever is already stored.
    pub fn seed<'a>(&mut self, tasks: impl IntoIterator<Item = &'a Task>) {
        for task in tasks {
            self.statuses
                .insert(task.record_id.clone(), task.status.clone());
        }
    }

    /// Stored status for `record_id`, inserting `candidate` first if the
    /// record has never been seen. Known records are returned unchanged.
    pub fn get_or_init(&mut self, record_id: &str, candidate: &str) -> &str {
        self.statuses
            .entry(record_id.to_string())
            .or_insert_with(|| candidate.to_string())
    }

    /// Overwrite the stored status.
    pub fn set(&mut self, record_id: impl Into<String>, status: impl Into<String>) {
        self.statuses.insert(record_id.into(), status.into());
    }

    pub fn get(&self, record_id: &str) -> Option<&str> {
        self.statuses.get(record_id).map(String::as_str)
    }

    /// Number of records ever observed.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_init_inserts_unknown_record() {
        let mut store = SnapshotStore::new();

        assert_eq!(store.get_or_init("r1", "Todo"), "Todo");
        assert_eq!(store.get("r1"), Some("Todo"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_get_or_init_does_not_update_known_record() {
        let mut store = SnapshotStore::new();
        store.set("r1", "Todo");

        assert_eq!(store.get_or_init("r1", "Done"), "Todo");
        assert_eq!(store.get("r1"), Some("Todo"));
    }

    #[test]
    fn test_seed_overwrites_existing_entries() {
        let mut store = SnapshotStore::new();
        store.set("r1", "Todo");

        let tasks = vec![Task::new("r1", "Done", "A"), Task::new("r2", "Todo", "B")];
        store.seed(&tasks);

        assert_eq!(store.get("r1"), Some("Done"));
        assert_eq!(store.get("r2"), Some("Todo"));
        assert_eq!(store.len(), 2);
    }
}
