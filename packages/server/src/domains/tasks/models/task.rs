use std::fmt;

use serde::Serialize;

/// A database row as seen by one poll cycle.
///
/// Rebuilt from the remote store on every cycle; only `status` outlives the
/// cycle, inside the [`SnapshotStore`](super::SnapshotStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub record_id: String,
    pub status: String,
    pub title: String,
}

impl Task {
    pub fn new(
        record_id: impl Into<String>,
        status: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            status: status.into(),
            title: title.into(),
        }
    }
}

/// A task whose status differs from the last-known snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub record_id: String,
    pub title: String,
    pub previous: String,
    pub current: String,
}

impl StatusChange {
    pub fn new(task: Task, previous: impl Into<String>) -> Self {
        Self {
            record_id: task.record_id,
            title: task.title,
            previous: previous.into(),
            current: task.status,
        }
    }
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" ({}) changed status: {} → {}",
            self.title, self.record_id, self.previous, self.current
        )
    }
}
