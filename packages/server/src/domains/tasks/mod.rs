//! Tasks domain - watches a Notion database for status changes
//!
//! Architecture:
//!   Poller (kernel) → fetch_tasks → diff_tasks → SnapshotStore + BaseChangeSink
//!
//! ```text
//! fetch_tasks()
//!     ├─► query_collection() page by page
//!     └─► per record: resolve_property(status), resolve_property(title)
//!             └─► extract_status / extract_title
//! diff_tasks(tasks, &mut SnapshotStore)
//!     └─► StatusChange for every record whose status moved
//! ```

pub mod activities;
pub mod models;

// Re-export commonly used types
pub use activities::{
    diff_tasks, extract_status, extract_title, fetch_tasks, resolve_property, PropertyValue,
    NO_STATUS, NO_TITLE,
};
pub use models::snapshot::SnapshotStore;
pub use models::task::{StatusChange, Task};
