//! Tasks domain activities - change detection building blocks
//!
//! Activities take their collaborators as arguments (`&dyn BaseRecordStore`,
//! `&mut SnapshotStore`) so the poller owns all state.

mod diff;
mod extract;
mod fetch_tasks;
mod resolve_property;

pub use diff::diff_tasks;
pub use extract::{extract_status, extract_title, NO_STATUS, NO_TITLE};
pub use fetch_tasks::fetch_tasks;
pub use resolve_property::{resolve_property, PropertyValue};
