pub mod snapshot;
pub mod task;

pub use snapshot::SnapshotStore;
pub use task::{StatusChange, Task};
