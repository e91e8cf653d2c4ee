//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{LogChangeSink, NotionRecordStore};
pub use scheduled_tasks::{CycleOutcome, Poller, PollerHandle, PollerState, PollerStats};
pub use test_dependencies::TestDependencies;
pub use traits::*;
