//! Shared fixtures for poller and HTTP tests.

use std::time::Duration;

use server_core::kernel::test_dependencies::{MockRecord, MockRecordStore};
use server_core::kernel::TestDependencies;
use server_core::WatchConfig;

pub const DATABASE_ID: &str = "test-database";

/// Watch config with a short interval so scheduled tests stay small.
pub fn watch_config() -> WatchConfig {
    WatchConfig::new(DATABASE_ID).with_poll_interval(Duration::from_secs(10))
}

/// Two records: r1 "Todo", r2 "Done".
pub fn two_records() -> MockRecordStore {
    MockRecordStore::new()
        .with_record(MockRecord::new("r1", Some("Todo"), "Write report"))
        .with_record(MockRecord::new("r2", Some("Done"), "File taxes"))
}

pub fn two_record_deps() -> TestDependencies {
    TestDependencies::new(two_records())
}
