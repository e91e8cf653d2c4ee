// Notion Status Watcher - API Core
//
// Watches a Notion database for task status changes and reports each change
// once. Also exposes a handful of HTTP passthroughs to the Notion API.
//
// Change detection lives in domains/tasks; infrastructure traits, the
// Notion adapter and the scheduled poller live in kernel.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
