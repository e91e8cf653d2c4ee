// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Change detection lives in domains/tasks and is written against these traits.
//
// Naming convention: Base* for trait names (e.g., BaseRecordStore, BaseChangeSink)

use anyhow::Result;
use async_trait::async_trait;
use notion_client::{PropertyItemResponse, QueryPage};

use crate::domains::tasks::StatusChange;

// =============================================================================
// Record Store Trait (Infrastructure - remote database access)
// =============================================================================

#[async_trait]
pub trait BaseRecordStore: Send + Sync {
    /// Fetch one page of records from a collection, starting at `cursor`
    async fn query_collection(&self, collection_id: &str, cursor: Option<&str>)
        -> Result<QueryPage>;

    /// Fetch a property value (or one page of it) for a record
    async fn retrieve_property(
        &self,
        record_id: &str,
        property_id: &str,
        cursor: Option<&str>,
    ) -> Result<PropertyItemResponse>;
}

// =============================================================================
// Change Sink Trait (Infrastructure - where status changes go)
// =============================================================================

#[async_trait]
pub trait BaseChangeSink: Send + Sync {
    /// Handle one status change. Called after the snapshot has been updated.
    async fn notify(&self, change: &StatusChange) -> Result<()>;
}
