// Production implementations of the kernel traits.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use notion_client::{NotionClient, PropertyItemResponse, QueryPage};
use tracing::info;

use super::{BaseChangeSink, BaseRecordStore};
use crate::domains::tasks::StatusChange;

// =============================================================================
// Notion Adapter
// =============================================================================

/// Adapter to use NotionClient as a BaseRecordStore
#[derive(Clone)]
pub struct NotionRecordStore(pub Arc<NotionClient>);

impl NotionRecordStore {
    pub fn new(client: Arc<NotionClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseRecordStore for NotionRecordStore {
    async fn query_collection(
        &self,
        collection_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage> {
        Ok(self.0.query_database(collection_id, cursor).await?)
    }

    async fn retrieve_property(
        &self,
        record_id: &str,
        property_id: &str,
        cursor: Option<&str>,
    ) -> Result<PropertyItemResponse> {
        Ok(self.0.retrieve_property(record_id, property_id, cursor).await?)
    }
}

// =============================================================================
// Log Sink
// =============================================================================

/// Default sink: one log line per change.
#[derive(Debug, Clone, Default)]
pub struct LogChangeSink;

#[async_trait]
impl BaseChangeSink for LogChangeSink {
    async fn notify(&self, change: &StatusChange) -> Result<()> {
        info!(
            record_id = %change.record_id,
            previous = %change.previous,
            current = %change.current,
            "{}",
            change
        );
        Ok(())
    }
}
