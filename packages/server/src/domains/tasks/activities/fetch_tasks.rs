//! Read every row of the watched database as a [`Task`].

use anyhow::{Context, Result};
use notion_client::Page;
use tracing::debug;

use super::extract::{extract_status, extract_title};
use super::resolve_property::{resolve_property, PropertyValue};
use crate::config::WatchConfig;
use crate::domains::tasks::models::task::Task;
use crate::kernel::BaseRecordStore;

/// Fetch all records of the watched collection and materialize their
/// status and title.
///
/// Records are processed one at a time. A failure on any record aborts the
/// whole fetch and no partial list is returned.
pub async fn fetch_tasks(store: &dyn BaseRecordStore, config: &WatchConfig) -> Result<Vec<Task>> {
    let records = query_all_records(store, &config.collection_id).await?;

    let mut tasks = Vec::with_capacity(records.len());
    for record in &records {
        let status = resolve_named(store, record, &config.status_property).await?;
        let title = resolve_named(store, record, &config.title_property).await?;

        tasks.push(Task {
            record_id: record.id.clone(),
            status: extract_status(status.as_ref()),
            title: extract_title(title.as_ref()),
        });
    }

    debug!(count = tasks.len(), "Fetched tasks");
    Ok(tasks)
}

async fn query_all_records(store: &dyn BaseRecordStore, collection_id: &str) -> Result<Vec<Page>> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store
            .query_collection(collection_id, cursor.as_deref())
            .await
            .with_context(|| format!("Failed to query collection {collection_id}"))?;
        pages += 1;

        let next = page.continuation().map(str::to_string);
        records.extend(page.results);

        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(collection_id, pages, count = records.len(), "Queried collection");
    Ok(records)
}

/// Resolve a property by name. A record without that property has no value.
async fn resolve_named(
    store: &dyn BaseRecordStore,
    record: &Page,
    property_name: &str,
) -> Result<Option<PropertyValue>> {
    let Some(property_id) = record.property_id(property_name) else {
        debug!(record_id = %record.id, property_name, "Record has no such property");
        return Ok(None);
    };

    resolve_property(store, &record.id, property_id)
        .await
        .map(Some)
}
