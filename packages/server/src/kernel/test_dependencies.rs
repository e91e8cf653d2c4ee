// TestDependencies - mock implementations for testing
//
// Provides an in-memory record store and a recording sink that can be
// injected into the Poller for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use notion_client::{
    Page, PageProperty, PropertyItem, PropertyItemPage, PropertyItemResponse, QueryPage, RichText,
    SelectOption,
};
use tokio::sync::Semaphore;

use super::scheduled_tasks::Poller;
use super::{BaseChangeSink, BaseRecordStore};
use crate::config::{WatchConfig, DEFAULT_STATUS_PROPERTY, DEFAULT_TITLE_PROPERTY};
use crate::domains::tasks::StatusChange;

/// Property id the mock uses for the status (select) property.
pub const STATUS_PROPERTY_ID: &str = "%3AStS";

/// Property id the mock uses for the title property.
pub const TITLE_PROPERTY_ID: &str = "title";

// =============================================================================
// Mock Record Store
// =============================================================================

/// A record held by [`MockRecordStore`].
#[derive(Debug, Clone)]
pub struct MockRecord {
    pub id: String,
    pub status: Option<String>,
    pub title_fragments: Vec<String>,
    /// When false the page exposes no properties at all
    pub has_properties: bool,
}

impl MockRecord {
    pub fn new(id: &str, status: Option<&str>, title: &str) -> Self {
        Self::with_title_fragments(id, status, &[title])
    }

    /// A record whose title is split over several rich text items.
    pub fn with_title_fragments(id: &str, status: Option<&str>, fragments: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            status: status.map(str::to_string),
            title_fragments: fragments.iter().map(|f| f.to_string()).collect(),
            has_properties: true,
        }
    }

    /// A record without status or title properties.
    pub fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: None,
            title_fragments: Vec::new(),
            has_properties: false,
        }
    }

    fn to_page(&self) -> Page {
        let mut properties = HashMap::new();
        if self.has_properties {
            properties.insert(
                DEFAULT_STATUS_PROPERTY.to_string(),
                PageProperty {
                    id: STATUS_PROPERTY_ID.to_string(),
                },
            );
            properties.insert(
                DEFAULT_TITLE_PROPERTY.to_string(),
                PageProperty {
                    id: TITLE_PROPERTY_ID.to_string(),
                },
            );
        }

        Page {
            id: self.id.clone(),
            properties,
        }
    }
}

/// Arguments captured from a retrieve_property call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCall {
    pub record_id: String,
    pub property_id: String,
    pub cursor: Option<String>,
}

pub struct MockRecordStore {
    records: Mutex<Vec<MockRecord>>,
    collection_page_size: usize,
    property_page_size: usize,
    failing: Mutex<HashSet<String>>,
    failing_continuations: Mutex<HashSet<String>>,
    gate: Option<Arc<Semaphore>>,
    query_calls: Mutex<Vec<Option<String>>>,
    property_calls: Mutex<Vec<PropertyCall>>,
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            collection_page_size: 100,
            property_page_size: 25,
            failing: Mutex::new(HashSet::new()),
            failing_continuations: Mutex::new(HashSet::new()),
            gate: None,
            query_calls: Mutex::new(Vec::new()),
            property_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_record(self, record: MockRecord) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Number of records per collection page
    pub fn with_collection_page_size(mut self, size: usize) -> Self {
        self.collection_page_size = size.max(1);
        self
    }

    /// Number of title items per property page
    pub fn with_property_page_size(mut self, size: usize) -> Self {
        self.property_page_size = size.max(1);
        self
    }

    /// Every query_collection call takes (and keeps) a permit from `gate` first
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Make every property retrieval for `record_id` fail
    pub fn fail_record(self, record_id: &str) -> Self {
        self.set_failing(record_id, true);
        self
    }

    /// Make continuation (cursor) property retrievals for `record_id` fail
    pub fn fail_continuations_for(self, record_id: &str) -> Self {
        self.failing_continuations
            .lock()
            .unwrap()
            .insert(record_id.to_string());
        self
    }

    pub fn set_failing(&self, record_id: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(record_id.to_string());
        } else {
            set.remove(record_id);
        }
    }

    /// Change a record's status as if edited remotely
    pub fn set_status(&self, record_id: &str, status: Option<&str>) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id == record_id) {
            record.status = status.map(str::to_string);
        }
    }

    pub fn add_record(&self, record: MockRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn remove_record(&self, record_id: &str) {
        self.records.lock().unwrap().retain(|r| r.id != record_id);
    }

    /// Cursors passed to query_collection, in call order
    pub fn query_calls(&self) -> Vec<Option<String>> {
        self.query_calls.lock().unwrap().clone()
    }

    /// All retrieve_property calls, in call order
    pub fn property_calls(&self) -> Vec<PropertyCall> {
        self.property_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.query_calls.lock().unwrap().clear();
        self.property_calls.lock().unwrap().clear();
    }

    fn parse_offset(cursor: Option<&str>) -> Result<usize> {
        cursor
            .map(|c| c.parse::<usize>().context("Invalid cursor"))
            .transpose()
            .map(|offset| offset.unwrap_or(0))
    }
}

#[async_trait]
impl BaseRecordStore for MockRecordStore {
    async fn query_collection(
        &self,
        _collection_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage> {
        self.query_calls
            .lock()
            .unwrap()
            .push(cursor.map(str::to_string));

        // Each query consumes one permit
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        let offset = Self::parse_offset(cursor)?;
        let records = self.records.lock().unwrap();
        let end = (offset + self.collection_page_size).min(records.len());
        let results = records
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(MockRecord::to_page)
            .collect();
        let has_more = end < records.len();

        Ok(QueryPage {
            results,
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn retrieve_property(
        &self,
        record_id: &str,
        property_id: &str,
        cursor: Option<&str>,
    ) -> Result<PropertyItemResponse> {
        self.property_calls.lock().unwrap().push(PropertyCall {
            record_id: record_id.to_string(),
            property_id: property_id.to_string(),
            cursor: cursor.map(str::to_string),
        });

        if self.failing.lock().unwrap().contains(record_id) {
            bail!("Notion API error (503): service unavailable for {record_id}");
        }
        if cursor.is_some() && self.failing_continuations.lock().unwrap().contains(record_id) {
            bail!("Notion API error (502): bad gateway for {record_id}");
        }

        let record = self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| anyhow!("Notion API error (404): object_not_found {record_id}"))?;

        match property_id {
            STATUS_PROPERTY_ID => Ok(PropertyItemResponse::Single(PropertyItem {
                select: record.status.map(|name| SelectOption { name }),
                title: None,
            })),
            TITLE_PROPERTY_ID => {
                let offset = Self::parse_offset(cursor)?;
                let fragments = &record.title_fragments;
                let end = (offset + self.property_page_size).min(fragments.len());
                let results = fragments
                    .get(offset..end)
                    .unwrap_or_default()
                    .iter()
                    .map(|text| PropertyItem {
                        select: None,
                        title: Some(RichText {
                            plain_text: text.clone(),
                        }),
                    })
                    .collect();
                let has_more = end < fragments.len();

                Ok(PropertyItemResponse::Paged(PropertyItemPage {
                    results,
                    next_cursor: has_more.then(|| end.to_string()),
                    has_more: Some(has_more),
                }))
            }
            other => bail!("Notion API error (404): unknown property {other}"),
        }
    }
}

// =============================================================================
// Spy Change Sink
// =============================================================================

#[derive(Default)]
pub struct SpyChangeSink {
    changes: Mutex<Vec<StatusChange>>,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl SpyChangeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record changes but report every notification as failed
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Sleep for `delay` inside every notification before recording it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all changes that were delivered
    pub fn changes(&self) -> Vec<StatusChange> {
        self.changes.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.changes.lock().unwrap().clear();
    }
}

#[async_trait]
impl BaseChangeSink for SpyChangeSink {
    async fn notify(&self, change: &StatusChange) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.changes.lock().unwrap().push(change.clone());
        if self.fail.load(Ordering::SeqCst) {
            bail!("sink rejected change for {}", change.record_id);
        }
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks wired together for poller tests.
pub struct TestDependencies {
    pub records: Arc<MockRecordStore>,
    pub sink: Arc<SpyChangeSink>,
}

impl TestDependencies {
    pub fn new(records: MockRecordStore) -> Self {
        Self {
            records: Arc::new(records),
            sink: Arc::new(SpyChangeSink::new()),
        }
    }

    pub fn with_sink(mut self, sink: SpyChangeSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Build a poller over these mocks.
    pub fn poller(&self, config: WatchConfig) -> Arc<Poller> {
        Arc::new(Poller::new(self.records.clone(), self.sink.clone(), config))
    }
}
