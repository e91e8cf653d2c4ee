//! Materialize a property value, following pagination.

use anyhow::{Context, Result};
use notion_client::{PropertyItem, PropertyItemResponse};
use tracing::debug;

use crate::kernel::BaseRecordStore;

/// A fully materialized property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// The API returned the value as one non-paginated item.
    Single(PropertyItem),
    /// Every item of a paginated value, in order, across all pages.
    List(Vec<PropertyItem>),
}

impl PropertyValue {
    /// First item of the value, if any.
    pub fn first(&self) -> Option<&PropertyItem> {
        match self {
            PropertyValue::Single(item) => Some(item),
            PropertyValue::List(items) => items.first(),
        }
    }
}

/// Retrieve a property of a record, reading every continuation page.
///
/// Stops when a page carries no continuation, or when a follow-up call
/// answers with a single item or an unrecognised shape. Any retrieval error
/// aborts the whole resolution.
pub async fn resolve_property(
    store: &dyn BaseRecordStore,
    record_id: &str,
    property_id: &str,
) -> Result<PropertyValue> {
    let first = store
        .retrieve_property(record_id, property_id, None)
        .await
        .with_context(|| format!("Failed to retrieve property {property_id} of {record_id}"))?;

    let mut page = match first {
        PropertyItemResponse::Single(item) => return Ok(PropertyValue::Single(item)),
        PropertyItemResponse::Unknown => return Ok(PropertyValue::List(Vec::new())),
        PropertyItemResponse::Paged(page) => page,
    };

    let mut items = Vec::new();
    let mut pages = 1usize;

    loop {
        let cursor = page.continuation().map(str::to_string);
        items.append(&mut page.results);

        let Some(cursor) = cursor else {
            break;
        };

        let next = store
            .retrieve_property(record_id, property_id, Some(&cursor))
            .await
            .with_context(|| {
                format!(
                    "Failed to retrieve page {} of property {property_id} of {record_id}",
                    pages + 1
                )
            })?;

        match next {
            PropertyItemResponse::Paged(next_page) => {
                page = next_page;
                pages += 1;
            }
            PropertyItemResponse::Single(item) => {
                items.push(item);
                break;
            }
            PropertyItemResponse::Unknown => break,
        }
    }

    debug!(
        record_id,
        property_id,
        pages,
        count = items.len(),
        "Resolved paginated property"
    );

    Ok(PropertyValue::List(items))
}
