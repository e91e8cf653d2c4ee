use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wire version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// A database row ("page") as returned by a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    /// Property references keyed by property name.
    #[serde(default)]
    pub properties: HashMap<String, PageProperty>,
}

impl Page {
    /// Look up the identifier of a named property on this page.
    pub fn property_id(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.id.as_str())
    }
}

/// Reference to a property on a page. The value itself is fetched separately.
#[derive(Debug, Clone, Deserialize)]
pub struct PageProperty {
    pub id: String,
}

/// One page of a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl QueryPage {
    /// Cursor for the next page, if the server reported one.
    pub fn continuation(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Body of `POST /databases/{id}/query`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// Selected option of a select property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// A rich text fragment. Only the rendered text is retained.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// A single property value item.
///
/// Simple properties (select, number, date, ...) are returned as one item.
/// List-valued properties (title, rich_text, relation, people) are returned
/// as a paginated list of items, one per fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyItem {
    #[serde(default)]
    pub select: Option<SelectOption>,
    #[serde(default)]
    pub title: Option<RichText>,
}

impl PropertyItem {
    /// Name of the selected option, if any.
    pub fn select_name(&self) -> Option<&str> {
        self.select.as_ref().map(|s| s.name.as_str())
    }

    /// Plain text of the title fragment, if any.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(|t| t.plain_text.as_str())
    }
}

/// One page of a paginated property value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyItemPage {
    #[serde(default)]
    pub results: Vec<PropertyItem>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl PropertyItemPage {
    /// Cursor for the next page. `has_more: false` or an empty cursor ends
    /// the sequence even if a cursor string is present.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more == Some(false) {
            return None;
        }
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Response of `GET /pages/{page_id}/properties/{property_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "object")]
pub enum PropertyItemResponse {
    /// Terminal, non-paginated value.
    #[serde(rename = "property_item")]
    Single(PropertyItem),
    /// One page of a paginated value.
    #[serde(rename = "list")]
    Paged(PropertyItemPage),
    /// Anything else. Carries no items.
    #[serde(other)]
    Unknown,
}

impl PropertyItemResponse {
    /// Decode a response body, mapping unrecognised shapes to `Unknown`
    /// instead of failing.
    pub fn from_json(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Unrecognised property item shape");
                PropertyItemResponse::Unknown
            }
        }
    }
}
