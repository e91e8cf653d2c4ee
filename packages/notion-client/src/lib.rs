//! Pure Notion REST API client.
//!
//! A minimal client for the Notion API. Supports querying databases page by
//! page, retrieving individual property values (paginated or not), and a few
//! one-shot create calls (databases, pages, blocks, comments).
//!
//! # Example
//!
//! ```rust,ignore
//! use notion_client::{NotionClient, PropertyItemResponse};
//!
//! let client = NotionClient::new("secret_...".into());
//!
//! let page = client.query_database("database-id", None).await?;
//! for row in &page.results {
//!     if let Some(id) = row.property_id("Name") {
//!         let value = client.retrieve_property(&row.id, id, None).await?;
//!         println!("{:?}", value);
//!     }
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{NotionError, Result};
pub use types::{
    Page, PageProperty, PropertyItem, PropertyItemPage, PropertyItemResponse, QueryPage,
    QueryRequest, RichText, SelectOption, NOTION_VERSION,
};

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

const BASE_URL: &str = "https://api.notion.com/v1";

#[derive(Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, BASE_URL.to_string())
    }

    /// Create a client that talks to a different API root (proxies, tests).
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A request against `path` with the integration key and API version set.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        if self.token.is_empty() {
            return Err(NotionError::Config("Notion integration key is empty".into()));
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn query_database_request(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> RequestBuilder {
        let body = QueryRequest {
            start_cursor: start_cursor.map(str::to_string),
        };
        self.request(Method::POST, &format!("/databases/{}/query", database_id))
            .json(&body)
    }

    fn retrieve_property_request(
        &self,
        page_id: &str,
        property_id: &str,
        start_cursor: Option<&str>,
    ) -> RequestBuilder {
        let request = self.request(
            Method::GET,
            &format!("/pages/{}/properties/{}", page_id, property_id),
        );
        match start_cursor {
            Some(cursor) => request.query(&[("start_cursor", cursor)]),
            None => request,
        }
    }

    fn create_database_request(&self, parent_page_id: &str, title: &str) -> RequestBuilder {
        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id },
            "title": [{ "type": "text", "text": { "content": title } }],
            "properties": {
                "Name": { "title": {} }
            }
        });
        self.request(Method::POST, "/databases").json(&body)
    }

    fn create_page_request(&self, database_id: &str, title: &str, header: &str) -> RequestBuilder {
        let body = json!({
            "parent": { "type": "database_id", "database_id": database_id },
            "properties": {
                "Name": {
                    "title": [{ "text": { "content": title } }]
                }
            },
            "children": [{
                "object": "block",
                "heading_2": {
                    "rich_text": [{ "text": { "content": header } }]
                }
            }]
        });
        self.request(Method::POST, "/pages").json(&body)
    }

    fn append_paragraph_request(&self, block_id: &str, content: &str) -> RequestBuilder {
        let body = json!({
            "children": [{
                "paragraph": {
                    "rich_text": [{ "text": { "content": content } }]
                }
            }]
        });
        self.request(Method::PATCH, &format!("/blocks/{}/children", block_id))
            .json(&body)
    }

    fn create_comment_request(&self, page_id: &str, text: &str) -> RequestBuilder {
        let body = json!({
            "parent": { "page_id": page_id },
            "rich_text": [{ "text": { "content": text } }]
        });
        self.request(Method::POST, "/comments").json(&body)
    }

    /// Fetch one page of database rows, starting at `start_cursor`.
    pub async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<QueryPage> {
        let page: QueryPage = self
            .send(self.query_database_request(database_id, start_cursor))
            .await?;
        tracing::debug!(
            database_id,
            count = page.results.len(),
            has_more = page.has_more,
            "Queried database page"
        );
        Ok(page)
    }

    /// Retrieve one property value of a page.
    ///
    /// The response is either the complete value or one page of it; callers
    /// follow `PropertyItemPage::continuation` to read the rest.
    pub async fn retrieve_property(
        &self,
        page_id: &str,
        property_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<PropertyItemResponse> {
        let value: Value = self
            .send(self.retrieve_property_request(page_id, property_id, start_cursor))
            .await?;
        Ok(PropertyItemResponse::from_json(value))
    }

    /// Create an inline database under a parent page with a single title column.
    pub async fn create_database(&self, parent_page_id: &str, title: &str) -> Result<Value> {
        self.send(self.create_database_request(parent_page_id, title))
            .await
    }

    /// Create a database row with a title and a heading block as its body.
    pub async fn create_page(&self, database_id: &str, title: &str, header: &str) -> Result<Value> {
        self.send(self.create_page_request(database_id, title, header))
            .await
    }

    /// Append a paragraph block to a page or block.
    pub async fn append_paragraph(&self, block_id: &str, content: &str) -> Result<Value> {
        self.send(self.append_paragraph_request(block_id, content))
            .await
    }

    /// Add a top-level comment to a page.
    pub async fn create_comment(&self, page_id: &str, text: &str) -> Result<Value> {
        self.send(self.create_comment_request(page_id, text)).await
    }
}
