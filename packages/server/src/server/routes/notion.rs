//! One-shot passthroughs to the Notion API.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notion_client::NotionError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    pub page_id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub db_id: String,
    pub page_name: String,
    #[serde(default)]
    pub header: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendBlockRequest {
    pub page_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub page_id: String,
    pub comment: String,
}

fn respond(result: Result<Value, NotionError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Notion request failed");
            let status = match e {
                NotionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// POST /databases
pub async fn create_database_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CreateDatabaseRequest>,
) -> Response {
    respond(
        state
            .notion
            .create_database(&request.page_id, &request.title)
            .await,
    )
}

/// POST /pages
pub async fn create_page_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CreatePageRequest>,
) -> Response {
    respond(
        state
            .notion
            .create_page(&request.db_id, &request.page_name, &request.header)
            .await,
    )
}

/// POST /blocks
pub async fn append_block_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<AppendBlockRequest>,
) -> Response {
    respond(
        state
            .notion
            .append_paragraph(&request.page_id, &request.content)
            .await,
    )
}

/// POST /comments
pub async fn create_comment_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CreateCommentRequest>,
) -> Response {
    respond(
        state
            .notion
            .create_comment(&request.page_id, &request.comment)
            .await,
    )
}
