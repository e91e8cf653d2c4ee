//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use notion_client::NotionClient;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::Poller;
use crate::server::routes::{
    append_block_handler, create_comment_handler, create_database_handler, create_page_handler,
    health_handler, poll_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub notion: Arc<NotionClient>,
    pub poller: Arc<Poller>,
}

/// Build the Axum application router
pub fn build_app(notion: Arc<NotionClient>, poller: Arc<Poller>) -> Router {
    let app_state = AppState { notion, poller };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // Passthroughs to the Notion API
        .route("/databases", post(create_database_handler))
        .route("/pages", post(create_page_handler))
        .route("/blocks", post(append_block_handler))
        .route("/comments", post(create_comment_handler))
        // Poller
        .route("/poll", post(poll_handler))
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
