//! Render a Notion page and its nested blocks into one HTML document.
//!
//! ```no_run
//! # async fn demo() -> Result<(), notion_html::application::render::RenderError> {
//! let html = notion_html::render("secret_token", "0123456789abcdef0123456789abcdef", "").await?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod infra;

pub use notion_html_api_types as api;

use std::sync::Arc;

use application::content::ContentError;
use application::render::{DocumentRenderer, FetchPolicy, RenderError, RenderOptions};
use infra::notion::{NotionClientConfig, NotionHttpClient};

/// Render `page_id` with default settings, authenticating with `credential`.
/// `head` is inserted verbatim into the document's `<head>`.
pub async fn render(credential: &str, page_id: &str, head: &str) -> Result<String, RenderError> {
    let client = NotionClientConfig::new(credential)
        .and_then(NotionHttpClient::new)
        .map_err(|err| ContentError::invalid_request(err.to_string()))?;

    DocumentRenderer::new(
        Arc::new(client),
        FetchPolicy::default(),
        RenderOptions::default(),
    )
    .render_document(page_id, head)
    .await
}
