//! Page-level assembly: title, caller-supplied head and the rendered body
//! joined into one HTML document.

use std::{sync::Arc, time::Instant};

use tracing::info;

use super::blocks::BlockRenderer;
use super::fetch::{BlockFetcher, FetchPolicy};
use super::lists::normalize;
use super::rich_text::compose_runs;
use super::types::{RenderError, RenderOptions};
use crate::application::content::ContentClient;

/// Renders whole pages. Each call builds its own fetcher, so concurrent
/// renders share nothing but the content client.
pub struct DocumentRenderer {
    client: Arc<dyn ContentClient>,
    policy: FetchPolicy,
    options: RenderOptions,
}

impl DocumentRenderer {
    pub fn new(client: Arc<dyn ContentClient>, policy: FetchPolicy, options: RenderOptions) -> Self {
        Self {
            client,
            policy,
            options,
        }
    }

    /// Render `page_id` as a complete document. `head` is inserted into
    /// `<head>` untouched.
    pub async fn render_document(&self, page_id: &str, head: &str) -> Result<String, RenderError> {
        let started = Instant::now();
        let fetcher = BlockFetcher::new(Arc::clone(&self.client), self.policy.clone());
        let renderer = BlockRenderer::new(fetcher.clone(), self.options.clone());

        info!(target = "notion_html::render", page_id, "Rendering page");

        let (page, children) = tokio::try_join!(fetcher.page(page_id), fetcher.children(page_id))?;

        let title = compose_runs(page.title(), self.options.escape);
        let body = normalize(renderer.render_all(&children).await?);
        let lang = self.options.escape.attribute(&self.options.lang);
        let html = format!(
            r#"<html lang="{lang}"><head><title>{title}</title>{head}</head><body><h1>{title}</h1>{body}</body></html>"#
        );

        info!(
            target = "notion_html::render",
            page_id,
            root_blocks = children.len(),
            bytes = html.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered page"
        );

        Ok(html)
    }
}
