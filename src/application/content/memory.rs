use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use notion_html_api_types::{Block, BlockList, Page};

use super::{ChildrenQuery, ContentClient, ContentError};

/// Content client backed by in-memory pages and block listings.
///
/// Listings can be split into several API pages to exercise cursor handling;
/// the cursor handed out is the index of the next chunk. Every request is
/// recorded, and the peak number of concurrent requests is tracked when a
/// latency is configured.
#[derive(Default)]
pub struct InMemoryContent {
    pages: HashMap<String, Page>,
    children: HashMap<String, Vec<Vec<Block>>>,
    failing: HashSet<String>,
    latency: Option<Duration>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.insert(page.id.clone(), page);
        self
    }

    pub fn with_children(self, parent_id: &str, blocks: Vec<Block>) -> Self {
        self.with_paged_children(parent_id, vec![blocks])
    }

    pub fn with_paged_children(mut self, parent_id: &str, pages: Vec<Vec<Block>>) -> Self {
        self.children.insert(parent_id.to_string(), pages);
        self
    }

    /// Make every request touching `id` fail with a 502.
    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Requests seen so far, as `page:{id}` or `children:{id}@{cursor}`.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn begin(&self, request: String, id: &str) -> Result<(), ContentError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(id) {
            return Err(ContentError::Status {
                status: 502,
                code: "bad_gateway".to_string(),
                message: format!("upstream failure for {id}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentClient for InMemoryContent {
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, ContentError> {
        self.begin(format!("page:{page_id}"), page_id).await?;
        self.pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| ContentError::Status {
                status: 404,
                code: "object_not_found".to_string(),
                message: format!("page {page_id} not found"),
            })
    }

    async fn list_children(
        &self,
        block_id: &str,
        query: &ChildrenQuery,
    ) -> Result<BlockList, ContentError> {
        let cursor = query.start_cursor.as_deref().unwrap_or("0");
        self.begin(format!("children:{block_id}@{cursor}"), block_id)
            .await?;

        let index: usize = cursor
            .parse()
            .map_err(|_| ContentError::invalid_request(format!("unknown cursor `{cursor}`")))?;
        let Some(chunks) = self.children.get(block_id) else {
            return Ok(BlockList::default());
        };

        let results = chunks.get(index).cloned().unwrap_or_default();
        let has_more = index + 1 < chunks.len();
        Ok(BlockList {
            results,
            next_cursor: has_more.then(|| (index + 1).to_string()),
            has_more,
        })
    }
}
