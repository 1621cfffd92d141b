//! Fetch policy applied to every content request made during one render.

use std::{
    num::{NonZeroU32, NonZeroUsize},
    sync::Arc,
};

use metrics::counter;
use notion_html_api_types::{Block, Page};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, warn};

use crate::application::content::{ChildrenQuery, ContentClient, ContentError, DEFAULT_PAGE_SIZE};

const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Whether listing children follows `next_cursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Only the first page of every listing is read; the rest is dropped.
    FirstPage,
    /// Follow cursors until exhausted or `max_pages` pages were read.
    FollowCursors { max_pages: NonZeroU32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    pub page_size: NonZeroU32,
    pub pagination: Pagination,
    /// Upper bound on content requests in flight at once.
    pub max_concurrency: NonZeroUsize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            pagination: Pagination::FirstPage,
            max_concurrency: NonZeroUsize::new(DEFAULT_MAX_CONCURRENCY)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl From<&crate::config::FetchSettings> for FetchPolicy {
    fn from(settings: &crate::config::FetchSettings) -> Self {
        let pagination = if settings.follow_cursors {
            Pagination::FollowCursors {
                max_pages: settings.max_pages,
            }
        } else {
            Pagination::FirstPage
        };

        Self {
            page_size: settings.page_size,
            pagination,
            max_concurrency: settings.max_concurrency,
        }
    }
}

/// Content client paired with a [`FetchPolicy`]. Clones share the same
/// concurrency budget.
#[derive(Clone)]
pub struct BlockFetcher {
    client: Arc<dyn ContentClient>,
    policy: FetchPolicy,
    permits: Arc<Semaphore>,
}

impl BlockFetcher {
    pub fn new(client: Arc<dyn ContentClient>, policy: FetchPolicy) -> Self {
        let permits = Arc::new(Semaphore::new(policy.max_concurrency.get()));
        Self {
            client,
            policy,
            permits,
        }
    }

    pub async fn page(&self, page_id: &str) -> Result<Page, ContentError> {
        let _permit = self.acquire().await?;
        counter!("notion_html_fetch_requests_total", "kind" => "page").increment(1);
        debug!(target = "notion_html::fetch", page_id, "Retrieving page");
        self.client.retrieve_page(page_id).await
    }

    /// Children of `block_id` in API order, subject to the pagination mode.
    pub async fn children(&self, block_id: &str) -> Result<Vec<Block>, ContentError> {
        let mut blocks = Vec::new();
        let mut cursor = None;
        let mut pages_read = 0u32;

        loop {
            let query = ChildrenQuery {
                page_size: self.policy.page_size.get(),
                start_cursor: cursor.take(),
            };

            let listing = {
                let _permit = self.acquire().await?;
                counter!("notion_html_fetch_requests_total", "kind" => "children").increment(1);
                debug!(
                    target = "notion_html::fetch",
                    block_id,
                    cursor = query.start_cursor.as_deref(),
                    "Listing children"
                );
                self.client.list_children(block_id, &query).await?
            };
            pages_read += 1;
            blocks.extend(listing.results);

            let Some(next) = listing.next_cursor else {
                break;
            };

            match self.policy.pagination {
                Pagination::FollowCursors { max_pages } if pages_read < max_pages.get() => {
                    cursor = Some(next);
                }
                _ => {
                    warn!(
                        target = "notion_html::fetch",
                        block_id,
                        fetched = blocks.len(),
                        pages_read,
                        "Children listing truncated; remaining pages were not fetched"
                    );
                    break;
                }
            }
        }

        Ok(blocks)
    }

    async fn acquire(&self) -> Result<SemaphorePermit<'_>, ContentError> {
        self.permits
            .acquire()
            .await
            .map_err(ContentError::transport)
    }
}
