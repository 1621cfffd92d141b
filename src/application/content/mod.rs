//! Content client seam: the only way the renderer reaches the Notion API.

#[cfg(test)]
mod memory;

use async_trait::async_trait;
use notion_html_api_types::{BlockList, Page};
use thiserror::Error;

#[cfg(test)]
pub use memory::InMemoryContent;

/// Number of children requested per listing call unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Upper bound accepted by the API for `page_size`.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenQuery {
    pub page_size: u32,
    pub start_cursor: Option<String>,
}

impl ChildrenQuery {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page_size,
            start_cursor: None,
        }
    }
}

impl Default for ChildrenQuery {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("content API responded with status {status}: {code}: {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },
    #[error("failed to decode content response: {0}")]
    Decode(String),
    #[error("invalid content request: {0}")]
    InvalidRequest(String),
}

impl ContentError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

/// Read access to pages and block children. Implementations must not retry
/// on their own: failures are reported to the caller unchanged.
#[async_trait]
pub trait ContentClient: Send + Sync {
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, ContentError>;

    async fn list_children(
        &self,
        block_id: &str,
        query: &ChildrenQuery,
    ) -> Result<BlockList, ContentError>;
}
