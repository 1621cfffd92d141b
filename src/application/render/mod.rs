//! Block-tree to HTML rendering.
//!
//! Blocks render into typed [`Fragment`]s; the list normalizer joins sibling
//! fragments into markup, and [`DocumentRenderer`] wraps a page's rendered
//! body into a full document. The pipeline performs no I/O of its own: every
//! request goes through a [`ContentClient`](crate::application::content::ContentClient).

mod blocks;
mod document;
mod fetch;
mod lists;
mod markup;
mod rich_text;
mod types;


pub use blocks::BlockRenderer;
pub use document::DocumentRenderer;
pub use fetch::{BlockFetcher, FetchPolicy, Pagination};
pub use lists::normalize;
pub use markup::EscapePolicy;
pub use rich_text::{compose_run, compose_runs};
pub use types::{Fragment, ListTag, RenderError, RenderOptions};
