//! Wire types for the subset of the Notion API consumed by `notion-html`.
//!
//! The models deserialize straight from the JSON returned by
//! `GET /v1/pages/{id}` and `GET /v1/blocks/{id}/children`. Blocks whose
//! `type` is unknown, or whose payload does not match the expected shape,
//! still deserialize: they surface as [`BlockKind::Unsupported`] so a single
//! odd block never rejects a whole listing.

mod blocks;
mod files;
mod page;
mod rich_text;

pub use blocks::{
    Block, BlockKind, CalloutBlock, ChildPageBlock, CodeBlock, EquationBlock, MediaBlock,
    TableBlock, TableRowBlock, TextBlock, ToDoBlock,
};
pub use files::{ExternalFile, FileObject, HostedFile, Icon};
pub use page::{ApiErrorBody, BlockList, Page, PageProperty};
pub use rich_text::{Annotations, Color, RichText};
