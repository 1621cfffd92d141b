//! Application layer: the content client seam and the rendering pipeline.

pub mod content;
pub mod error;
pub mod render;
