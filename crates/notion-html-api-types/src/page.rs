use std::collections::BTreeMap;

use serde::Deserialize;

use crate::blocks::Block;
use crate::rich_text::RichText;

/// Page metadata as returned by `GET /v1/pages/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PageProperty>,
}

impl Page {
    /// Rich text of the page's title property, whatever it is named
    /// (`title` for plain pages, usually `Name` for database rows).
    pub fn title(&self) -> &[RichText] {
        self.properties
            .values()
            .find(|property| property.kind == "title")
            .map(|property| property.title.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageProperty {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub title: Vec<RichText>,
}

/// One page of `GET /v1/blocks/{id}/children`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlockList {
    #[serde(default)]
    pub results: Vec<Block>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Error object returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
