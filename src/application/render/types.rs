use thiserror::Error;

use crate::application::content::ContentError;

use super::markup::EscapePolicy;

/// Structured errors surfaced by the rendering pipeline.
///
/// Unsupported or malformed blocks are not errors; they render as nothing.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Wrapper element of a rendered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTag {
    Unordered,
    Ordered,
}

impl ListTag {
    pub fn name(self) -> &'static str {
        match self {
            ListTag::Unordered => "ul",
            ListTag::Ordered => "ol",
        }
    }
}

/// Rendered output of one block, kept typed until the list normalizer joins
/// sibling fragments into markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Markup(String),
    /// A single `<li>` together with the opening tag of the list it belongs to.
    ListItem {
        tag: ListTag,
        open: String,
        item: String,
    },
}

impl Fragment {
    pub fn markup(html: impl Into<String>) -> Self {
        Fragment::Markup(html.into())
    }
}

/// Presentation settings applied to a whole render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub escape: EscapePolicy,
    /// Value of the document's `lang` attribute.
    pub lang: String,
    /// Prefix of child page links; the page id is appended as `?id=`.
    pub child_page_base: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            escape: EscapePolicy::default(),
            lang: "en".to_string(),
            child_page_base: "/".to_string(),
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderOptions {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            escape: if settings.escape_text {
                EscapePolicy::Escape
            } else {
                EscapePolicy::Verbatim
            },
            lang: settings.lang.clone(),
            child_page_base: settings.child_page_base.clone(),
        }
    }
}
