use std::borrow::Cow;

use notion_html_api_types::RichText;

/// How user-supplied text is written into markup.
///
/// Notion text is not HTML, so [`EscapePolicy::Escape`] encodes it.
/// [`EscapePolicy::Verbatim`] copies text and attribute values through
/// untouched, which lets authors smuggle raw HTML into a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapePolicy {
    #[default]
    Escape,
    Verbatim,
}

impl EscapePolicy {
    pub fn text(self, text: &str) -> Cow<'_, str> {
        match self {
            EscapePolicy::Escape => html_escape::encode_text(text),
            EscapePolicy::Verbatim => Cow::Borrowed(text),
        }
    }

    pub fn attribute(self, value: &str) -> Cow<'_, str> {
        match self {
            EscapePolicy::Escape => html_escape::encode_double_quoted_attribute(value),
            EscapePolicy::Verbatim => Cow::Borrowed(value),
        }
    }
}

/// `<{tag}>{content}</{tag}>`
pub(crate) fn wrap(tag: &str, content: &str) -> String {
    format!("<{tag}>{content}</{tag}>")
}

/// Concatenated plain text of a run sequence, without any markup.
pub(crate) fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}
