//! Merges adjacent list items into a single list element.
//!
//! Every list item block renders its own complete list. Walking the typed
//! fragments, an item whose wrapper tag matches the list currently open is
//! appended to it; anything else closes the open list. Empty markup does not
//! count as content between two items.

use super::types::{Fragment, ListTag};

pub fn normalize<I>(fragments: I) -> String
where
    I: IntoIterator<Item = Fragment>,
{
    let mut html = String::new();
    let mut open_list: Option<ListTag> = None;

    for fragment in fragments {
        match fragment {
            Fragment::Markup(markup) => {
                if markup.is_empty() {
                    continue;
                }
                close_list(&mut html, &mut open_list);
                html.push_str(&markup);
            }
            Fragment::ListItem { tag, open, item } => {
                if open_list != Some(tag) {
                    close_list(&mut html, &mut open_list);
                    html.push_str(&open);
                    open_list = Some(tag);
                }
                html.push_str(&item);
            }
        }
    }

    close_list(&mut html, &mut open_list);
    html
}

fn close_list(html: &mut String, open_list: &mut Option<ListTag>) {
    if let Some(tag) = open_list.take() {
        html.push_str("</");
        html.push_str(tag.name());
        html.push('>');
    }
}
