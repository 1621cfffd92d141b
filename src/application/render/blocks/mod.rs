//! Block-to-markup rules, one per block variant.

mod containers;

use std::sync::Arc;

use futures::{
    FutureExt,
    future::{BoxFuture, try_join_all},
};
use metrics::counter;
use notion_html_api_types::{
    Block, BlockKind, CalloutBlock, ChildPageBlock, CodeBlock, EquationBlock, Icon, MediaBlock,
    RichText, TextBlock, ToDoBlock,
};
use tracing::{debug, warn};

use super::fetch::BlockFetcher;
use super::markup::{EscapePolicy, plain_text, wrap};
use super::rich_text::{compose_run, compose_runs};
use super::types::{Fragment, ListTag, RenderError, RenderOptions};

/// Recursive renderer for a block tree. Container blocks pull their children
/// through the fetcher; siblings are rendered concurrently and joined in
/// order.
#[derive(Clone)]
pub struct BlockRenderer {
    pub(super) fetcher: BlockFetcher,
    pub(super) options: Arc<RenderOptions>,
}

impl BlockRenderer {
    pub fn new(fetcher: BlockFetcher, options: RenderOptions) -> Self {
        Self {
            fetcher,
            options: Arc::new(options),
        }
    }

    /// Render one block. Only content client failures are errors.
    pub fn render_block<'a>(
        &'a self,
        block: &'a Block,
    ) -> BoxFuture<'a, Result<Vec<Fragment>, RenderError>> {
        async move {
            let escape = self.options.escape;
            counter!(
                "notion_html_blocks_rendered_total",
                "type" => block.kind.type_name().to_string()
            )
            .increment(1);

            let fragments = match &block.kind {
                BlockKind::Heading1(text) => vec![text_block("h2", text, escape)],
                BlockKind::Heading2(text) => vec![text_block("h3", text, escape)],
                BlockKind::Heading3(text) => vec![text_block("h4", text, escape)],
                BlockKind::Paragraph(text) => vec![text_block("p", text, escape)],
                BlockKind::Quote(text) => vec![text_block("blockquote", text, escape)],
                BlockKind::BulletedListItem(item) => bulleted_items(item, escape),
                BlockKind::NumberedListItem(item) => numbered_items(item, escape),
                BlockKind::ToDo(item) => todo_items(item, escape),
                BlockKind::Callout(callout) => vec![callout_section(callout, escape)],
                BlockKind::Code(code) => vec![code_figure(code, escape)],
                BlockKind::Equation(equation) => vec![equation_block(equation, escape)],
                BlockKind::Divider => vec![Fragment::markup("<hr/>")],
                BlockKind::Image(media) => vec![image(media, escape)],
                BlockKind::Video(media) => vec![video(media, escape)],
                BlockKind::File(media) => vec![file_figure(media, escape)],
                BlockKind::ChildPage(page) => {
                    vec![child_page_link(block, page, &self.options)]
                }
                BlockKind::Table(table) => vec![self.table(block, table).await?],
                BlockKind::Toggle(toggle) => vec![self.toggle(block, toggle).await?],
                BlockKind::ColumnList => vec![self.column_list(block).await?],
                BlockKind::TableRow(_) | BlockKind::Column => {
                    debug!(
                        target = "notion_html::render",
                        block_id = %block.id,
                        block_type = block.kind.type_name(),
                        "Ignoring layout block outside of its container"
                    );
                    Vec::new()
                }
                BlockKind::Unsupported { kind, reason } => {
                    skip_unsupported(block, kind, reason.as_deref());
                    Vec::new()
                }
            };

            Ok(fragments)
        }
        .boxed()
    }

    /// Render sibling blocks concurrently, keeping their order.
    pub async fn render_all(&self, blocks: &[Block]) -> Result<Vec<Fragment>, RenderError> {
        let rendered = try_join_all(blocks.iter().map(|block| self.render_block(block))).await?;
        Ok(rendered.into_iter().flatten().collect())
    }
}

fn skip_unsupported(block: &Block, kind: &str, reason: Option<&str>) {
    counter!("notion_html_blocks_unsupported_total", "type" => kind.to_string()).increment(1);
    warn!(
        target = "notion_html::render",
        block_id = %block.id,
        block_type = kind,
        reason,
        "Skipping unsupported block"
    );
}

fn text_block(tag: &str, text: &TextBlock, escape: EscapePolicy) -> Fragment {
    Fragment::Markup(wrap(tag, &compose_runs(&text.rich_text, escape)))
}

/// One list item per run: a block holding several runs yields several items.
fn list_items<F>(runs: &[RichText], tag: ListTag, open: &str, item: F) -> Vec<Fragment>
where
    F: Fn(&RichText) -> String,
{
    runs.iter()
        .map(|run| Fragment::ListItem {
            tag,
            open: open.to_string(),
            item: item(run),
        })
        .collect()
}

fn bulleted_items(block: &TextBlock, escape: EscapePolicy) -> Vec<Fragment> {
    let color = escape.attribute(block.color.as_str());
    list_items(&block.rich_text, ListTag::Unordered, "<ul>", |run| {
        format!(
            r#"<li class="bulleted-list__item bulleted-list__item--{color}">{}</li>"#,
            compose_run(run, escape)
        )
    })
}

fn numbered_items(block: &TextBlock, escape: EscapePolicy) -> Vec<Fragment> {
    let color = escape.attribute(block.color.as_str());
    list_items(
        &block.rich_text,
        ListTag::Ordered,
        r#"<ol role="list">"#,
        |run| {
            format!(
                r#"<li class="numbered-list__item numbered-list__item--{color}">{}</li>"#,
                compose_run(run, escape)
            )
        },
    )
}

fn todo_items(block: &ToDoBlock, escape: EscapePolicy) -> Vec<Fragment> {
    let color = escape.attribute(block.color.as_str());
    let checked = if block.checked { " checked" } else { "" };
    list_items(
        &block.rich_text,
        ListTag::Unordered,
        r#"<ul role="list">"#,
        |run| {
            format!(
                r#"<li class="todo-list__item todo-list__item--{color}"><dl><dt><label><input type="checkbox"{checked}/>{}</label></dt></dl></li>"#,
                compose_run(run, escape)
            )
        },
    )
}

fn callout_section(callout: &CalloutBlock, escape: EscapePolicy) -> Fragment {
    let color = escape.attribute(callout.color.as_str());
    let icon = callout
        .icon
        .as_ref()
        .and_then(Icon::emoji)
        .map(|emoji| escape.text(emoji))
        .unwrap_or_default();
    let content: String = callout
        .rich_text
        .iter()
        .map(|run| {
            format!(
                r#"<p class="callout__content__item">{}</p>"#,
                compose_run(run, escape)
            )
        })
        .collect();

    Fragment::Markup(format!(
        r#"<section class="callout callout--{color}"><div class="callout__icon">{icon}</div><div class="callout__content">{content}</div></section>"#
    ))
}

fn code_figure(code: &CodeBlock, escape: EscapePolicy) -> Fragment {
    let content = compose_runs(&code.rich_text, escape);
    let caption = compose_runs(&code.caption, escape);
    // Markup has no meaning inside an attribute; escaped output labels with the text only.
    let label = match escape {
        EscapePolicy::Escape => escape.attribute(&plain_text(&code.caption)).into_owned(),
        EscapePolicy::Verbatim => caption.clone(),
    };

    Fragment::Markup(format!(
        r#"<figure><pre role="img" aria-label="{label}">{content}</pre>{}</figure>"#,
        figcaption(&caption)
    ))
}

fn equation_block(equation: &EquationBlock, escape: EscapePolicy) -> Fragment {
    Fragment::Markup(wrap("pre", &escape.text(&equation.expression)))
}

fn image(media: &MediaBlock, escape: EscapePolicy) -> Fragment {
    Fragment::Markup(format!(
        r#"<img src="{}" alt="Image"/>"#,
        escape.attribute(media.source.url())
    ))
}

fn video(media: &MediaBlock, escape: EscapePolicy) -> Fragment {
    Fragment::Markup(format!(
        r#"<video controls><source src="{}"/></video>"#,
        escape.attribute(media.source.url())
    ))
}

fn file_figure(media: &MediaBlock, escape: EscapePolicy) -> Fragment {
    let url = media.source.url();
    let name = file_name(url)
        .map(|name| escape.text(name))
        .unwrap_or_default();
    let caption = compose_runs(&media.caption, escape);

    Fragment::Markup(format!(
        r#"<figure><p class="file__link-file"><a href="{href}">{name}</a></p><p class="file__input-file"><input type="file"/></p>{figcaption}</figure>"#,
        href = escape.attribute(url),
        figcaption = figcaption(&caption),
    ))
}

fn child_page_link(block: &Block, page: &ChildPageBlock, options: &RenderOptions) -> Fragment {
    let escape = options.escape;
    Fragment::Markup(format!(
        r#"<a href="{base}?id={id}">{title}</a>"#,
        base = escape.attribute(&options.child_page_base),
        id = escape.attribute(&block.id),
        title = escape.text(&page.title),
    ))
}

fn figcaption(caption: &str) -> String {
    if caption.is_empty() {
        String::new()
    } else {
        wrap("figcaption", caption)
    }
}

/// Path segment immediately preceding the query string, e.g. `report.pdf`
/// for `https://host/files/report.pdf?token=abc`. When the segment holds
/// further `?` characters the name runs up to the last of them.
pub(crate) fn file_name(url: &str) -> Option<&str> {
    let query_start = url.find('?')?;
    let segment_start = url[..query_start].rfind('/').map_or(0, |slash| slash + 1);
    let segment = url[segment_start..].split('/').next().unwrap_or_default();
    let name_end = segment.rfind('?')?;
    let name = &segment[..name_end];
    (!name.is_empty()).then_some(name)
}
