use futures::future::try_join_all;
use notion_html_api_types::{Block, BlockKind, TableBlock, TextBlock};

use super::BlockRenderer;
use crate::application::render::lists::normalize;
use crate::application::render::markup::{EscapePolicy, wrap};
use crate::application::render::rich_text::{compose_run, compose_runs};
use crate::application::render::types::{Fragment, RenderError};

impl BlockRenderer {
    pub(super) async fn table(
        &self,
        block: &Block,
        table: &TableBlock,
    ) -> Result<Fragment, RenderError> {
        let escape = self.options.escape;
        let rows = self.fetcher.children(&block.id).await?;
        let table_rows = rows.iter().filter_map(|row| match &row.kind {
            BlockKind::TableRow(cells) => Some(cells),
            _ => None,
        });

        let mut html = String::from("<table>");
        for (row_index, row) in table_rows.enumerate() {
            html.push_str("<tr>");
            for (column_index, cell) in row.cells.iter().enumerate() {
                let tag = if is_header_cell(table, row_index, column_index) {
                    "th"
                } else {
                    "td"
                };
                let content = cell
                    .first()
                    .map(|run| compose_run(run, escape))
                    .unwrap_or_default();
                html.push_str(&wrap(tag, &content));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");

        Ok(Fragment::Markup(html))
    }

    pub(super) async fn toggle(
        &self,
        block: &Block,
        toggle: &TextBlock,
    ) -> Result<Fragment, RenderError> {
        let escape = self.options.escape;
        let title = compose_runs(&toggle.rich_text, escape);
        let children = self.fetcher.children(&block.id).await?;

        let panels = try_join_all(children.iter().map(|child| async move {
            match &child.kind {
                BlockKind::Paragraph(paragraph) => Ok(toggle_paragraph(paragraph, escape)),
                _ => self.render_block(child).await.map(normalize),
            }
        }))
        .await?;

        Ok(Fragment::Markup(format!(
            r#"<article class="accordion"><button class="accordion__heading">{title}</button><div class="accordion__panel">{}</div></article>"#,
            panels.concat()
        )))
    }

    /// Columns become table columns: block `j` of column `i` lands in row
    /// `j`, cell `i`. Every column is fetched before any row is emitted.
    pub(super) async fn column_list(&self, block: &Block) -> Result<Fragment, RenderError> {
        let columns = self.fetcher.children(&block.id).await?;
        let cells = try_join_all(columns.iter().map(|column| self.column_cells(column))).await?;
        Ok(Fragment::Markup(transpose_columns(&cells)))
    }

    async fn column_cells(&self, column: &Block) -> Result<Vec<String>, RenderError> {
        let blocks = self.fetcher.children(&column.id).await?;
        try_join_all(
            blocks
                .iter()
                .map(|block| async move { self.render_block(block).await.map(normalize) }),
        )
        .await
    }
}

fn is_header_cell(table: &TableBlock, row_index: usize, column_index: usize) -> bool {
    (table.has_row_header && row_index == 0) || (table.has_column_header && column_index == 0)
}

/// Runs annotated as code are emitted bare; every other run gets its own `<p>`.
fn toggle_paragraph(paragraph: &TextBlock, escape: EscapePolicy) -> String {
    paragraph
        .rich_text
        .iter()
        .map(|run| {
            let html = compose_run(run, escape);
            if run.annotations.code {
                html
            } else {
                wrap("p", &html)
            }
        })
        .collect()
}

/// Ragged columns leave their missing cells out of the row.
fn transpose_columns(columns: &[Vec<String>]) -> String {
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut html = String::from("<table>");
    for row in 0..height {
        html.push_str("<tr>");
        for cell in columns.iter().filter_map(|column| column.get(row)) {
            html.push_str(&wrap("td", cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_flags_apply_independently() {
        let both = TableBlock {
            has_column_header: true,
            has_row_header: true,
        };
        assert!(is_header_cell(&both, 0, 0));
        assert!(is_header_cell(&both, 0, 1));
        assert!(is_header_cell(&both, 1, 0));
        assert!(!is_header_cell(&both, 1, 1));

        let none = TableBlock::default();
        assert!(!is_header_cell(&none, 0, 0));
    }

    #[test]
    fn transpose_turns_columns_into_rows() {
        let columns = vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["C".to_string(), "D".to_string()],
        ];
        assert_eq!(
            transpose_columns(&columns),
            "<table><tr><td>A</td><td>C</td></tr><tr><td>B</td><td>D</td></tr></table>"
        );
    }

    #[test]
    fn transpose_skips_missing_cells() {
        let columns = vec![vec!["A".to_string(), "B".to_string()], vec!["C".to_string()]];
        assert_eq!(
            transpose_columns(&columns),
            "<table><tr><td>A</td><td>C</td></tr><tr><td>B</td></tr></table>"
        );
        assert_eq!(transpose_columns(&[]), "<table></table>");
    }
}
