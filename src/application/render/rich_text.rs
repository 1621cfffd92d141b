//! Inline markup for rich text runs.

use notion_html_api_types::RichText;

use super::markup::{EscapePolicy, wrap};

/// Compose one run. Starting from the text, wrappers are applied in a fixed
/// order (bold, italic, strikethrough, underline, code), so the first applied
/// ends up innermost and the nesting only depends on which flags are set.
pub fn compose_run(run: &RichText, escape: EscapePolicy) -> String {
    let annotations = &run.annotations;
    let wrappers = [
        (annotations.bold, "strong"),
        (annotations.italic, "i"),
        (annotations.strikethrough, "s"),
        (annotations.underline, "u"),
        (annotations.code, "pre"),
    ];

    wrappers.into_iter().filter(|(enabled, _)| *enabled).fold(
        escape.text(&run.plain_text).into_owned(),
        |html, (_, tag)| wrap(tag, &html),
    )
}

/// Compose a run sequence, preserving order.
pub fn compose_runs(runs: &[RichText], escape: EscapePolicy) -> String {
    runs.iter().map(|run| compose_run(run, escape)).collect()
}
