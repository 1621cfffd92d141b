use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the notion-html binary.
#[derive(Debug, Parser)]
#[command(
    name = "notion-html",
    version,
    about = "Render a Notion page as a single HTML document"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "NOTION_HTML_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch a page with its block tree and print it as HTML.
    Render(Box<RenderArgs>),
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Id of the page to render, with or without dashes.
    #[arg(value_name = "PAGE_ID")]
    pub page_id: String,

    /// Markup inserted verbatim into the document's <head>.
    #[arg(long, value_name = "MARKUP", conflicts_with = "head_file")]
    pub head: Option<String>,

    /// Read the <head> markup from a file.
    #[arg(long = "head-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub head_file: Option<PathBuf>,

    /// Write the document to a file instead of stdout.
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: RenderOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Read the integration token from a file.
    #[arg(long = "token-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub token_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the Notion API base URL.
    #[arg(long = "notion-base-url", value_name = "URL")]
    pub notion_base_url: Option<String>,

    /// Override the number of children requested per listing call (1-100).
    #[arg(long = "page-size", value_name = "COUNT")]
    pub page_size: Option<u32>,

    /// Follow pagination cursors instead of reading only the first page.
    #[arg(
        long = "follow-cursors",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub follow_cursors: Option<bool>,

    /// Override the number of listing pages read per block when following cursors.
    #[arg(long = "max-pages", value_name = "COUNT")]
    pub max_pages: Option<u32>,

    /// Override the number of API requests allowed in flight at once.
    #[arg(long = "max-concurrency", value_name = "COUNT")]
    pub max_concurrency: Option<u32>,

    /// Toggle HTML escaping of page text.
    #[arg(
        long = "escape-text",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub escape_text: Option<bool>,

    /// Override the document's lang attribute.
    #[arg(long = "lang", value_name = "LANG")]
    pub lang: Option<String>,

    /// Override the link prefix used for child pages.
    #[arg(long = "child-page-base", value_name = "URL")]
    pub child_page_base: Option<String>,
}
