//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{
    fmt,
    num::{NonZeroU32, NonZeroUsize},
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::content::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub use cli::{CliArgs, Command, RenderArgs, RenderOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "notion-html";
const ENV_PREFIX: &str = "NOTION_HTML";
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1/";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_PAGES: u32 = 100;
const DEFAULT_MAX_CONCURRENCY: u32 = 8;
const DEFAULT_LANG: &str = "en";
const DEFAULT_CHILD_PAGE_BASE: &str = "/";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub notion: NotionSettings,
    pub fetch: FetchSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Clone)]
pub struct NotionSettings {
    pub base_url: Url,
    pub version: String,
    /// Integration token; checked by the commands that talk to the API.
    pub token: Option<String>,
    pub request_timeout: Duration,
}

impl fmt::Debug for NotionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionSettings")
            .field("base_url", &self.base_url.as_str())
            .field("version", &self.version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub page_size: NonZeroU32,
    pub follow_cursors: bool,
    pub max_pages: NonZeroU32,
    pub max_concurrency: NonZeroUsize,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub escape_text: bool,
    pub lang: String,
    pub child_page_base: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match &cli.command {
        Command::Render(args) => raw.apply_render_overrides(&args.overrides)?,
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    notion: RawNotionSettings,
    fetch: RawFetchSettings,
    render: RawRenderSettings,
}

impl RawSettings {
    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) -> Result<(), LoadError> {
        if let Some(path) = overrides.token_file.as_ref() {
            let token = std::fs::read_to_string(path).map_err(|err| {
                LoadError::invalid(
                    "notion.token",
                    format!("failed to read token file `{}`: {err}", path.display()),
                )
            })?;
            self.notion.token = Some(token);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.notion_base_url.as_ref() {
            self.notion.base_url = Some(url.clone());
        }
        if let Some(size) = overrides.page_size {
            self.fetch.page_size = Some(size);
        }
        if let Some(follow) = overrides.follow_cursors {
            self.fetch.follow_cursors = Some(follow);
        }
        if let Some(max) = overrides.max_pages {
            self.fetch.max_pages = Some(max);
        }
        if let Some(max) = overrides.max_concurrency {
            self.fetch.max_concurrency = Some(max);
        }
        if let Some(escape) = overrides.escape_text {
            self.render.escape_text = Some(escape);
        }
        if let Some(lang) = overrides.lang.as_ref() {
            self.render.lang = Some(lang.clone());
        }
        if let Some(base) = overrides.child_page_base.as_ref() {
            self.render.child_page_base = Some(base.clone());
        }
        Ok(())
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            notion,
            fetch,
            render,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            notion: build_notion_settings(notion)?,
            fetch: build_fetch_settings(fetch)?,
            render: build_render_settings(render)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_notion_settings(notion: RawNotionSettings) -> Result<NotionSettings, LoadError> {
    let base_url = notion
        .base_url
        .unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.to_string());
    let base_url = parse_base_url(&base_url)
        .map_err(|reason| LoadError::invalid("notion.base_url", reason))?;

    let version = notion
        .version
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string());
    if version.is_empty() {
        return Err(LoadError::invalid("notion.version", "must not be empty"));
    }

    let token = notion.token.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let timeout_secs = notion
        .request_timeout_seconds
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "notion.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(NotionSettings {
        base_url,
        version,
        token,
        request_timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_fetch_settings(fetch: RawFetchSettings) -> Result<FetchSettings, LoadError> {
    let page_size = non_zero_u32(
        fetch.page_size.unwrap_or(DEFAULT_PAGE_SIZE).into(),
        "fetch.page_size",
    )?;
    if page_size.get() > MAX_PAGE_SIZE {
        return Err(LoadError::invalid(
            "fetch.page_size",
            format!("must not exceed {MAX_PAGE_SIZE}"),
        ));
    }

    let max_pages = non_zero_u32(
        fetch.max_pages.unwrap_or(DEFAULT_MAX_PAGES).into(),
        "fetch.max_pages",
    )?;

    let max_concurrency = non_zero_u32(
        fetch.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY).into(),
        "fetch.max_concurrency",
    )?;
    let max_concurrency = usize::try_from(max_concurrency.get())
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| {
            LoadError::invalid(
                "fetch.max_concurrency",
                "value exceeds supported range for usize",
            )
        })?;

    Ok(FetchSettings {
        page_size,
        follow_cursors: fetch.follow_cursors.unwrap_or(false),
        max_pages,
        max_concurrency,
    })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let lang = render
        .lang
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_LANG.to_string());
    if lang.is_empty() {
        return Err(LoadError::invalid("render.lang", "must not be empty"));
    }

    Ok(RenderSettings {
        escape_text: render.escape_text.unwrap_or(true),
        lang,
        child_page_base: render
            .child_page_base
            .unwrap_or_else(|| DEFAULT_CHILD_PAGE_BASE.to_string()),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawNotionSettings {
    base_url: Option<String>,
    version: Option<String>,
    token: Option<String>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFetchSettings {
    page_size: Option<u32>,
    follow_cursors: Option<bool>,
    max_pages: Option<u32>,
    max_concurrency: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    escape_text: Option<bool>,
    lang: Option<String>,
    child_page_base: Option<String>,
}

/// Parse an API base URL, forcing a trailing slash so relative joins keep
/// the version segment (`.../v1/` + `pages/x`).
fn parse_base_url(value: &str) -> Result<Url, String> {
    let trimmed = value.trim();
    let candidate = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&candidate).map_err(|err| format!("invalid URL `{trimmed}`: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("unsupported scheme `{scheme}`")),
    }
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }

    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
