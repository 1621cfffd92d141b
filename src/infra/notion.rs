//! HTTP content client for the Notion REST API.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use notion_html_api_types::{ApiErrorBody, BlockList, Page};
use reqwest::{
    Client, Response, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::content::{ChildrenQuery, ContentClient, ContentError};
use crate::config::{DEFAULT_NOTION_BASE_URL, DEFAULT_NOTION_VERSION, NotionSettings};

use super::error::InfraError;

const NOTION_VERSION_HEADER: &str = "notion-version";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct NotionClientConfig {
    pub base_url: Url,
    pub version: String,
    pub token: String,
    pub request_timeout: Duration,
}

impl NotionClientConfig {
    /// Default endpoint, API version and timeout for the given integration token.
    pub fn new(token: impl Into<String>) -> Result<Self, InfraError> {
        let base_url = Url::parse(DEFAULT_NOTION_BASE_URL)
            .map_err(|err| InfraError::configuration(format!("invalid base URL: {err}")))?;
        Ok(Self {
            base_url,
            version: DEFAULT_NOTION_VERSION.to_string(),
            token: token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn from_settings(settings: &NotionSettings) -> Result<Self, InfraError> {
        let token = settings.token.clone().ok_or_else(|| {
            InfraError::configuration(
                "notion.token is required (set NOTION_HTML__NOTION__TOKEN or use --token-file)",
            )
        })?;

        Ok(Self {
            base_url: settings.base_url.clone(),
            version: settings.version.clone(),
            token,
            request_timeout: settings.request_timeout,
        })
    }
}

impl fmt::Debug for NotionClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("version", &self.version)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// [`ContentClient`] backed by `reqwest`. Cloning shares the connection pool.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: Url,
}

impl NotionHttpClient {
    pub fn new(config: NotionClientConfig) -> Result<Self, InfraError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|err| InfraError::client(format!("invalid token: {err}")))?;
        auth.set_sensitive(true);
        let version = HeaderValue::from_str(&config.version)
            .map_err(|err| InfraError::client(format!("invalid API version: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(NOTION_VERSION_HEADER, version);

        let client = Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| InfraError::client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ContentError> {
        self.base_url.join(path).map_err(|err| {
            ContentError::invalid_request(format!("invalid request path `{path}`: {err}"))
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ContentError> {
        debug!(target = "notion_html::notion", url = %url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ContentError::transport)?;
        handle(response).await
    }
}

pub fn user_agent() -> &'static str {
    concat!("notion-html/", env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl ContentClient for NotionHttpClient {
    async fn retrieve_page(&self, page_id: &str) -> Result<Page, ContentError> {
        let page_id = validate_id(page_id)?;
        let url = self.endpoint(&format!("pages/{page_id}"))?;
        self.get(url).await
    }

    async fn list_children(
        &self,
        block_id: &str,
        query: &ChildrenQuery,
    ) -> Result<BlockList, ContentError> {
        let block_id = validate_id(block_id)?;
        let mut url = self.endpoint(&format!("blocks/{block_id}/children"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page_size", &query.page_size.to_string());
            if let Some(cursor) = query.start_cursor.as_deref() {
                pairs.append_pair("start_cursor", cursor);
            }
        }
        self.get(url).await
    }
}

/// Notion ids are UUIDs, with or without dashes; anything else would alter
/// the request path.
fn validate_id(id: &str) -> Result<&str, ContentError> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(id)
    } else {
        Err(ContentError::invalid_request(format!("invalid id `{id}`")))
    }
}

async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, ContentError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ContentError::transport)?;

    if !status.is_success() {
        let error = match serde_json::from_slice::<ApiErrorBody>(&bytes) {
            Ok(body) if !body.code.is_empty() => ContentError::Status {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
            },
            _ => ContentError::Status {
                status: status.as_u16(),
                code: "unexpected_response".to_string(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            },
        };
        return Err(error);
    }

    serde_json::from_slice(&bytes).map_err(|err| ContentError::Decode(err.to_string()))
}
