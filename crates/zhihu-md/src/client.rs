//! HTTP client for the Zhihu content API

use crate::config::Config;
use crate::error::Error;
use crate::DEFAULT_USER_AGENT;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

/// Canonical base URL of the content API
pub const API_BASE: &str = "https://api.zhihu.com";

/// Client for the article and answer endpoints
///
/// Sends plain GET requests with the configured user-agent. Status codes are
/// returned to the caller unvalidated; the document assembler decides what a
/// non-success status means. No retries.
pub struct ZhihuClient {
    http: reqwest::Client,
    api_base: String,
}

impl ZhihuClient {
    /// Create a client against the canonical API base
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_api_base(config, API_BASE)
    }

    /// Create a client against a custom API base (used by tests)
    pub fn with_api_base(config: &Config, api_base: impl Into<String>) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// GET an article by its numeric id
    pub async fn get_article(&self, id: u64) -> Result<ApiResponse, Error> {
        self.get(format!("{}/articles/{}", self.api_base, id)).await
    }

    /// GET an answer by its numeric id
    ///
    /// A non-empty `include` slice is comma-joined into the `include` query
    /// parameter to request expanded fields from the API.
    pub async fn get_answer(&self, id: u64, include: &[&str]) -> Result<ApiResponse, Error> {
        self.get(self.answer_url(id, include)).await
    }

    fn answer_url(&self, id: u64, include: &[&str]) -> String {
        let mut url = format!("{}/answers/{}", self.api_base, id);
        if !include.is_empty() {
            url.push_str("?include=");
            url.push_str(&include.join(","));
        }
        url
    }

    async fn get(&self, url: String) -> Result<ApiResponse, Error> {
        debug!(%url, "requesting resource");
        let response = self.http.get(&url).send().await.map_err(Error::from_reqwest)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(Error::from_reqwest)?;
        Ok(ApiResponse { url, status, text })
    }
}

/// Raw response from the content API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The requested URL
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub text: String,
}

impl ApiResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value, Error> {
        Ok(serde_json::from_str(&self.text)?)
    }
}
