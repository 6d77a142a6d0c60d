//! Document assembly: fetch, validate, extract, rewrite, convert

use crate::client::{ApiResponse, ZhihuClient};
use crate::config::Config;
use crate::convert::html_to_markdown;
use crate::error::Error;
use crate::rewrite::rewrite_content;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A fetched article
///
/// Construction performs the whole pipeline: fetch, status check, field
/// extraction, content rewriting, and Markdown conversion. The value is
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// Article id as reported by the API
    pub id: u64,
    /// Article title
    pub title: String,
    /// Creation timestamp (unix seconds)
    pub created: i64,
    /// Last-update timestamp (unix seconds)
    pub updated: i64,
    /// Rewritten HTML content
    pub content: String,
    /// Markdown rendering of the rewritten content
    pub markdown: String,
    /// Raw response body
    pub text: String,
    /// Parsed response JSON
    pub json: Value,
}

impl Article {
    /// Fetch and assemble an article
    pub async fn fetch(client: &ZhihuClient, config: &Config, id: u64) -> Result<Self, Error> {
        let resp = client.get_article(id).await?;
        let json = validated_json(&resp)?;

        let raw_content = str_field(&json, "content")?.to_string();
        let content = rewrite_content(&raw_content, config).await?;
        let markdown = html_to_markdown(&content);
        debug!(id, "assembled article");

        Ok(Self {
            id: u64_field(&json, "id")?,
            title: str_field(&json, "title")?.to_string(),
            created: i64_field(&json, "created")?,
            updated: i64_field(&json, "updated")?,
            content,
            markdown,
            text: resp.text,
            json,
        })
    }
}

/// A fetched answer
///
/// The answers endpoint only guarantees an `id`; `content` shows up when the
/// caller asked for it through the `include` projection, and is rewritten and
/// converted the same way article content is.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Answer id as reported by the API
    pub id: u64,
    /// Rewritten HTML content, when the response carried one
    pub content: Option<String>,
    /// Markdown rendering of the rewritten content
    pub markdown: Option<String>,
    /// Raw response body
    pub text: String,
    /// Parsed response JSON
    pub json: Value,
}

impl Answer {
    /// Fetch and assemble an answer
    pub async fn fetch(
        client: &ZhihuClient,
        config: &Config,
        id: u64,
        include: &[&str],
    ) -> Result<Self, Error> {
        let resp = client.get_answer(id, include).await?;
        let json = validated_json(&resp)?;

        let content = match json.get("content").and_then(Value::as_str) {
            Some(raw) => Some(rewrite_content(raw, config).await?),
            None => None,
        };
        let markdown = content.as_deref().map(html_to_markdown);
        debug!(id, "assembled answer");

        Ok(Self {
            id: u64_field(&json, "id")?,
            content,
            markdown,
            text: resp.text,
            json,
        })
    }
}

/// Require a 200 response, then parse its body
///
/// Any other status aborts assembly before field extraction or rewriting.
fn validated_json(resp: &ApiResponse) -> Result<Value, Error> {
    if resp.status != 200 {
        return Err(Error::UnexpectedStatus {
            url: resp.url.clone(),
            status: resp.status,
        });
    }
    resp.json()
}

fn u64_field(json: &Value, name: &'static str) -> Result<u64, Error> {
    json.get(name)
        .and_then(Value::as_u64)
        .ok_or(Error::Field(name))
}

fn i64_field(json: &Value, name: &'static str) -> Result<i64, Error> {
    json.get(name)
        .and_then(Value::as_i64)
        .ok_or(Error::Field(name))
}

fn str_field<'a>(json: &'a Value, name: &'static str) -> Result<&'a str, Error> {
    json.get(name)
        .and_then(Value::as_str)
        .ok_or(Error::Field(name))
}
