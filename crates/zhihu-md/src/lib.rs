//! zhihu-md - Zhihu content fetching and Markdown conversion library
//!
//! This crate fetches a single article or answer from the Zhihu content API,
//! rewrites embedded markup, and converts the resulting HTML into Markdown.
//!
//! ## Pipeline
//!
//! 1. [`ZhihuClient`] issues the API request with the configured user-agent.
//! 2. [`Article::fetch`] / [`Answer::fetch`] validate the response and
//!    extract the document fields.
//! 3. The content rewriter unwraps LaTeX-rendered equation images into
//!    inline `$...$` math and, when [`Config::download_image`] is set,
//!    downloads embedded images into [`Config::asset_path`] and points the
//!    tags at the local copies.
//! 4. [`html_to_markdown`] renders the rewritten HTML as Markdown text.
//!
//! ```no_run
//! use zhihu_md::{Article, Config, ZhihuClient};
//!
//! # async fn run() -> Result<(), zhihu_md::Error> {
//! let config = Config::builder()
//!     .download_image(true)
//!     .asset_path("~/zhihu-assets")
//!     .build();
//! let client = ZhihuClient::new(&config)?;
//! let article = Article::fetch(&client, &config, 19550517).await?;
//! println!("{}", article.markdown);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod convert;
mod document;
mod error;
mod rewrite;
mod scan;

pub use client::{ApiResponse, ZhihuClient, API_BASE};
pub use config::{Config, ConfigBuilder};
pub use convert::html_to_markdown;
pub use document::{Answer, Article};
pub use error::Error;
pub use rewrite::{localize_images, rewrite_content, unwrap_latex, EQUATION_URL_PREFIX};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.1.2 Safari/605.1.15";
