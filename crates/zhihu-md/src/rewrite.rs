//! Content rewriting passes
//!
//! The API renders LaTeX as `<img>` tags pointing at an equation-rendering
//! endpoint, with the original source in the `alt` attribute. The first pass
//! unwraps those back into inline `$...$` math. The second, optional pass
//! downloads remaining remote images into the asset directory and points the
//! tags at the local copies.
//!
//! The LaTeX pass always runs first, so unwrapped equation images are never
//! visible to the image pass and never downloaded as binary assets.

use crate::config::Config;
use crate::error::Error;
use crate::scan::{extract_attribute, next_img_tag};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// URL prefix of the Zhihu equation-rendering endpoint
pub const EQUATION_URL_PREFIX: &str = "https://www.zhihu.com/equation?tex=";

/// Apply both rewriting passes according to the configuration
///
/// LaTeX unwrapping always runs; image localization only when
/// [`Config::download_image`] is set, and only over the output of the first
/// pass.
pub async fn rewrite_content(html: &str, config: &Config) -> Result<String, Error> {
    let content = unwrap_latex(html);
    if config.download_image {
        localize_images(&content, &config.asset_path).await
    } else {
        Ok(content)
    }
}

/// Replace equation images with their LaTeX source in `$...$` delimiters
///
/// Matches `<img>` tags whose `src` starts with [`EQUATION_URL_PREFIX`] and
/// which carry an `alt` attribute holding the original source. Tags without
/// an `alt`, and all other content, pass through byte-for-byte.
pub fn unwrap_latex(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(tag) = next_img_tag(rest) {
        out.push_str(&rest[..tag.start]);
        match latex_source(tag.body) {
            Some(tex) => {
                out.push('$');
                out.push_str(&tex);
                out.push('$');
            }
            None => out.push_str(&rest[tag.start..tag.end]),
        }
        rest = &rest[tag.end..];
    }
    out.push_str(rest);
    out
}

/// LaTeX source of an equation image tag, if it is one
fn latex_source(tag_body: &str) -> Option<String> {
    let src = extract_attribute(tag_body, "src")?;
    if !src.starts_with(EQUATION_URL_PREFIX) {
        return None;
    }
    extract_attribute(tag_body, "alt")
}

/// Download remote images into `asset_path` and rewrite their tags
///
/// Each `<img>` whose `src` starts with `http://` or `https://` is replaced
/// by `<img src="<asset_path>/<filename>">`, where the filename is the final
/// path segment of the source URL. A file already present under that name is
/// treated as the same asset and not re-fetched (identity by filename, not
/// by content). Other attributes of the original tag are dropped.
pub async fn localize_images(html: &str, asset_path: &Path) -> Result<String, Error> {
    // Image hosts get a plain unauthenticated client
    let client = reqwest::Client::builder()
        .build()
        .map_err(Error::ClientBuild)?;

    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(tag) = next_img_tag(rest) {
        out.push_str(&rest[..tag.start]);
        let original = &rest[tag.start..tag.end];

        match remote_image_src(tag.body) {
            Some(src) => match image_filename(&src) {
                Some(name) => {
                    let target = asset_path.join(&name);
                    download_if_missing(&client, &src, &target).await?;
                    out.push_str(&format!("<img src=\"{}\">", target.display()));
                }
                None => {
                    warn!(url = %src, "cannot derive a filename, leaving tag in place");
                    out.push_str(original);
                }
            },
            None => out.push_str(original),
        }
        rest = &rest[tag.end..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Remote source URL of an image tag, if it has one
fn remote_image_src(tag_body: &str) -> Option<String> {
    let src = extract_attribute(tag_body, "src")?;
    if src.starts_with("http://") || src.starts_with("https://") {
        Some(src)
    } else {
        None
    }
}

/// Derive the local filename as the final path segment of the image URL
fn image_filename(src: &str) -> Option<String> {
    if let Ok(parsed) = url::Url::parse(src) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return Some(last.to_string());
                }
            }
        }
        return None;
    }
    // Unparseable URL: fall back to everything after the last slash
    let last = src.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}

/// Fetch the image unless a file with its name already exists
///
/// The existence check is the idempotency key: a second run over the same
/// asset directory performs no network traffic for files already present.
async fn download_if_missing(
    client: &reqwest::Client,
    src: &str,
    target: &Path,
) -> Result<(), Error> {
    if target.exists() {
        debug!(path = %target.display(), "image already downloaded, reusing");
        return Ok(());
    }

    debug!(url = %src, path = %target.display(), "downloading image");
    let response = client.get(src).send().await.map_err(Error::from_reqwest)?;
    let body: Bytes = response.bytes().await.map_err(Error::from_reqwest)?;

    tokio::fs::write(target, &body)
        .await
        .map_err(|source| Error::ImageWrite {
            path: PathBuf::from(target),
            source,
        })
}
