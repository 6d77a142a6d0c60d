//! Error types for zhihu-md

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching and converting a document
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to build the HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Failed to connect to the server
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Other transport-level request failure
    #[error("Request failed: {0}")]
    Request(String),

    /// The primary fetch returned a non-success status
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The API response body was not valid JSON
    #[error("Failed to decode API response as JSON")]
    Json(#[from] serde_json::Error),

    /// A named response field was absent or not of the expected type
    #[error("Response field missing or malformed: {0}")]
    Field(&'static str),

    /// Failed to write a downloaded image to disk
    #[error("Failed to write image to {path}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Error::Connect(err)
        } else {
            Error::Request(err.to_string())
        }
    }
}
