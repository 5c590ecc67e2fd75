//! REST client for the catalog, blog and order services.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - Every endpoint answers with a `{ success, data }` envelope
//! - The backend is the source of truth - no local sync
//! - In-memory caching via `moka` for single-document lookups and blogs
//!
//! # Example
//!
//! ```rust,ignore
//! use emberline_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let blogs = client.blogs().await?;
//! let product = client.product_by_id(&product_id).await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status code.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend answered `success: false`.
    #[error("Backend reported failure: {}", .0.as_deref().unwrap_or("(no message)"))]
    Rejected(Option<String>),

    /// The envelope was missing its payload or the payload had the wrong shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The requested document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl ApiError {
    /// Whether the failure happened before the backend produced an answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout | Self::Status { .. })
    }
}
