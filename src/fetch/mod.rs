//! Fetch capability for remote feeds, static documents and map tiles.
//!
//! Everything that touches the network goes through the [`Fetch`] trait so
//! loaders can be driven by an in-memory implementation in tests.

mod http;
#[cfg(test)]
mod memory;

pub use http::HttpFetcher;
#[cfg(test)]
pub use memory::MemoryFetcher;

use std::future::Future;

/// Errors that can occur while fetching a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// A local document could not be read.
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    /// The HTTP client could not be set up.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    /// The body was expected to be text but is not UTF-8.
    #[error("Response from {url} is not valid UTF-8")]
    Encoding { url: String },
}

/// Retrieves the raw body of a resource.
///
/// Note: This trait does not require `Send` bounds since WASM is
/// single-threaded and JS types cannot be sent between threads.
pub trait Fetch {
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>>;
}

/// Fetches a resource and decodes it as UTF-8 text.
pub async fn fetch_text<F: Fetch>(fetcher: &F, url: &str) -> Result<String, FetchError> {
    let bytes = fetcher.fetch_bytes(url).await?;
    String::from_utf8(bytes).map_err(|_| FetchError::Encoding {
        url: url.to_string(),
    })
}

/// Whether a URL must go over the network rather than to a local path.
#[cfg(not(target_arch = "wasm32"))]
pub fn is_remote(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
