//! Production fetcher.
//!
//! On WASM requests go through the browser's `fetch`, and relative URLs
//! resolve against the hosting page. On native each request runs on its own
//! thread against one shared blocking `reqwest` client, so concurrent fetches
//! overlap and reuse pooled connections; relative URLs are read from disk
//! under `asset_root`.

use super::{Fetch, FetchError};
use std::future::Future;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Fetcher backed by the platform's HTTP stack.
///
/// Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Directory that relative URLs resolve against (native only)
    #[cfg(not(target_arch = "wasm32"))]
    asset_root: PathBuf,
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Identifies the app to tile servers, which reject anonymous clients.
    pub const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    /// Builds the fetcher. `timeout` applies per request on native; the
    /// browser applies its own.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(asset_root: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            asset_root: PathBuf::from(asset_root),
            client,
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new(_asset_root: &str, _timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {})
    }

    /// Resolves a relative URL to a path under the asset root.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn local_path(&self, url: &str) -> PathBuf {
        self.asset_root.join(url.trim_start_matches("./"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn fetch_blocking(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if !super::is_remote(url) {
            let path = self.local_path(url);
            log::debug!("Reading {}", path.display());
            return std::fs::read(&path).map_err(|e| FetchError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }

        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Fetch for HttpFetcher {
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> {
        let (sender, receiver) = futures_channel::oneshot::channel();
        let fetcher = self.clone();
        let url = url.to_string();
        let worker_url = url.clone();

        std::thread::spawn(move || {
            let _ = sender.send(fetcher.fetch_blocking(&worker_url));
        });

        async move {
            receiver.await.unwrap_or_else(|_| {
                Err(FetchError::Request {
                    url,
                    message: "fetch worker exited before responding".to_string(),
                })
            })
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Fetch for HttpFetcher {
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> {
        let url = url.to_string();
        async move { fetch_with_browser(&url).await }
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_with_browser(url: &str) -> Result<Vec<u8>, FetchError> {
    use wasm_bindgen::JsCast as _;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let request_error = |message: String| FetchError::Request {
        url: url.to_string(),
        message,
    };

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| request_error(format!("Failed to create request: {:?}", e)))?;

    let window = web_sys::window().ok_or_else(|| request_error("No window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| request_error(format!("Fetch failed: {:?}", e)))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| request_error("Response is not a Response".to_string()))?;

    if !resp.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    let buffer_promise = resp
        .array_buffer()
        .map_err(|e| request_error(format!("Failed to get array buffer: {:?}", e)))?;
    let array_buffer = JsFuture::from(buffer_promise)
        .await
        .map_err(|e| request_error(format!("Failed to read response: {:?}", e)))?;

    Ok(js_sys::Uint8Array::new(&array_buffer).to_vec())
}
