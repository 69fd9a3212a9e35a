use crate::api::types::{
    normalize_subreddit, PageRequest, PostPage, RawError, RawPage, ScrapeRequest,
};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Diagnostic endpoints probed by [`FeedClient::check_connectivity`].
const DIAGNOSTIC_PATHS: &[&str] = &["debug_db", "debug"];

/// Errors that can occur while talking to the listing backend.
///
/// An empty page is not an error; see [`crate::feed::LoadOutcome::Exhausted`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Non-2xx response. `message` is the server's `error`/`details` field
    /// when it sent one, otherwise a generic status line.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },
    /// 2xx response whose JSON body carries an `error` field
    #[error("{0}")]
    Application(String),
    /// Body was not the expected JSON shape
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Base URL or endpoint could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// HTTP client for the post listing backend.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, so a
/// clone is handed to every spawned page fetch.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl FeedClient {
    /// Creates a client with a default `reqwest::Client`.
    ///
    /// `timeout` of `None` leaves request timing to the HTTP client defaults.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("postfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, base_url, timeout)
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the `GET /search` URL for a page request.
    ///
    /// Empty `query`/`subreddit` values are omitted; `subreddit` loses any
    /// leading `r/`. All values are percent-encoded.
    pub fn search_url(&self, req: &PageRequest) -> Result<Url, FetchError> {
        let mut url = self.base_url.join("search")?;
        {
            let mut pairs = url.query_pairs_mut();
            let query = req.query.trim();
            if !query.is_empty() {
                pairs.append_pair("query", query);
            }
            let subreddit = normalize_subreddit(&req.subreddit);
            if !subreddit.is_empty() {
                pairs.append_pair("subreddit", subreddit);
            }
            pairs.append_pair("page", &req.page.to_string());
            pairs.append_pair("per_page", &req.per_page.to_string());
        }
        Ok(url)
    }

    /// Fetches one page of posts.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] / [`FetchError::Timeout`] - transport failures
    /// - [`FetchError::HttpStatus`] - non-2xx response
    /// - [`FetchError::Application`] - 2xx response with an `error` field
    /// - [`FetchError::Decode`] - body is not listing JSON
    /// - [`FetchError::ResponseTooLarge`] - body exceeded 5MB
    pub async fn fetch_page(&self, req: &PageRequest) -> Result<PostPage, FetchError> {
        let url = self.search_url(req)?;
        tracing::debug!(url = %url, page = req.page, "Fetching posts page");

        let (status, body) = self.execute(self.http.get(url)).await?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        let raw: RawPage = serde_json::from_slice(&body)?;
        if let Some(message) = raw.error.filter(|m| !m.trim().is_empty()) {
            return Err(FetchError::Application(message));
        }

        let page = RawPage { error: None, ..raw }.into_page(req.page);
        tracing::debug!(
            page = req.page,
            posts = page.posts.len(),
            total_pages = page.total_pages,
            "Fetched posts page"
        );
        Ok(page)
    }

    /// Asks the backend to refresh its data for a subreddit.
    ///
    /// Any 2xx status is success; the response body is ignored.
    pub async fn scrape(&self, req: &ScrapeRequest) -> Result<(), FetchError> {
        let url = self.base_url.join("scrape")?;
        let body = ScrapeRequest {
            subreddit: normalize_subreddit(&req.subreddit).to_string(),
            max_pages: req.max_pages,
        };
        tracing::info!(subreddit = %body.subreddit, max_pages = body.max_pages, "Requesting scrape");

        let (status, body) = self.execute(self.http.post(url).json(&body)).await?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }
        Ok(())
    }

    /// Probes the backend's diagnostic endpoints.
    ///
    /// Failures are logged and never returned; nothing depends on the result.
    pub async fn check_connectivity(&self) {
        for path in DIAGNOSTIC_PATHS {
            let url = match self.base_url.join(path) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(path, error = %e, "Invalid diagnostics URL");
                    continue;
                }
            };
            match self.execute(self.http.get(url)).await {
                Ok((status, body)) => tracing::info!(
                    path,
                    status = status.as_u16(),
                    body = %String::from_utf8_lossy(&body),
                    "Diagnostics probe"
                ),
                Err(e) => {
                    tracing::warn!(path, error = %e, "Diagnostics probe failed");
                }
            }
        }
    }

    /// Sends a request and reads the size-limited body.
    ///
    /// The timeout covers the whole exchange, so a body that stalls
    /// mid-stream fails the same way as a slow connect.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(reqwest::StatusCode, Vec<u8>), FetchError> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
            Ok::<_, FetchError>((status, body))
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| FetchError::Timeout)?,
            None => exchange.await,
        }
    }
}

/// Builds an [`FetchError::HttpStatus`], preferring the server's own message.
fn status_error(status: u16, body: &[u8]) -> FetchError {
    let message = serde_json::from_slice::<RawError>(body)
        .ok()
        .and_then(|raw| raw.error.or(raw.details))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status));
    FetchError::HttpStatus { status, message }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
