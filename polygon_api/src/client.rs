//! HTTP client for the Polygon.io reference-data API.

use std::time::Duration;

use url::Url;

use crate::{
    query::{Query, TickersQuery},
    types::TickersPage,
    Error,
};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

const TICKERS_PATH: &str = "/v3/reference/tickers";

/// Query parameter Polygon reads the API key from.
const API_KEY_PARAM: &str = "apiKey";

/// Request timeout for Polygon API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Polygon.io tickers endpoint.
///
/// The client only performs single requests. Following `next_url` cursors
/// and handling in-band rate-limit errors is left to the caller.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to `https://api.polygon.io`.
    base_api_url: String,
    api_key: String,
}

impl Client {
    /// Creates a new client pointing at the production Polygon API.
    pub fn new(api_key: String) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// Builds the first-page URL for a tickers query, API key included.
    pub fn tickers_url(&self, query: &TickersQuery) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, TICKERS_PATH).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidUrl(format!("{}{}: {}", self.base_api_url, TICKERS_PATH, e))
            })?;
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut()
            .append_pair(API_KEY_PARAM, &self.api_key);
        Ok(url)
    }

    /// Turns a `next_url` cursor into a requestable URL by appending the API key.
    ///
    /// Polygon does not carry the key across pages, so it is appended after
    /// whatever query parameters the cursor already has.
    pub fn authorize(&self, next_url: &str) -> Result<Url, Error> {
        let mut url = Url::parse(next_url).map_err(|e| {
            tracing::error!("Invalid next_url {}: {}", next_url, e);
            Error::InvalidUrl(format!("{}: {}", next_url, e))
        })?;
        url.query_pairs_mut()
            .append_pair(API_KEY_PARAM, &self.api_key);
        Ok(url)
    }

    /// Fetches one page of tickers from a fully-formed URL.
    ///
    /// The body is parsed regardless of HTTP status, since rate-limit
    /// responses carry an `error` field in a JSON body. A non-success status
    /// is only an error when the body is not a JSON page.
    pub async fn get_page(&self, url: &Url) -> Result<TickersPage, Error> {
        tracing::debug!("GET {}", redact_api_key(url));
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Transport(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })?;

        match serde_json::from_str::<TickersPage>(&body) {
            Ok(page) => Ok(page),
            Err(_) if !status.is_success() => {
                let snippet = truncate_body(&body);
                tracing::error!("Request failed with status {}: {}", status, snippet);
                Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body: snippet,
                })
            }
            Err(e) => {
                let snippet = truncate_body(&body);
                tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
                Err(Error::Parse {
                    message: e.to_string(),
                    body: snippet,
                })
            }
        }
    }

    /// Fetches the first page of a tickers query.
    pub async fn get_tickers(&self, query: &TickersQuery) -> Result<TickersPage, Error> {
        let url = self.tickers_url(query)?;
        self.get_page(&url).await
    }
}

/// Renders a URL for logging with the API key masked.
pub fn redact_api_key(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == API_KEY_PARAM) {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
