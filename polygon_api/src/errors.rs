//! Error types for the API client.

/// Errors that can occur when making API requests.
///
/// Rate limiting is not represented here: Polygon reports it inside an
/// otherwise well-formed JSON body, which is returned to the caller as a
/// [`TickersPage`](crate::types::TickersPage) with its `error` field set.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the body could not be read
    /// (connection failure, timeout, TLS).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API returned a non-success status and a body that is not a JSON page.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The body was not a valid JSON page.
    #[error("Failed to parse response: {message}")]
    Parse { message: String, body: String },
    /// A base URL or `next_url` could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
