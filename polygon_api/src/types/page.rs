use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One ticker as returned by the API.
///
/// Kept as a loose field map: the endpoint adds fields over time and
/// individual tickers omit fields they have no value for. Field order
/// follows the response body.
pub type TickerRecord = Map<String, Value>;

/// A single page of the `/v3/reference/tickers` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickersPage {
    #[serde(default)]
    pub results: Option<Vec<TickerRecord>>,
    /// Cursor URL for the next page. Does not carry the API key.
    #[serde(default)]
    pub next_url: Option<String>,
    /// Set on rate limiting and other in-band failures, usually with HTTP 200.
    /// `Some(Value::Null)` when the key is present with a null value.
    #[serde(default, deserialize_with = "present")]
    pub error: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Keeps a present key as `Some`, even when its value is null.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TickersPage {
    /// The in-band error message, if the API signalled one.
    ///
    /// Any `error` key counts, including one whose value is null.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => Some("unspecified error".to_string()),
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The next page cursor. Empty strings count as "no next page".
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the page, returning its records (empty when absent or null).
    pub fn into_results(self) -> Vec<TickerRecord> {
        self.results.unwrap_or_default()
    }
}
