mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{redact_api_key, Client, DEFAULT_BASE_URL};
pub use self::errors::Error;
pub use self::query::{Market, Query, QueryCommon, SortDirection, TickerSortBy, TickersQuery, MAX_LIMIT};
