mod common;
pub use self::common::{Query, QueryCommon, SortDirection};

mod tickers;
pub use self::tickers::{Market, TickerSortBy, TickersQuery, MAX_LIMIT};
