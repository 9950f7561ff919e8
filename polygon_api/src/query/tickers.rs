//! Query builder for the `/v3/reference/tickers` endpoint.

use url::Url;

use super::common::{Query, QueryCommon};

/// Largest page size the tickers endpoint accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Market type filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Market {
    #[default]
    Stocks,
    Crypto,
    Fx,
    Otc,
    Indices,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Stocks => "stocks",
            Market::Crypto => "crypto",
            Market::Fx => "fx",
            Market::Otc => "otc",
            Market::Indices => "indices",
        }
    }
}

/// Field the tickers endpoint sorts by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickerSortBy {
    #[default]
    Ticker,
    Name,
    Market,
    Locale,
    PrimaryExchange,
    Type,
    CurrencyName,
    LastUpdatedUtc,
}

impl TickerSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickerSortBy::Ticker => "ticker",
            TickerSortBy::Name => "name",
            TickerSortBy::Market => "market",
            TickerSortBy::Locale => "locale",
            TickerSortBy::PrimaryExchange => "primary_exchange",
            TickerSortBy::Type => "type",
            TickerSortBy::CurrencyName => "currency_name",
            TickerSortBy::LastUpdatedUtc => "last_updated_utc",
        }
    }
}

/// Query for the ticker catalog.
///
/// The default is the full catalog of active stock tickers, ascending by
/// symbol, 1000 per page.
#[derive(Clone, Debug)]
pub struct TickersQuery {
    pub common: QueryCommon,
    pub market: Market,
    /// `None` omits the filter and returns both active and delisted tickers.
    pub active: Option<bool>,
    pub sort_by: TickerSortBy,
}

impl Default for TickersQuery {
    fn default() -> Self {
        Self {
            common: QueryCommon {
                limit: Some(MAX_LIMIT),
                ..QueryCommon::default()
            },
            market: Market::Stocks,
            active: Some(true),
            sort_by: TickerSortBy::Ticker,
        }
    }
}

impl TickersQuery {
    pub fn with_market(mut self, market: Market) -> Self {
        self.market = market;
        self
    }

    pub fn with_active(mut self, active: Option<bool>) -> Self {
        self.active = active;
        self
    }

    pub fn with_sort_by(mut self, sort_by: TickerSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

impl Query for TickersQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("market", self.market.as_str());
        if let Some(active) = self.active {
            url.query_pairs_mut()
                .append_pair("active", if active { "true" } else { "false" });
        }
        let mut url = self.common.add_to_url(&url);
        url.query_pairs_mut()
            .append_pair("sort", self.sort_by.as_str());
        url
    }

    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
}
