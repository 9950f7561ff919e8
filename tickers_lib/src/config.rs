//! Run configuration, read once from the environment and passed down explicitly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use polygon_api::{DEFAULT_BASE_URL, MAX_LIMIT};

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "POLYGON_API_KEY";
pub const BASE_URL_VAR: &str = "POLYGON_BASE_URL";
pub const PAGE_LIMIT_VAR: &str = "TICKERS_PAGE_LIMIT";
pub const COOLDOWN_VAR: &str = "TICKERS_COOLDOWN_SECS";
pub const PAGE_DELAY_VAR: &str = "TICKERS_PAGE_DELAY_SECS";
pub const MAX_RETRIES_VAR: &str = "TICKERS_MAX_RETRIES";
pub const WAREHOUSE_DB_VAR: &str = "TICKERS_WAREHOUSE_DB";
pub const WAREHOUSE_TABLE_VAR: &str = "TICKERS_WAREHOUSE_TABLE";

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);
/// Free-tier quota is 5 requests per minute.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(12);
pub const DEFAULT_CSV_PATH: &str = "tickers.csv";
pub const DEFAULT_WAREHOUSE_DB: &str = "warehouse.db";
pub const DEFAULT_WAREHOUSE_TABLE: &str = "STOCK_TICKERS";

/// Everything a run needs, assembled before the first request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub pacing: Pacing,
    pub warehouse: WarehouseConfig,
}

#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Tickers per page (1-1000).
    pub page_limit: u32,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

/// How the collector waits between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait after an in-band API error before retrying the same page.
    pub cooldown: Duration,
    /// Wait between successful pages. Not applied after the last page.
    pub page_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            page_delay: DEFAULT_PAGE_DELAY,
            retry: RetryPolicy::unbounded(),
        }
    }
}

/// Retry policy for in-band API errors.
///
/// The default retries the same page forever with a fixed cooldown. A cap
/// turns a persistent error into [`CollectError::RetriesExhausted`](crate::CollectError).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded() -> Self {
        Self { max_retries: None }
    }

    pub fn limited(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
        }
    }

    /// Whether another retry is allowed after `retries` retries of the same page.
    pub fn allows(&self, retries: u32) -> bool {
        self.max_retries.map_or(true, |max| retries < max)
    }
}

/// Destination of the warehouse sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    pub table: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_WAREHOUSE_DB),
            table: DEFAULT_WAREHOUSE_TABLE.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(&lookup, API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let base_url = non_empty(&lookup, BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let page_limit = validate_page_limit(parse_var(&lookup, PAGE_LIMIT_VAR, MAX_LIMIT)?)
            .map_err(|reason| ConfigError::Invalid {
                var: PAGE_LIMIT_VAR,
                value: lookup(PAGE_LIMIT_VAR).unwrap_or_default(),
                reason,
            })?;

        let cooldown = Duration::from_secs(parse_var(&lookup, COOLDOWN_VAR, DEFAULT_COOLDOWN.as_secs())?);
        let page_delay =
            Duration::from_secs(parse_var(&lookup, PAGE_DELAY_VAR, DEFAULT_PAGE_DELAY.as_secs())?);
        let retry = match non_empty(&lookup, MAX_RETRIES_VAR) {
            Some(_) => RetryPolicy::limited(parse_var(&lookup, MAX_RETRIES_VAR, 0)?),
            None => RetryPolicy::unbounded(),
        };

        let warehouse = WarehouseConfig {
            db_path: non_empty(&lookup, WAREHOUSE_DB_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WAREHOUSE_DB)),
            table: non_empty(&lookup, WAREHOUSE_TABLE_VAR)
                .unwrap_or_else(|| DEFAULT_WAREHOUSE_TABLE.to_string()),
        };

        Ok(Self {
            api: ApiConfig {
                api_key,
                base_url,
                page_limit,
            },
            pacing: Pacing {
                cooldown,
                page_delay,
                retry,
            },
            warehouse,
        })
    }
}

/// Page size must be between 1 and the endpoint maximum.
pub fn validate_page_limit(limit: u32) -> Result<u32, String> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(format!("page limit must be between 1 and {}", MAX_LIMIT));
    }
    Ok(limit)
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup, var) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
