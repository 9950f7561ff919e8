//! Paginated ticker collection with in-band rate-limit recovery.
//!
//! Pages are fetched strictly one after another. When Polygon answers with
//! an `error` field (its way of signalling rate limiting), the same page is
//! requested again after a cooldown and nothing from the error response is
//! kept. Between successful pages a fixed delay keeps the run under the
//! free-tier request quota.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use polygon_api::types::TickerRecord;
use polygon_api::{Client, Query, TickersQuery};
use url::Url;

use crate::config::{ApiConfig, Pacing};
use crate::error::CollectError;

/// Suspension point used between requests.
///
/// Production code sleeps on the tokio timer; tests substitute a fake that
/// records the requested durations and returns immediately.
pub trait Pause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Ordered, append-only collection of ticker records from one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerBatch {
    records: Vec<TickerRecord>,
}

impl TickerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page of records, returning how many were added.
    pub fn extend_page(&mut self, records: Vec<TickerRecord>) -> usize {
        let added = records.len();
        self.records.extend(records);
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TickerRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TickerRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<TickerRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a TickerBatch {
    type Item = &'a TickerRecord;
    type IntoIter = std::slice::Iter<'a, TickerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Counters for one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// HTTP requests issued, retries included.
    pub requests: u32,
    /// Pages whose records were kept.
    pub pages: u32,
    /// Responses that carried an in-band error.
    pub throttled: u32,
}

/// Progress reported after each successful page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 1-based page number.
    pub page: u32,
    pub page_len: usize,
    /// Records collected so far, this page included.
    pub total: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct CollectionRun {
    pub batch: TickerBatch,
    pub stats: RunStats,
    /// Date stamp fixed at run start and applied to every warehouse row.
    pub as_of: NaiveDate,
}

/// Drives the pagination loop against the tickers endpoint.
pub struct TickerCollector<P = TokioPause> {
    client: Client,
    query: TickersQuery,
    pacing: Pacing,
    pause: P,
}

impl TickerCollector<TokioPause> {
    pub fn new(client: Client, query: TickersQuery, pacing: Pacing) -> Self {
        Self {
            client,
            query,
            pacing,
            pause: TokioPause,
        }
    }

    /// Builds a collector for the active-stocks catalog from run configuration.
    pub fn from_config(api: &ApiConfig, pacing: Pacing) -> Result<Self, CollectError> {
        let client = Client::with_base_url(&api.base_url, api.api_key.clone())?;
        let query = TickersQuery::default().with_limit(api.page_limit);
        Ok(Self::new(client, query, pacing))
    }
}

impl<P: Pause> TickerCollector<P> {
    /// Replaces the suspension strategy.
    pub fn with_pause<Q: Pause>(self, pause: Q) -> TickerCollector<Q> {
        TickerCollector {
            client: self.client,
            query: self.query,
            pacing: self.pacing,
            pause,
        }
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Collects every page and returns the accumulated batch.
    pub async fn collect(&self) -> Result<TickerBatch, CollectError> {
        let as_of = chrono::Local::now().date_naive();
        Ok(self.run(as_of, |_| {}).await?.batch)
    }

    /// Collects every page, reporting progress after each successful one.
    pub async fn run<F>(&self, as_of: NaiveDate, mut on_page: F) -> Result<CollectionRun, CollectError>
    where
        F: FnMut(&PageProgress),
    {
        let mut batch = TickerBatch::new();
        let mut stats = RunStats::default();
        let mut target = Some(self.client.tickers_url(&self.query)?);

        while let Some(url) = target.take() {
            let page = self.fetch_until_ok(&url, &mut stats).await?;
            let next_url = page.next_url().map(str::to_owned);

            let page_len = batch.extend_page(page.into_results());
            stats.pages += 1;
            let progress = PageProgress {
                page: stats.pages,
                page_len,
                total: batch.len(),
            };
            tracing::info!(
                "page {}: {} tickers ({} collected so far)",
                progress.page,
                progress.page_len,
                progress.total
            );
            on_page(&progress);

            if let Some(next) = next_url {
                target = Some(self.client.authorize(&next)?);
                self.pause.pause(self.pacing.page_delay).await;
            }
        }

        tracing::info!(
            "collection finished: {} tickers over {} pages ({} requests, {} throttled)",
            batch.len(),
            stats.pages,
            stats.requests,
            stats.throttled
        );

        Ok(CollectionRun {
            batch,
            stats,
            as_of,
        })
    }

    /// Requests `url` until the response carries no in-band error.
    async fn fetch_until_ok(
        &self,
        url: &Url,
        stats: &mut RunStats,
    ) -> Result<polygon_api::types::TickersPage, CollectError> {
        let mut retries = 0u32;
        loop {
            stats.requests += 1;
            let page = self.client.get_page(url).await?;
            let Some(message) = page.error_message() else {
                return Ok(page);
            };

            stats.throttled += 1;
            if !self.pacing.retry.allows(retries) {
                tracing::error!("giving up after {} attempts: {}", retries + 1, message);
                return Err(CollectError::RetriesExhausted {
                    attempts: retries + 1,
                    message,
                });
            }
            retries += 1;
            tracing::warn!(
                "API error: {}; waiting {}s before retry",
                message,
                self.pacing.cooldown.as_secs()
            );
            self.pause.pause(self.pacing.cooldown).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(ticker: &str) -> TickerRecord {
        match json!({ "ticker": ticker, "market": "stocks" }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn batch_appends_in_order() {
        let mut batch = TickerBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.extend_page(vec![record("A"), record("AA")]), 2);
        assert_eq!(batch.extend_page(vec![]), 0);
        assert_eq!(batch.extend_page(vec![record("AAPL")]), 1);

        let tickers: Vec<&str> = batch
            .iter()
            .map(|r| r["ticker"].as_str().unwrap())
            .collect();
        assert_eq!(tickers, vec!["A", "AA", "AAPL"]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn batch_keeps_duplicates() {
        let mut batch = TickerBatch::new();
        batch.extend_page(vec![record("A")]);
        batch.extend_page(vec![record("A")]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.into_records().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_pause_waits_for_duration() {
        let start = tokio::time::Instant::now();
        TokioPause.pause(Duration::from_secs(12)).await;
        assert!(start.elapsed() >= Duration::from_secs(12));
    }
}
