//! Library layer for the ticker collector: paginated collection, table
//! normalization, and the CSV and warehouse sinks.
//!
//! Wraps the `polygon_api` crate with the pagination loop, in-band
//! rate-limit recovery, and request pacing.

pub mod collector;
pub mod config;
pub mod error;
pub mod sink;
pub mod table;

pub use polygon_api;
pub use polygon_api::types;

pub use collector::{
    CollectionRun, PageProgress, Pause, RunStats, TickerBatch, TickerCollector, TokioPause,
};
pub use config::{AppConfig, ApiConfig, Pacing, RetryPolicy, WarehouseConfig};
pub use error::{CollectError, ConfigError, SinkError};
pub use sink::{deliver, CsvSink, Delivery, TickerSink, WarehouseSink, WriteReport};
pub use table::{TableShape, TickerTable};
