//! Destinations a collected table is written to.
//!
//! Both sinks take a fully normalized [`TickerTable`]; the layout each one
//! expects comes from [`TickerSink::shape`].

mod file;
mod warehouse;

pub use self::file::CsvSink;
pub use self::warehouse::WarehouseSink;

use chrono::NaiveDate;

use crate::error::SinkError;
use crate::table::{TableShape, TickerTable};

/// Summary of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub rows: usize,
    /// Insert batches used. Flat files are always written in one.
    pub chunks: usize,
    /// Human-readable target, e.g. a file path or `db.sqlite:STOCK_TICKERS`.
    pub destination: String,
}

/// A place a ticker table can be written to.
pub trait TickerSink {
    /// Layout this sink expects, given the run's as-of date.
    fn shape(&self, as_of: NaiveDate) -> TableShape;

    /// Human-readable target, used in banners even when the write fails.
    fn destination(&self) -> String;

    fn write(&mut self, table: &TickerTable) -> Result<WriteReport, SinkError>;
}

/// Outcome of handing a table to a sink. Failures are captured, not raised.
#[derive(Debug)]
pub enum Delivery {
    Written(WriteReport),
    Failed {
        destination: String,
        error: SinkError,
    },
}

impl Delivery {
    pub fn is_success(&self) -> bool {
        matches!(self, Delivery::Written(_))
    }

    /// One-line status for the console.
    pub fn banner(&self) -> String {
        match self {
            Delivery::Written(report) => format!(
                "Successfully wrote {} rows into {}",
                report.rows, report.destination
            ),
            Delivery::Failed { destination, error } => {
                format!("Failed to write data to {}: {}", destination, error)
            }
        }
    }
}

/// Writes `table` to `sink`, turning any failure into [`Delivery::Failed`].
pub fn deliver<S: TickerSink + ?Sized>(sink: &mut S, table: &TickerTable) -> Delivery {
    match sink.write(table) {
        Ok(report) => {
            tracing::info!("wrote {} rows into {}", report.rows, report.destination);
            Delivery::Written(report)
        }
        Err(error) => {
            let destination = sink.destination();
            tracing::error!("failed to write to {}: {}", destination, error);
            Delivery::Failed { destination, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl TickerSink for FailingSink {
        fn shape(&self, _as_of: NaiveDate) -> TableShape {
            TableShape::file()
        }

        fn destination(&self) -> String {
            "nowhere".to_string()
        }

        fn write(&mut self, _table: &TickerTable) -> Result<WriteReport, SinkError> {
            Err(SinkError::InvalidIdentifier("bad\"name".to_string()))
        }
    }

    #[test]
    fn deliver_captures_failure() {
        let delivery = deliver(&mut FailingSink, &TickerTable::default());
        assert!(!delivery.is_success());
        let banner = delivery.banner();
        assert!(banner.starts_with("Failed to write data to nowhere"));
    }

    #[test]
    fn written_banner_reports_rows() {
        let delivery = Delivery::Written(WriteReport {
            rows: 1250,
            chunks: 1,
            destination: "warehouse.db:STOCK_TICKERS".to_string(),
        });
        assert!(delivery.is_success());
        assert_eq!(
            delivery.banner(),
            "Successfully wrote 1250 rows into warehouse.db:STOCK_TICKERS"
        );
    }

    #[test]
    fn deliver_works_through_trait_object() {
        let mut sink: Box<dyn TickerSink> = Box::new(FailingSink);
        let delivery = deliver(sink.as_mut(), &TickerTable::default());
        assert!(matches!(delivery, Delivery::Failed { .. }));
    }
}
