//! CLI subcommand implementations.
//!
//! Both subcommands share one pipeline: collect every page, shape the batch
//! for the chosen sink, write it, and print the outcome.

pub mod csv;
pub mod warehouse;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tickers_lib::{
    deliver, AppConfig, CollectionRun, Delivery, TickerCollector, TickerSink, TickerTable,
};

use crate::output;

/// Runs the pagination loop, printing a line per page.
pub async fn collect(config: &AppConfig) -> Result<CollectionRun> {
    let collector = TickerCollector::from_config(&config.api, config.pacing)?;
    let as_of = chrono::Local::now().date_naive();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(250));

    let run = collector
        .run(as_of, |progress| {
            let line = output::progress_line(progress);
            pb.set_message(line.clone());
            pb.suspend(|| println!("{}", line));
        })
        .await;
    pb.finish_and_clear();

    let run = run?;
    println!("{}", output::done_line(&run));
    Ok(run)
}

/// Shapes the batch for `sink`, writes it, and prints the banner.
///
/// A failed write is reported, not returned as an error.
pub fn write<S: TickerSink>(sink: &mut S, run: &CollectionRun) -> Delivery {
    let table = TickerTable::from_batch(&run.batch, &sink.shape(run.as_of));
    let delivery = deliver(sink, &table);
    output::print_delivery(&delivery);
    delivery
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tickers_lib::types::TickerRecord;
    use tickers_lib::{RunStats, TickerBatch, WarehouseConfig, WarehouseSink};

    fn sample_run() -> CollectionRun {
        let mut batch = TickerBatch::new();
        let mut record = TickerRecord::new();
        record.insert("ticker".to_string(), "A".into());
        record.insert("name".to_string(), "Agilent Technologies Inc.".into());
        batch.extend_page(vec![record]);
        CollectionRun {
            batch,
            stats: RunStats {
                requests: 1,
                pages: 1,
                throttled: 0,
            },
            as_of: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        }
    }

    #[test]
    fn warehouse_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = WarehouseSink::new(&WarehouseConfig {
            db_path: dir.path().join("missing").join("warehouse.db"),
            table: "STOCK_TICKERS".to_string(),
        });
        let delivery = write(&mut sink, &sample_run());
        assert!(!delivery.is_success());
        assert!(delivery.banner().starts_with("Failed to write data to"));
    }

    #[test]
    fn warehouse_success_reports_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = WarehouseSink::new(&WarehouseConfig {
            db_path: dir.path().join("warehouse.db"),
            table: "STOCK_TICKERS".to_string(),
        });
        match write(&mut sink, &sample_run()) {
            Delivery::Written(report) => assert_eq!(report.rows, 1),
            Delivery::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[test]
    fn csv_write_uses_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.csv");
        let mut sink = tickers_lib::CsvSink::new(&path);
        assert!(write(&mut sink, &sample_run()).is_success());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("ticker,name\n"));
    }
}
