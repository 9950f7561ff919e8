//! Console output: progress lines and write banners.

use tickers_lib::{CollectionRun, Delivery, PageProgress};

pub fn progress_line(progress: &PageProgress) -> String {
    format!("Collected {} tickers so far...", progress.total)
}

pub fn done_line(run: &CollectionRun) -> String {
    let mut line = format!("Done! Total tickers collected: {}", run.batch.len());
    if run.stats.throttled > 0 {
        line.push_str(&format!(
            " ({} rate-limited responses retried)",
            run.stats.throttled
        ));
    }
    line
}

pub fn print_delivery(delivery: &Delivery) {
    match delivery {
        Delivery::Written(_) => println!("{}", delivery.banner()),
        Delivery::Failed { .. } => eprintln!("{}", delivery.banner()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tickers_lib::{RunStats, TickerBatch};

    fn run_with(throttled: u32) -> CollectionRun {
        CollectionRun {
            batch: TickerBatch::new(),
            stats: RunStats {
                requests: 1 + throttled,
                pages: 1,
                throttled,
            },
            as_of: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        }
    }

    #[test]
    fn progress_line_reports_running_total() {
        let line = progress_line(&PageProgress {
            page: 2,
            page_len: 250,
            total: 1250,
        });
        assert_eq!(line, "Collected 1250 tickers so far...");
    }

    #[test]
    fn done_line_plain() {
        assert_eq!(done_line(&run_with(0)), "Done! Total tickers collected: 0");
    }

    #[test]
    fn done_line_mentions_retries() {
        assert_eq!(
            done_line(&run_with(3)),
            "Done! Total tickers collected: 0 (3 rate-limited responses retried)"
        );
    }
}
