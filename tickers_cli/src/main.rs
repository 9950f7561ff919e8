mod commands;
mod output;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tickers_lib::config::validate_page_limit;
use tickers_lib::AppConfig;
use tracing_subscriber::EnvFilter;

/// Log directives used when `RUST_LOG` is unset or empty.
const DEFAULT_LOG_DIRECTIVES: &str = "tickers_lib=warn,polygon_api=warn";

#[derive(Parser, Debug)]
#[command(name = "tickers")]
#[command(about = "Collect the Polygon.io stock ticker catalog into a CSV file or a warehouse table")]
struct Cli {
    /// Tickers per page (1-1000). Overrides TICKERS_PAGE_LIMIT
    #[arg(long, global = true)]
    limit: Option<u32>,

    /// API base URL. Overrides POLYGON_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write all active stock tickers to a CSV file
    Csv(commands::csv::CsvArgs),
    /// Append all active stock tickers to the warehouse table
    Warehouse(commands::warehouse::WarehouseArgs),
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration.
    fn apply(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(limit) = self.limit {
            config.api.page_limit = validate_page_limit(limit).map_err(|e| anyhow!(e))?;
        }
        if let Some(ref base_url) = self.base_url {
            config.api.base_url = base_url.clone();
        }
        Ok(config)
    }
}

/// `RUST_LOG` wins outright when set; otherwise the crates log warnings only.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    match rust_log.filter(|d| !d.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(DEFAULT_LOG_DIRECTIVES),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env()?)?;

    match &cli.command {
        Commands::Csv(args) => commands::csv::run(args, &config).await?,
        Commands::Warehouse(args) => commands::warehouse::run(args, &config).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickers_lib::config::API_KEY_VAR;

    fn base_config() -> AppConfig {
        AppConfig::from_lookup(|key| (key == API_KEY_VAR).then(|| "k".to_string())).unwrap()
    }

    #[test]
    fn parses_csv_with_defaults() {
        let cli = Cli::try_parse_from(["tickers", "csv"]).unwrap();
        match cli.command {
            Commands::Csv(args) => assert_eq!(args.output.to_str(), Some("tickers.csv")),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.limit.is_none());
    }

    #[test]
    fn parses_warehouse_with_overrides() {
        let cli = Cli::try_parse_from([
            "tickers",
            "warehouse",
            "--db",
            "/tmp/wh.db",
            "--table",
            "TICKERS_STAGING",
            "--limit",
            "500",
        ])
        .unwrap();
        assert_eq!(cli.limit, Some(500));
        match cli.command {
            Commands::Warehouse(args) => {
                assert_eq!(args.db.as_deref().and_then(|p| p.to_str()), Some("/tmp/wh.db"));
                assert_eq!(args.table.as_deref(), Some("TICKERS_STAGING"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rust_log_overrides_default_directives() {
        let filter = log_filter(Some("tickers_lib=info".to_string())).to_string();
        assert!(filter.contains("tickers_lib=info"));
        assert!(!filter.contains("warn"));
    }

    #[test]
    fn default_directives_when_rust_log_unset() {
        for unset in [None, Some(String::new())] {
            let filter = log_filter(unset).to_string();
            assert!(filter.contains("tickers_lib=warn"));
            assert!(filter.contains("polygon_api=warn"));
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["tickers"]).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from(["tickers", "--limit", "10", "--base-url", "http://localhost:1", "csv"])
            .unwrap();
        let config = cli.apply(base_config()).unwrap();
        assert_eq!(config.api.page_limit, 10);
        assert_eq!(config.api.base_url, "http://localhost:1");
    }

    #[test]
    fn out_of_range_limit_is_rejected() {
        let cli = Cli::try_parse_from(["tickers", "csv", "--limit", "0"]).unwrap();
        assert!(cli.apply(base_config()).is_err());
    }
}
