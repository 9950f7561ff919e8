//! The `warehouse` subcommand: append the catalog to a SQLite table.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tickers_lib::{AppConfig, WarehouseConfig, WarehouseSink};

#[derive(Args, Debug)]
pub struct WarehouseArgs {
    /// SQLite database path. Overrides TICKERS_WAREHOUSE_DB
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Destination table. Overrides TICKERS_WAREHOUSE_TABLE
    #[arg(long)]
    pub table: Option<String>,
}

impl WarehouseArgs {
    fn resolve(&self, base: &WarehouseConfig) -> WarehouseConfig {
        WarehouseConfig {
            db_path: self.db.clone().unwrap_or_else(|| base.db_path.clone()),
            table: self.table.clone().unwrap_or_else(|| base.table.clone()),
        }
    }
}

pub async fn run(args: &WarehouseArgs, config: &AppConfig) -> Result<()> {
    let run = super::collect(config).await?;
    let mut sink = WarehouseSink::new(&args.resolve(&config.warehouse));
    super::write(&mut sink, &run);
    Ok(())
}
