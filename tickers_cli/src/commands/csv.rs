//! The `csv` subcommand: collect the catalog into a flat file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tickers_lib::config::DEFAULT_CSV_PATH;
use tickers_lib::{AppConfig, CsvSink};

#[derive(Args, Debug)]
pub struct CsvArgs {
    /// Output file. Overwritten if it exists
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    pub output: PathBuf,
}

pub async fn run(args: &CsvArgs, config: &AppConfig) -> Result<()> {
    let run = super::collect(config).await?;
    let mut sink = CsvSink::new(&args.output);
    super::write(&mut sink, &run);
    Ok(())
}
