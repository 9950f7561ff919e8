//! Flat CSV file sink.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{TickerSink, WriteReport};
use crate::error::SinkError;
use crate::table::{TableShape, TickerTable};

/// Writes the table as a comma-delimited file with a header row.
///
/// An existing file at the path is overwritten.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TickerSink for CsvSink {
    fn shape(&self, _as_of: NaiveDate) -> TableShape {
        TableShape::file()
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }

    fn write(&mut self, table: &TickerTable) -> Result<WriteReport, SinkError> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        if !table.columns().is_empty() {
            wtr.write_record(table.columns())?;
        }
        for row in table.text_rows() {
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(WriteReport {
            rows: table.row_count(),
            chunks: 1,
            destination: self.destination(),
        })
    }
}
