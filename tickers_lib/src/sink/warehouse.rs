//! SQLite warehouse sink.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, Transaction};
use serde_json::Value;

use super::{TickerSink, WriteReport};
use crate::config::WarehouseConfig;
use crate::error::SinkError;
use crate::table::{TableShape, TickerTable};

/// Rows per insert batch.
pub const DEFAULT_CHUNK_SIZE: usize = 16_000;

/// Appends the table to a warehouse table in a SQLite database.
///
/// Each `write` opens its own connection and releases it before returning,
/// whether or not the load succeeded. The destination table is created on
/// first use and gains any new columns the batch brings; existing rows are
/// never replaced.
#[derive(Debug, Clone)]
pub struct WarehouseSink {
    db_path: PathBuf,
    table: String,
    chunk_size: usize,
}

impl WarehouseSink {
    pub fn new(config: &WarehouseConfig) -> Self {
        Self {
            db_path: config.db_path.clone(),
            table: config.table.clone(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl TickerSink for WarehouseSink {
    fn shape(&self, as_of: NaiveDate) -> TableShape {
        TableShape::warehouse(as_of)
    }

    fn destination(&self) -> String {
        format!("{}:{}", self.db_path.display(), self.table)
    }

    fn write(&mut self, table: &TickerTable) -> Result<WriteReport, SinkError> {
        let table_name = quote_identifier(&self.table)?;
        let mut conn = Connection::open(&self.db_path)?;
        let loaded = load(&mut conn, &table_name, table, self.chunk_size);

        // Released on both paths; a load error takes precedence over a close error.
        let closed = conn.close().map_err(|(_, e)| SinkError::from(e));
        let chunks = loaded?;
        closed?;

        Ok(WriteReport {
            rows: table.row_count(),
            chunks,
            destination: self.destination(),
        })
    }
}

/// Creates or widens the destination table and appends every row in one
/// transaction. Returns the number of insert batches.
fn load(
    conn: &mut Connection,
    table_name: &str,
    table: &TickerTable,
    chunk_size: usize,
) -> Result<usize, SinkError> {
    let columns = table
        .columns()
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Result<Vec<_>, _>>()?;

    let tx = conn.transaction()?;
    ensure_table(&tx, table_name, &columns)?;

    let mut chunks = 0;
    if !columns.is_empty() {
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_name,
            columns.join(", "),
            placeholders
        );
        let mut stmt = tx.prepare(&sql)?;
        for chunk in table.rows().chunks(chunk_size) {
            for row in chunk {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
            }
            chunks += 1;
            tracing::debug!("inserted chunk {} ({} rows)", chunks, chunk.len());
        }
    }
    tx.commit()?;
    Ok(chunks)
}

fn ensure_table(tx: &Transaction<'_>, table_name: &str, columns: &[String]) -> Result<(), SinkError> {
    if columns.is_empty() {
        return Ok(());
    }
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table_name,
        columns.join(", ")
    ))?;

    let existing: Vec<String> = {
        let mut stmt = tx.prepare(&format!("PRAGMA table_info({})", table_name))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        names.into_iter().map(|n| quote_identifier_unchecked(&n)).collect()
    };
    for column in columns {
        if !existing.iter().any(|e| e.eq_ignore_ascii_case(column)) {
            tracing::info!("adding column {} to {}", column, table_name);
            tx.execute_batch(&format!("ALTER TABLE {} ADD COLUMN {}", table_name, column))?;
        }
    }
    Ok(())
}

/// Double-quotes an identifier, rejecting names that would need escaping.
fn quote_identifier(name: &str) -> Result<String, SinkError> {
    if name.is_empty() || name.contains('"') || name.contains('\0') {
        return Err(SinkError::InvalidIdentifier(name.to_string()));
    }
    Ok(quote_identifier_unchecked(name))
}

fn quote_identifier_unchecked(name: &str) -> String {
    format!("\"{}\"", name)
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => SqlValue::Integer(i),
            (None, Some(f)) => SqlValue::Real(f),
            (None, None) => SqlValue::Text(n.to_string()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}
