//! Normalization of a ticker batch into rows and columns.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::collector::TickerBatch;

/// Name of the as-of date column added for the warehouse.
pub const AS_OF_COLUMN: &str = "ds";

/// How a batch is laid out for a particular sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableShape {
    /// Upper-case every column name.
    pub upper_case_columns: bool,
    /// Stamp every row with this date in an extra [`AS_OF_COLUMN`].
    pub as_of: Option<NaiveDate>,
}

impl TableShape {
    /// Column names as returned by the API, no extra columns.
    pub fn file() -> Self {
        Self {
            upper_case_columns: false,
            as_of: None,
        }
    }

    /// Upper-cased column names plus a `DS` column holding `as_of`.
    pub fn warehouse(as_of: NaiveDate) -> Self {
        Self {
            upper_case_columns: true,
            as_of: Some(as_of),
        }
    }
}

/// A batch flattened into a rectangular table.
///
/// Columns appear in the order their keys are first seen across the batch.
/// Records that lack a column hold `Value::Null` in that cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TickerTable {
    pub fn from_batch(batch: &TickerBatch, shape: &TableShape) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in batch {
            for key in record.keys() {
                if !index.contains_key(key) {
                    index.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        let mut rows: Vec<Vec<Value>> = batch
            .iter()
            .map(|record| {
                let mut row = vec![Value::Null; columns.len()];
                for (key, value) in record {
                    row[index[key]] = value.clone();
                }
                row
            })
            .collect();

        if let Some(as_of) = shape.as_of {
            let stamp = Value::String(as_of.format("%Y-%m-%d").to_string());
            // An existing `ds` field is overwritten, not duplicated.
            match index.get(AS_OF_COLUMN) {
                Some(&i) => rows.iter_mut().for_each(|row| row[i] = stamp.clone()),
                None => {
                    columns.push(AS_OF_COLUMN.to_string());
                    rows.iter_mut().for_each(|row| row.push(stamp.clone()));
                }
            }
        }

        if shape.upper_case_columns {
            columns = columns.iter().map(|c| c.to_uppercase()).collect();
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each row rendered as text cells, for flat-file output.
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows
            .iter()
            .map(|row| row.iter().map(render_cell).collect())
    }
}

/// Renders one cell as text: null is empty, strings are verbatim, anything
/// else is its compact JSON form.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
