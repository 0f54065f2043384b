use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{columns, Dataset, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why the bidding table could not be loaded. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed delimited file {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed Parquet file {}: {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },
    #[error("cannot decode Parquet data in {}: {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
    #[error("{}: missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the bidding table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – comma separated, header row
/// * `.tsv` / `.tab`   – tab separated, header row
/// * `.json`           – `[{ "Course Code": "...", ... }, ...]`
/// * `.parquet` / `.pq`
///
/// Header and cell whitespace is trimmed; bid cells that are not numbers
/// become absent instead of failing the load.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dropped = records.iter().filter(|(_, bad)| *bad > 0).count();
    if dropped > 0 {
        log::warn!(
            "{dropped} rows of {} had unparsable bid values; treated as absent",
            path.display()
        );
    }
    let dataset = Dataset::from_records(records.into_iter().map(|(r, _)| r).collect());
    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Position of each required column in the source header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    positions: [usize; 9],
}

impl ColumnIndex {
    /// Match headers (trimmed) against the required columns; first match wins.
    fn resolve(headers: &[&str], path: &Path) -> Result<Self, LoadError> {
        let mut positions = [0usize; 9];
        for (slot, column) in positions.iter_mut().zip(columns::REQUIRED) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })?;
        }
        Ok(ColumnIndex { positions })
    }

    /// Build a record from a row; cells past the end of the row are empty.
    ///
    /// Also returns how many non-empty bid cells failed to parse.
    fn record<'a>(&self, cell: impl Fn(usize) -> Option<&'a str>) -> (Record, usize) {
        let cells = self.positions.map(|i| cell(i).unwrap_or(""));
        let record = Record::from_cells(cells);
        let bad = [(cells[7], record.median_bid), (cells[8], record.min_bid)]
            .into_iter()
            .filter(|(raw, parsed)| !raw.trim().is_empty() && parsed.is_none())
            .count();
        (record, bad)
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<(Record, usize)>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let names: Vec<&str> = headers.iter().collect();
    let index = ColumnIndex::resolve(&names, path)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_err)?;
        records.push(index.record(|i| row.get(i)));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "School/Department": "SIS", "Course Code": "IS111", "Median Bid": 21.5, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<(Record, usize)>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = root.as_array().ok_or_else(|| LoadError::Malformed {
        path: path.to_path_buf(),
        message: "expected top-level JSON array".into(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| LoadError::Malformed {
            path: path.to_path_buf(),
            message: format!("row {i} is not a JSON object"),
        })?;
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let values: Vec<String> = obj.values().map(json_cell).collect();
        let index = ColumnIndex::resolve(&keys, path)?;
        records.push(index.record(|i| values.get(i).map(String::as_str)));
    }
    Ok(records)
}

fn json_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the bidding table.
///
/// Column types are free: every cell is rendered to text and then normalized
/// like a CSV cell, so numeric `Section` or string `Median Bid` columns work.
fn load_parquet(path: &Path) -> Result<Vec<(Record, usize)>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let arrow_err = |source| LoadError::Arrow {
        path: path.to_path_buf(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let schema = Arc::clone(builder.schema());
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let index = ColumnIndex::resolve(&names, path)?;
    let reader = builder.build().map_err(parquet_err)?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch.map_err(arrow_err)?;
        for row in 0..batch.num_rows() {
            let mut cells: Vec<Option<String>> = vec![None; batch.num_columns()];
            for &col in &index.positions {
                let array = batch.column(col);
                cells[col] = Some(if array.is_null(row) {
                    String::new()
                } else {
                    array_value_to_string(array, row).map_err(arrow_err)?
                });
            }
            records.push(index.record(|i| cells.get(i).and_then(|c| c.as_deref())));
        }
    }
    Ok(records)
}
