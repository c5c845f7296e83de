//! Load every CSV matching a glob pattern into one concatenated table.
//!
//! No per-file problem is fatal: empty, headerless, unreadable, and
//! row-less files are skipped with a warning and the rest of the batch
//! still loads.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use saldo_core::{Table, Value, COL_ORIGIN};

/// Why a candidate file contributed no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestWarning {
    /// Byte size zero; never handed to the CSV parser.
    EmptyFile(String),
    /// Parsing produced no header row / no columns.
    NoColumns(String),
    /// Header parsed but zero data rows followed.
    NoRows(String),
    /// I/O or CSV-level failure partway through the file.
    Unreadable(String, String),
}

impl IngestWarning {
    /// File name the warning refers to.
    pub fn file(&self) -> &str {
        match self {
            IngestWarning::EmptyFile(f)
            | IngestWarning::NoColumns(f)
            | IngestWarning::NoRows(f)
            | IngestWarning::Unreadable(f, _) => f,
        }
    }
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestWarning::EmptyFile(name) => write!(f, "empty file, skipping: {name}"),
            IngestWarning::NoColumns(name) => write!(f, "no columns, skipping: {name}"),
            IngestWarning::NoRows(name) => write!(f, "no rows, skipping: {name}"),
            IngestWarning::Unreadable(name, reason) => {
                write!(f, "unreadable, skipping: {name} ({reason})")
            }
        }
    }
}

/// Result of one ingestion pass: the concatenated table plus a warning per
/// skipped file.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub table: Table,
    pub warnings: Vec<IngestWarning>,
}

/// Load all CSVs under `dir` matching `pattern` and concatenate them.
///
/// Every successfully parsed file gets an `origem` column holding its file
/// name with the extension stripped. Returns the empty table when nothing
/// matches or every match is skipped. `Err` only for an invalid pattern.
pub fn load_csvs(dir: &Path, pattern: &str) -> Result<IngestReport> {
    let full = dir.join(pattern);
    let full = full.to_str().context("data directory path is not UTF-8")?;
    let mut paths: Vec<PathBuf> = glob::glob(full)
        .with_context(|| format!("bad glob pattern: {pattern}"))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();

    let mut warnings = Vec::new();
    let mut tables = Vec::new();

    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let size = match fs::metadata(&path) {
            Ok(m) => m.len(),
            Err(e) => {
                warnings.push(IngestWarning::Unreadable(file_name, e.to_string()));
                continue;
            }
        };
        if size == 0 {
            warnings.push(IngestWarning::EmptyFile(file_name));
            continue;
        }

        match read_one(&path) {
            Ok(Some(mut table)) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or(file_name);
                table.push_column(COL_ORIGIN, Value::Text(stem));
                tables.push(table);
            }
            Ok(None) => warnings.push(IngestWarning::NoColumns(file_name)),
            Err(ReadError::NoRows) => warnings.push(IngestWarning::NoRows(file_name)),
            Err(ReadError::Failed(reason)) => {
                warnings.push(IngestWarning::Unreadable(file_name, reason))
            }
        }
    }

    Ok(IngestReport {
        table: Table::concat(tables),
        warnings,
    })
}

enum ReadError {
    NoRows,
    Failed(String),
}

/// Parse one CSV file. `Ok(None)` means the file had no usable header.
fn read_one(path: &Path) -> std::result::Result<Option<Table>, ReadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| ReadError::Failed(e.to_string()))?;

    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h.iter().map(|s| s.to_string()).collect(),
        Err(e) => return Err(ReadError::Failed(e.to_string())),
    };
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Ok(None);
    }

    let mut table = Table::new(headers);
    for record in rdr.records() {
        let record = record.map_err(|e| ReadError::Failed(e.to_string()))?;
        // flexible(true) tolerates ragged rows; pad or truncate to the
        // header width so the table stays rectangular.
        let mut cells: Vec<Value> = record
            .iter()
            .take(table.n_cols())
            .map(|s| Value::Text(s.to_string()))
            .collect();
        while cells.len() < table.n_cols() {
            cells.push(Value::Missing);
        }
        table.push_row(cells);
    }

    if table.is_empty() {
        return Err(ReadError::NoRows);
    }
    Ok(Some(table))
}
