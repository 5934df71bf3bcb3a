//! Tab-separated input tables with a header row.

use csv::{ReaderBuilder, StringRecord, Trim};
use gridplan_core::{GridplanError, GridplanResult};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Value used in optional columns to mean "not applicable".
pub const MISSING: &str = ".";

fn reader(path: &Path) -> GridplanResult<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(GridplanError::input(path, "file does not exist"));
    }
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| GridplanError::input(path, format!("cannot open: {e}")))
}

/// Deserialize every row of `path` into `T`, matching columns by header name.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> GridplanResult<Vec<T>> {
    let mut rdr = reader(path)?;
    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let row: T = result.map_err(|e| {
            // header is line 1
            GridplanError::input(path, format!("row {}: {}", line + 2, e))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Untyped table for files whose column set varies by run.
#[derive(Debug, Clone)]
pub struct TabTable {
    path: PathBuf,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl TabTable {
    pub fn read(path: &Path) -> GridplanResult<Self> {
        let mut rdr = reader(path)?;
        let headers = rdr
            .headers()
            .map_err(|e| GridplanError::input(path, format!("cannot read header: {e}")))?
            .clone();
        let mut rows = Vec::new();
        for result in rdr.records() {
            rows.push(result.map_err(|e| GridplanError::input(path, e.to_string()))?);
        }
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> GridplanResult<usize> {
        self.column(name)
            .ok_or_else(|| GridplanError::input(&self.path, format!("missing column '{}'", name)))
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    /// Cell at `(row, column)`, or `None` when empty or `.`.
    pub fn cell<'a>(&self, row: &'a StringRecord, column: usize) -> Option<&'a str> {
        row.get(column).filter(|v| !v.is_empty() && *v != MISSING)
    }

    pub fn parse_f64(&self, row: &StringRecord, column: usize) -> GridplanResult<Option<f64>> {
        match self.cell(row, column) {
            None => Ok(None),
            Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
                GridplanError::input(
                    &self.path,
                    format!(
                        "column '{}' value '{}' is not a number",
                        self.headers.get(column).unwrap_or_default(),
                        raw
                    ),
                )
            }),
        }
    }
}
