//! Comma-separated result tables.

use gridplan_core::{GridplanError, GridplanResult};
use std::path::Path;

/// Values closer to zero than this are written as `0`.
const ZERO_SNAP: f64 = 1e-9;

/// Format a solved value for output; solver noise around zero is snapped.
pub fn format_value(value: f64) -> String {
    if value.abs() < ZERO_SNAP {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Write `header` and `rows` to `path`, replacing any existing file.
///
/// Rows are written in the order given; callers sort for deterministic output.
pub fn write_table<I>(path: &Path, header: &[&str], rows: I) -> GridplanResult<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let io_err = |e: csv::Error| GridplanError::input(path, e.to_string());
    let mut wtr = csv::Writer::from_path(path).map_err(io_err)?;
    wtr.write_record(header).map_err(io_err)?;
    for row in rows {
        if row.len() != header.len() {
            return Err(GridplanError::input(
                path,
                format!("row has {} fields, header has {}", row.len(), header.len()),
            ));
        }
        wtr.write_record(&row).map_err(io_err)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_header_even_without_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_table(&path, &["project", "period"], Vec::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "project,period\n");
    }

    #[test]
    fn snaps_solver_noise() {
        assert_eq!(format_value(-1e-12), "0");
        assert_eq!(format_value(300.0), "300");
        assert_eq!(format_value(12.5), "12.5");
    }

    #[test]
    fn rejects_ragged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let err = write_table(&path, &["a", "b"], vec![vec!["1".to_string()]]).unwrap_err();
        assert!(err.to_string().contains("bad.csv"));
    }
}
