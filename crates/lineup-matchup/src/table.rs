// Long-format lineup table: one row per (date, player), a text date key and
// named numeric columns.
//
// The data-preparation layer hands tables over either in memory or as CSV
// text with a header row. Empty cells become NaN so that the actual-outcome
// path can skip players with missing stats.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv { source: csv::Error },

    #[error("date column `{column}` not found in header")]
    MissingDateColumn { column: String },

    #[error("invalid value {value:?} in column `{column}` at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("column `{column}` has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column `{column}`")]
    DuplicateColumn { column: String },
}

// ---------------------------------------------------------------------------
// LongTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LongTable {
    dates: Vec<String>,
    column_order: Vec<String>,
    columns: HashMap<String, Vec<f64>>,
}

impl LongTable {
    /// Create a table with the given per-row date keys and no value columns.
    pub fn new<S: Into<String>>(dates: impl IntoIterator<Item = S>) -> Self {
        LongTable {
            dates: dates.into_iter().map(Into::into).collect(),
            column_order: Vec::new(),
            columns: HashMap::new(),
        }
    }

    /// Add a numeric column. The column must have one value per row.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, TableError> {
        self.push_column(name, values)?;
        Ok(self)
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        if self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn { column: name });
        }
        self.column_order.push(name.clone());
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in insertion (or CSV header) order, excluding the date key.
    pub fn column_names(&self) -> &[String] {
        &self.column_order
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Parse a headered CSV. `date_column` is kept as text; every other
    /// column must hold numbers, with empty cells read as NaN.
    pub fn from_csv_reader<R: Read>(rdr: R, date_column: &str) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_reader(rdr);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| TableError::Csv { source })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(TableError::DuplicateColumn {
                    column: header.clone(),
                });
            }
        }

        let date_idx = headers
            .iter()
            .position(|h| h == date_column)
            .ok_or_else(|| TableError::MissingDateColumn {
                column: date_column.to_string(),
            })?;

        let mut dates = Vec::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|source| TableError::Csv { source })?;
            for (idx, field) in record.iter().enumerate() {
                if idx == date_idx {
                    dates.push(field.trim().to_string());
                    continue;
                }
                let value = parse_value(field).ok_or_else(|| TableError::InvalidValue {
                    row: row + 1,
                    column: headers[idx].clone(),
                    value: field.to_string(),
                })?;
                values[idx].push(value);
            }
        }

        let mut table = LongTable::new(dates);
        for (idx, (name, column)) in headers.into_iter().zip(values).enumerate() {
            if idx == date_idx {
                continue;
            }
            table.push_column(name, column)?;
        }
        debug!(
            rows = table.len(),
            columns = table.column_order.len(),
            "parsed lineup table"
        );
        Ok(table)
    }

    /// Load a table from a CSV file on disk.
    pub fn from_csv_path(path: &Path, date_column: &str) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_csv_reader(file, date_column)
    }
}

/// Empty cells are missing stats, not parse failures.
fn parse_value(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Some(f64::NAN);
    }
    trimmed.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_roundtrip_keeps_row_order() {
        let csv_data = "\
date,pts,reb
2024-01-02,21.5,7
2024-01-01,18,10
2024-01-02,9,3";

        let table = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.dates(), ["2024-01-02", "2024-01-01", "2024-01-02"]);
        assert_eq!(table.column_names(), ["pts", "reb"]);
        assert_eq!(table.column("pts").unwrap(), [21.5, 18.0, 9.0]);
        assert_eq!(table.column("reb").unwrap(), [7.0, 10.0, 3.0]);
    }

    #[test]
    fn date_column_may_appear_anywhere() {
        let csv_data = "\
pts,date,ft_pct
10,2024-01-01,0.8";

        let table = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap();
        assert_eq!(table.dates(), ["2024-01-01"]);
        assert!(table.has_column("pts"));
        assert!(table.has_column("ft_pct"));
        assert!(!table.has_column("date"));
    }

    #[test]
    fn empty_cells_become_nan() {
        let csv_data = "\
date,pts,fta
2024-01-01,,4
2024-01-01,12,";

        let table = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap();
        let pts = table.column("pts").unwrap();
        assert!(pts[0].is_nan());
        assert_eq!(pts[1], 12.0);
        assert!(table.column("fta").unwrap()[1].is_nan());
    }

    #[test]
    fn names_and_dates_trimmed() {
        let csv_data = "\
 date , pts
 2024-01-01 , 3 ";

        let table = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap();
        assert_eq!(table.dates(), ["2024-01-01"]);
        assert_eq!(table.column("pts").unwrap(), [3.0]);
    }

    #[test]
    fn missing_date_column_rejected() {
        let csv_data = "\
day,pts
2024-01-01,3";

        let err = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap_err();
        assert!(matches!(err, TableError::MissingDateColumn { ref column } if column == "date"));
    }

    #[test]
    fn non_numeric_value_reports_row_and_column() {
        let csv_data = "\
date,pts
2024-01-01,3
2024-01-01,lots";

        let err = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap_err();
        match err {
            TableError::InvalidValue { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "pts");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_header_rejected() {
        let csv_data = "\
date,pts,pts
2024-01-01,3,4";

        let err = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn ragged_row_is_csv_error() {
        let csv_data = "\
date,pts,reb
2024-01-01,3";

        let err = LongTable::from_csv_reader(csv_data.as_bytes(), "date").unwrap_err();
        assert!(matches!(err, TableError::Csv { .. }));
    }

    #[test]
    fn with_column_checks_length() {
        let err = LongTable::new(["d1", "d1"])
            .with_column("pts", vec![1.0])
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn with_column_rejects_duplicates() {
        let err = LongTable::new(["d1"])
            .with_column("pts", vec![1.0])
            .unwrap()
            .with_column("pts", vec![2.0])
            .unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LongTable::from_csv_path(Path::new("does/not/exist.csv"), "date").unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}
