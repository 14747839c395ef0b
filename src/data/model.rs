use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems with a table or with the names applied to it.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("expected {expected} column names but got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },

    #[error("column '{name}' has {actual} values but the index has {expected} rows")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("expected {expected} header fields for {sensors} sensors, found {actual}")]
    LayoutMismatch {
        sensors: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{0} sensors is more than any export can hold")]
    TooManySensors(usize),
}

// ---------------------------------------------------------------------------
// Column – one named sensor series
// ---------------------------------------------------------------------------

/// A single data column (one sensor channel).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// DataTable – the cleaned working dataset
// ---------------------------------------------------------------------------

/// The cleaned table: one display label per row plus numeric sensor columns.
///
/// The index is kept as text because the Agilent `HMS` label is purely
/// display-formatted; it is neither unique nor guaranteed monotonic.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Name written as the first CSV header cell (`HMS`, `Scan`, `Time`).
    pub index_name: String,
    /// Row labels.
    pub index: Vec<String>,
    /// Data columns, left to right.
    pub columns: Vec<Column>,
}

impl DataTable {
    /// Build a table, checking every column matches the index length.
    pub fn new(
        index_name: impl Into<String>,
        index: Vec<String>,
        columns: Vec<Column>,
    ) -> Result<Self, TableError> {
        let rows = index.len();
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(TableError::RaggedColumn {
                name: bad.name.clone(),
                expected: rows,
                actual: bad.values.len(),
            });
        }
        Ok(DataTable {
            index_name: index_name.into(),
            index,
            columns,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Number of data columns (the index is not counted).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look a column up by its current label. The first match wins when
    /// names repeat.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Minimum and maximum over every finite value of every column.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut finite = self
            .columns
            .iter()
            .flat_map(|c| c.values.iter().copied())
            .filter(|v| v.is_finite())
            .peekable();
        finite.peek()?;
        Some(finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        }))
    }

    /// Borrow the first `n` rows for display.
    pub fn head(&self, n: usize) -> TablePreview<'_> {
        TablePreview {
            table: self,
            rows: n.min(self.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// TablePreview – text rendering of the first rows
// ---------------------------------------------------------------------------

/// Fixed-width text view over the first rows of a [`DataTable`].
pub struct TablePreview<'a> {
    table: &'a DataTable,
    rows: usize,
}

impl fmt::Display for TablePreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.table;
        let index_width = t
            .index
            .iter()
            .take(self.rows)
            .map(String::len)
            .chain(std::iter::once(t.index_name.len()))
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = t
            .columns
            .iter()
            .map(|c| {
                c.values
                    .iter()
                    .take(self.rows)
                    .map(|v| format!("{v:.4}").len())
                    .chain(std::iter::once(c.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<index_width$}", t.index_name)?;
        for (c, &w) in t.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", c.name)?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "{:<index_width$}", t.index[row])?;
            for (c, &w) in t.columns.iter().zip(&widths) {
                write!(f, "  {:>w$}", format!("{:.4}", c.values[row]))?;
            }
            writeln!(f)?;
        }
        write!(f, "[{} rows x {} columns]", t.len(), t.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::new(
            "HMS",
            vec!["10 00 01".into(), "10 00 02".into(), "10 00 03".into()],
            vec![
                Column::new("T1", vec![1.0, 2.0, 3.0]),
                Column::new("T2", vec![-4.0, f64::NAN, 9.5]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = DataTable::new(
            "Scan",
            vec!["1".into(), "2".into()],
            vec![Column::new("a", vec![1.0])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedColumn {
                name: "a".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn value_range_spans_all_columns_and_skips_nan() {
        assert_eq!(sample().value_range(), Some((-4.0, 9.5)));
    }

    #[test]
    fn value_range_of_empty_table_is_none() {
        let t = DataTable::new("Scan", Vec::new(), vec![Column::new("a", Vec::new())]).unwrap();
        assert_eq!(t.value_range(), None);
    }

    #[test]
    fn preview_shows_header_rows_and_shape() {
        let text = sample().head(2).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("HMS"));
        assert!(lines[0].contains("T1") && lines[0].contains("T2"));
        assert!(lines[1].starts_with("10 00 01"));
        assert!(lines[2].contains("NaN"));
        assert_eq!(lines[3], "[3 rows x 2 columns]");
    }
}
