//! Rectangular table grid.

use serde::{Deserialize, Serialize};

/// Delimiter used between cells of a delimited grid.
pub const CELL_DELIMITER: char = '\t';

/// A rectangular grid of cell texts.
///
/// Every row has the same number of cells; short rows are padded with
/// empty cells on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from rows, padding short rows.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { rows }
    }

    /// Create a grid from string rows.
    pub fn from_strings<S: Into<String>, R: IntoIterator<Item = S>>(
        rows: impl IntoIterator<Item = R>,
    ) -> Self {
        Self::from_rows(
            rows.into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Parse delimited text: one row per line, cells split by `delimiter`.
    ///
    /// Empty text is a grid with no rows.
    pub fn from_delimited(text: &str, delimiter: char) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        let rows = text
            .split('\n')
            .map(|line| line.split(delimiter).map(str::to_string).collect())
            .collect();
        Self::from_rows(rows)
    }

    /// Serialize to delimited text: cells joined by `delimiter`, rows by newlines.
    pub fn to_delimited(&self, delimiter: char) -> String {
        let delimiter = delimiter.to_string();
        self.rows
            .iter()
            .map(|row| row.join(&delimiter))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of the grid.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell text at a position (0-indexed).
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Indices of columns whose cells are empty in every row.
    pub fn empty_columns(&self) -> Vec<usize> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        (0..self.column_count())
            .filter(|&c| self.rows.iter().all(|row| row[c].is_empty()))
            .collect()
    }

    /// Remove every fully-empty column. Returns the number removed.
    pub fn drop_empty_columns(&mut self) -> usize {
        let empty = self.empty_columns();
        if empty.is_empty() {
            return 0;
        }
        for row in &mut self.rows {
            let mut column = 0;
            row.retain(|_| {
                let keep = empty.binary_search(&column).is_err();
                column += 1;
                keep
            });
        }
        empty.len()
    }
}
