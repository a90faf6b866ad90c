//! Rectangular data matrix carried by an assignment
//!
//! A [`DataTable`] owns the rows × columns of string cells delivered with
//! an assignment. The matrix is rectangular by construction and immutable
//! after creation; shape validation against a type table happens in the
//! engine's creation path.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Immutable rows × columns matrix of string cells
///
/// Stored row-major in one flat vector. Row and column counts are fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    cells: Vec<String>,
    n_rows: usize,
    n_columns: usize,
}

impl DataTable {
    /// Build a matrix from rows of cells
    ///
    /// All rows must have the same length as the first row; a ragged row
    /// fails with [`Error::ColumnCountMismatch`]. Zero rows yield an empty
    /// matrix with zero columns.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_columns = rows.first().map_or(0, Vec::len);

        let mut cells = Vec::with_capacity(n_rows * n_columns);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_columns {
                return Err(Error::ColumnCountMismatch {
                    row: i,
                    expected: n_columns,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(DataTable {
            cells,
            n_rows,
            n_columns,
        })
    }

    /// Build a matrix from a flat token sequence and a known column count
    ///
    /// This is how parsed text records become a matrix: the tokenizer
    /// produces a flat sequence, the table's column count groups it into
    /// rows. The token count must be an exact multiple of `n_columns`.
    pub fn from_tokens(tokens: Vec<String>, n_columns: usize) -> Result<Self> {
        if n_columns == 0 {
            if tokens.is_empty() {
                return Ok(DataTable {
                    cells: Vec::new(),
                    n_rows: 0,
                    n_columns: 0,
                });
            }
            return Err(Error::ColumnCountMismatch {
                row: 0,
                expected: 0,
                actual: tokens.len(),
            });
        }
        if tokens.len() % n_columns != 0 {
            return Err(Error::ColumnCountMismatch {
                row: tokens.len() / n_columns,
                expected: n_columns,
                actual: tokens.len() % n_columns,
            });
        }
        let n_rows = tokens.len() / n_columns;
        Ok(DataTable {
            cells: tokens,
            n_rows,
            n_columns,
        })
    }

    /// Number of rows
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub const fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Whether the matrix holds no cells
    pub const fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Cell text at (row, column), if in bounds
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        if row < self.n_rows && column < self.n_columns {
            Some(&self.cells[row * self.n_columns + column])
        } else {
            None
        }
    }

    /// One row as a cell slice, if in bounds
    pub fn row(&self, row: usize) -> Option<&[String]> {
        if row < self.n_rows {
            let start = row * self.n_columns;
            Some(&self.cells[start..start + self.n_columns])
        } else {
            None
        }
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.n_columns.max(1)).take(self.n_rows)
    }

    /// Consume into rows of owned cells
    pub fn into_rows(self) -> Vec<Vec<String>> {
        let n = self.n_columns.max(1);
        let mut rows = Vec::with_capacity(self.n_rows);
        let mut iter = self.cells.into_iter();
        for _ in 0..self.n_rows {
            rows.push(iter.by_ref().take(n).collect());
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_rows_rectangular() {
        let dt = DataTable::from_rows(vec![row(&["1", "2"]), row(&["3", "4"])]).unwrap();
        assert_eq!(dt.n_rows(), 2);
        assert_eq!(dt.n_columns(), 2);
        assert_eq!(dt.get(1, 0), Some("3"));
        assert_eq!(dt.get(2, 0), None);
        assert_eq!(dt.get(0, 2), None);
    }

    #[test]
    fn test_from_rows_ragged_fails() {
        let err = DataTable::from_rows(vec![row(&["1", "2"]), row(&["3"])]).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnCountMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_from_rows_empty() {
        let dt = DataTable::from_rows(vec![]).unwrap();
        assert!(dt.is_empty());
        assert_eq!(dt.n_columns(), 0);
        assert_eq!(dt.rows().count(), 0);
    }

    #[test]
    fn test_from_tokens_groups_rows() {
        let tokens = row(&["a", "b", "c", "d", "e", "f"]);
        let dt = DataTable::from_tokens(tokens, 3).unwrap();
        assert_eq!(dt.n_rows(), 2);
        assert_eq!(dt.row(0).unwrap(), &row(&["a", "b", "c"])[..]);
        assert_eq!(dt.row(1).unwrap(), &row(&["d", "e", "f"])[..]);
    }

    #[test]
    fn test_from_tokens_remainder_fails() {
        let tokens = row(&["a", "b", "c", "d", "e"]);
        assert!(DataTable::from_tokens(tokens, 3).is_err());
    }

    #[test]
    fn test_into_rows_round_trip() {
        let rows = vec![row(&["1", "2"]), row(&["3", "4"])];
        let dt = DataTable::from_rows(rows.clone()).unwrap();
        assert_eq!(dt.into_rows(), rows);
    }
}
