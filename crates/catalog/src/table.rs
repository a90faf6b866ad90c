//! Typed-table definitions
//!
//! A [`TypeTable`] fixes the tabular layout of one constants set: a row
//! count and an ordered, typed column list. The layout is immutable after
//! creation; correcting it means deleting and recreating the table, which
//! is blocked while assignments exist.

use condb_core::{Column, ColumnType, DirectoryId, TableId, Timestamp};
use serde::{Deserialize, Serialize};

/// Schema-fixed tabular definition living in one directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTable {
    id: TableId,
    name: String,
    directory: DirectoryId,
    n_rows: usize,
    n_columns: usize,
    columns: Vec<Column>,
    comment: String,
    created: Timestamp,
}

impl TypeTable {
    pub(crate) fn new(
        id: TableId,
        name: String,
        directory: DirectoryId,
        n_rows: usize,
        columns: Vec<Column>,
        comment: String,
        created: Timestamp,
    ) -> Self {
        let n_columns = columns.len();
        TypeTable {
            id,
            name,
            directory,
            n_rows,
            n_columns,
            columns,
            comment,
            created,
        }
    }

    /// Stable id of this table
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Table name; final segment of the table path
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the owning directory
    pub fn directory(&self) -> DirectoryId {
        self.directory
    }

    /// Fixed number of data rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Fixed number of columns
    ///
    /// Known even on views where column metadata was not loaded.
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    /// Ordered column metadata; empty when not loaded
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Whether column metadata is present on this view
    pub fn columns_loaded(&self) -> bool {
        self.columns.len() == self.n_columns
    }

    /// Find a column by name
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Type of the column at `position`, defaulting to `Double` when
    /// metadata is not loaded
    pub fn column_type_at(&self, position: usize) -> ColumnType {
        self.columns
            .get(position)
            .map(|c| c.column_type)
            .unwrap_or_default()
    }

    /// Free-form comment
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Creation time
    pub fn created(&self) -> Timestamp {
        self.created
    }

    /// A copy of this view without column metadata
    ///
    /// Path and search operations hand these out when the caller did not
    /// ask for columns; the row/column counts stay available.
    pub fn without_columns(&self) -> Self {
        let mut view = self.clone();
        view.columns = Vec::new();
        view
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_directory(&mut self, directory: DirectoryId) {
        self.directory = directory;
    }

    pub(crate) fn set_comment(&mut self, comment: String) {
        self.comment = comment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TypeTable {
        TypeTable::new(
            TableId::from_raw(1),
            "gains".to_string(),
            DirectoryId::ROOT,
            2,
            vec![
                Column::new("channel", ColumnType::Int, 0),
                Column::new("gain", ColumnType::Double, 1),
            ],
            String::new(),
            Timestamp::EPOCH,
        )
    }

    #[test]
    fn test_counts_follow_columns() {
        let t = table();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.n_columns(), 2);
        assert!(t.columns_loaded());
    }

    #[test]
    fn test_without_columns_keeps_counts() {
        let view = table().without_columns();
        assert_eq!(view.n_columns(), 2);
        assert!(view.columns().is_empty());
        assert!(!view.columns_loaded());
        // unknown metadata falls back to double
        assert_eq!(view.column_type_at(0), ColumnType::Double);
    }

    #[test]
    fn test_column_lookup() {
        let t = table();
        assert_eq!(
            t.column_by_name("gain").map(|c| c.column_type),
            Some(ColumnType::Double)
        );
        assert!(t.column_by_name("offset").is_none());
        assert_eq!(t.column_type_at(0), ColumnType::Int);
    }
}
