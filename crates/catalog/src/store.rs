//! Table store: the schema catalog half of the namespace
//!
//! Holds every [`TypeTable`] keyed by stable [`TableId`], with a per-
//! directory ordered listing. Name validation and sibling uniqueness are
//! enforced here; cross-cutting guards (clashes with subdirectory names,
//! assignment dependents) belong to the engine layer.

use crate::table::TypeTable;
use condb_core::path::validate_name;
use condb_core::{Column, ColumnType, DirectoryId, Error, Result, TableId, Timestamp};
use std::collections::HashMap;
use tracing::debug;

/// Store of typed-table definitions
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: HashMap<TableId, TypeTable>,
    by_directory: HashMap<DirectoryId, Vec<TableId>>,
    next_id: u32,
}

impl TableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from an ordered (column-name, type-name) list
    ///
    /// Column type names map through the case-sensitive
    /// [`ColumnType::from_type_name`] fallback; column names and the table
    /// name must pass identifier validation. The table name must be unique
    /// within the directory.
    pub fn create(
        &mut self,
        name: &str,
        directory: DirectoryId,
        n_rows: usize,
        columns: &[(String, String)],
        comment: &str,
    ) -> Result<TableId> {
        validate_name(name).map_err(|source| Error::InvalidName {
            name: name.to_string(),
            source,
        })?;
        for (column_name, _) in columns {
            validate_name(column_name).map_err(|source| Error::InvalidName {
                name: column_name.clone(),
                source,
            })?;
        }
        if self.find(directory, name).is_some() {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }

        let columns: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(position, (column_name, type_name))| {
                Column::new(
                    column_name.clone(),
                    ColumnType::from_type_name(type_name),
                    position,
                )
            })
            .collect();

        let id = TableId::from_raw(self.next_id);
        self.next_id += 1;
        self.tables.insert(
            id,
            TypeTable::new(
                id,
                name.to_string(),
                directory,
                n_rows,
                columns,
                comment.to_string(),
                Timestamp::now(),
            ),
        );
        self.by_directory.entry(directory).or_default().push(id);

        debug!(table = name, %directory, "type table created");
        Ok(id)
    }

    /// Look up a table by id
    pub fn get(&self, id: TableId) -> Option<&TypeTable> {
        self.tables.get(&id)
    }

    /// Find a table by name within a directory
    pub fn find(&self, directory: DirectoryId, name: &str) -> Option<TableId> {
        self.by_directory.get(&directory)?.iter().copied().find(|id| {
            self.tables
                .get(id)
                .is_some_and(|t| t.name() == name)
        })
    }

    /// Ordered table ids of a directory
    pub fn tables_in(&self, directory: DirectoryId) -> &[TableId] {
        self.by_directory
            .get(&directory)
            .map_or(&[], Vec::as_slice)
    }

    /// Number of tables in a directory
    pub fn count_in(&self, directory: DirectoryId) -> usize {
        self.tables_in(directory).len()
    }

    /// Update name, owning directory and comment
    ///
    /// Row and column layout is immutable; there is deliberately no way to
    /// change it here. `None` fields are left untouched.
    pub fn update(
        &mut self,
        id: TableId,
        name: Option<&str>,
        directory: Option<DirectoryId>,
        comment: Option<&str>,
    ) -> Result<()> {
        let current = self.tables.get(&id).ok_or_else(|| Error::TableNotFound {
            path: format!("<{id}>"),
        })?;
        let old_dir = current.directory();
        let target_dir = directory.unwrap_or(old_dir);
        let target_name = name.unwrap_or_else(|| current.name()).to_string();

        validate_name(&target_name).map_err(|source| Error::InvalidName {
            name: target_name.clone(),
            source,
        })?;
        if let Some(existing) = self.find(target_dir, &target_name) {
            if existing != id {
                return Err(Error::DuplicateName { name: target_name });
            }
        }

        let table = self.tables.get_mut(&id).expect("presence checked above");
        table.set_name(target_name);
        table.set_directory(target_dir);
        if let Some(comment) = comment {
            table.set_comment(comment.to_string());
        }
        if target_dir != old_dir {
            if let Some(list) = self.by_directory.get_mut(&old_dir) {
                list.retain(|&t| t != id);
            }
            self.by_directory.entry(target_dir).or_default().push(id);
        }
        Ok(())
    }

    /// Remove a table definition
    ///
    /// The engine guards this with the assignment-dependents check before
    /// calling.
    pub fn delete(&mut self, id: TableId) -> Result<TypeTable> {
        let table = self.tables.remove(&id).ok_or_else(|| Error::TableNotFound {
            path: format!("<{id}>"),
        })?;
        if let Some(list) = self.by_directory.get_mut(&table.directory()) {
            list.retain(|&t| t != id);
        }
        debug!(table = table.name(), "type table deleted");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, t)| (n.to_string(), t.to_string()))
            .collect()
    }

    fn store_with_table() -> (TableStore, TableId) {
        let mut store = TableStore::new();
        let id = store
            .create(
                "gains",
                DirectoryId::ROOT,
                2,
                &columns(&[("channel", "int"), ("gain", "double")]),
                "per-channel gains",
            )
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_create_assigns_layout() {
        let (store, id) = store_with_table();
        let table = store.get(id).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_columns(), 2);
        assert_eq!(table.columns()[0].name, "channel");
        assert_eq!(table.columns()[1].position, 1);
    }

    #[test]
    fn test_unknown_type_becomes_double() {
        let mut store = TableStore::new();
        let id = store
            .create(
                "t",
                DirectoryId::ROOT,
                1,
                &columns(&[("px", ""), ("py", "vector3")]),
                "",
            )
            .unwrap();
        let table = store.get(id).unwrap();
        assert_eq!(table.columns()[0].column_type, ColumnType::Double);
        assert_eq!(table.columns()[1].column_type, ColumnType::Double);
    }

    #[test]
    fn test_create_rejects_bad_names() {
        let mut store = TableStore::new();
        assert!(matches!(
            store.create("bad name", DirectoryId::ROOT, 1, &[], ""),
            Err(Error::InvalidName { .. })
        ));
        assert!(matches!(
            store.create(
                "t",
                DirectoryId::ROOT,
                1,
                &columns(&[("bad col", "int")]),
                ""
            ),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_in_directory() {
        let (mut store, _) = store_with_table();
        assert!(matches!(
            store.create("gains", DirectoryId::ROOT, 1, &[], ""),
            Err(Error::DuplicateName { .. })
        ));
        // same name in another directory is fine
        assert!(store
            .create("gains", DirectoryId::from_raw(5), 1, &[], "")
            .is_ok());
    }

    #[test]
    fn test_find_and_listing() {
        let (store, id) = store_with_table();
        assert_eq!(store.find(DirectoryId::ROOT, "gains"), Some(id));
        assert_eq!(store.find(DirectoryId::ROOT, "missing"), None);
        assert_eq!(store.tables_in(DirectoryId::ROOT), &[id]);
        assert_eq!(store.count_in(DirectoryId::ROOT), 1);
    }

    #[test]
    fn test_update_moves_between_directories() {
        let (mut store, id) = store_with_table();
        let target = DirectoryId::from_raw(3);
        store.update(id, None, Some(target), Some("moved")).unwrap();

        let table = store.get(id).unwrap();
        assert_eq!(table.directory(), target);
        assert_eq!(table.comment(), "moved");
        assert_eq!(store.count_in(DirectoryId::ROOT), 0);
        assert_eq!(store.tables_in(target), &[id]);
        // layout untouched
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_update_rejects_name_collision() {
        let (mut store, _) = store_with_table();
        let other = store.create("offsets", DirectoryId::ROOT, 1, &[], "").unwrap();
        assert!(matches!(
            store.update(other, Some("gains"), None, None),
            Err(Error::DuplicateName { .. })
        ));
        // renaming to the current name is a no-op, not a collision
        assert!(store.update(other, Some("offsets"), None, None).is_ok());
    }

    #[test]
    fn test_delete_removes_listing() {
        let (mut store, id) = store_with_table();
        store.delete(id).unwrap();
        assert!(store.get(id).is_none());
        assert_eq!(store.count_in(DirectoryId::ROOT), 0);
        assert!(matches!(
            store.delete(id),
            Err(Error::TableNotFound { .. })
        ));
    }
}
