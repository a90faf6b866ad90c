//! The in-process constants database
//!
//! `Database` owns the namespace tree, the table store and the versioning
//! index, and enforces every cross-store rule: name clashes between
//! tables and subdirectories, deletion guards while dependents exist, and
//! the all-or-nothing assignment creation path.
//!
//! All calls are synchronous and blocking; the engine spawns no background
//! work and takes no internal locks. Callers that need serialization pass
//! an explicit [`AdvisoryLocks`](crate::locks::AdvisoryLocks) value around
//! instead of relying on a process-wide singleton.
//!
//! ## Ownership model
//!
//! Lookups return owned clones or stable ids, never references tied to
//! provider internals. Ids stay valid across structural mutations; a
//! deleted entity's id reports "not found" instead of dangling.

use crate::resolver::{self, QueryMode};
use condb_catalog::{Directory, NamespaceTree, TableStore, TypeTable};
use condb_core::path::{self, validate_name};
use condb_core::{
    wildcard_match, AssignmentId, Column, DataTable, DirectoryId, Error, Page, Result, RunNumber,
    TableId, Timestamp, DEFAULT_VARIATION,
};
use condb_format::tokenize_text;
use condb_index::{Assignment, RunRange, SortOrder, Variation, VersioningIndex};
use tracing::info;

/// Hot-path resolution result: the data matrix with version information
///
/// Column metadata is attached only when the query asked for it; the
/// matrix shape is always known from the data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantsData {
    /// Id of the selected assignment
    pub assignment: AssignmentId,
    /// Version of the selected assignment within its scope
    pub version: u32,
    /// Creation time of the selected assignment
    pub created: Timestamp,
    /// The delivered rows × columns matrix
    pub data: DataTable,
    /// Column metadata, present when requested
    pub columns: Option<Vec<Column>>,
}

/// Full resolution result: short-form data plus hydrated related objects
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantsRecord {
    /// The short-form payload (column metadata always attached)
    pub constants: ConstantsData,
    /// The resolved type table
    pub table: TypeTable,
    /// The run range the assignment covers
    pub run_range: RunRange,
    /// The variation the assignment belongs to
    pub variation: Variation,
    /// Assignment comment
    pub comment: String,
}

/// Request payload for assignment creation
///
/// Build with [`NewAssignment::new`] and chain the optional pieces:
///
/// ```
/// use condb_engine::NewAssignment;
///
/// let request = NewAssignment::new("/calo/gains", vec![vec!["1.0".into()]], 0, 999)
///     .variation("mc")
///     .comment("initial mc gains");
/// # let _ = request;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    /// Absolute path of the target table
    pub path: String,
    /// Data rows; each row is one vector of cell strings
    pub rows: Vec<Vec<String>>,
    /// Run range lower bound (ignored when `run_range_name` is set)
    pub run_min: RunNumber,
    /// Run range upper bound (ignored when `run_range_name` is set)
    pub run_max: RunNumber,
    /// Address an existing named run range instead of bounds
    pub run_range_name: Option<String>,
    /// Variation name; defaults to `default`
    pub variation: String,
    /// Free-form comment
    pub comment: String,
    /// Explicit creation time for import/backfill tooling
    pub created: Option<Timestamp>,
}

impl NewAssignment {
    /// Create a request targeting a run-number interval
    pub fn new(
        path: impl Into<String>,
        rows: Vec<Vec<String>>,
        run_min: RunNumber,
        run_max: RunNumber,
    ) -> Self {
        NewAssignment {
            path: path.into(),
            rows,
            run_min,
            run_max,
            run_range_name: None,
            variation: DEFAULT_VARIATION.to_string(),
            comment: String::new(),
            created: None,
        }
    }

    /// Target an existing named run range instead of bounds
    pub fn named_range(mut self, name: impl Into<String>) -> Self {
        self.run_range_name = Some(name.into());
        self
    }

    /// Set the variation name
    pub fn variation(mut self, variation: impl Into<String>) -> Self {
        self.variation = variation.into();
        self
    }

    /// Set the comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Pin the creation time (import/backfill)
    pub fn created_at(mut self, created: Timestamp) -> Self {
        self.created = Some(created);
        self
    }
}

/// The in-process constants database
#[derive(Debug, Clone)]
pub struct Database {
    tree: NamespaceTree,
    tables: TableStore,
    index: VersioningIndex,
    user_name: String,
}

impl Database {
    /// Create an empty database: a namespace root and the default
    /// variation
    pub fn new() -> Self {
        Database {
            tree: NamespaceTree::new(),
            tables: TableStore::new(),
            index: VersioningIndex::new(),
            user_name: String::new(),
        }
    }

    /// Create an empty database, attaching a user name to mutation logs
    pub fn with_user(user_name: impl Into<String>) -> Self {
        Database {
            user_name: user_name.into(),
            ..Self::new()
        }
    }

    // =========================================================================
    // Directories
    // =========================================================================

    /// Structural revision of the namespace
    ///
    /// Bumps on every successful create/delete; cached directory listings
    /// taken at an older revision must be re-read.
    pub fn revision(&self) -> u64 {
        self.tree.revision()
    }

    /// The root directory
    pub fn root_directory(&self) -> Directory {
        self.tree.root().clone()
    }

    /// Get a directory by absolute path
    pub fn directory(&self, dir_path: &str) -> Result<Directory> {
        let id = self.tree.resolve(dir_path)?;
        Ok(self
            .tree
            .directory(id)
            .expect("resolved id is present")
            .clone())
    }

    /// Absolute path of a directory id, if it still resolves
    pub fn directory_path(&self, id: DirectoryId) -> Option<String> {
        self.tree.path_of(id)
    }

    /// Create a directory under a parent path
    ///
    /// The name must not collide with a sibling directory or table.
    pub fn make_directory(
        &mut self,
        name: &str,
        parent_path: &str,
        comment: &str,
    ) -> Result<DirectoryId> {
        let parent = self.tree.resolve(parent_path)?;
        if self.tables.find(parent, name).is_some() {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = self.tree.create(parent, name, comment)?;
        info!(user = %self.user_name, directory = %path::combine(parent_path, name), "directory created");
        Ok(id)
    }

    /// Update a directory's comment
    pub fn update_directory(&mut self, dir_path: &str, comment: &str) -> Result<()> {
        let id = self.tree.resolve(dir_path)?;
        self.tree.set_comment(id, comment)
    }

    /// Delete an empty directory
    ///
    /// Fails while child directories or tables exist; the root cannot be
    /// deleted.
    pub fn delete_directory(&mut self, dir_path: &str) -> Result<()> {
        let id = self.tree.resolve(dir_path)?;
        if self.tables.count_in(id) > 0 {
            return Err(Error::DirectoryNotEmpty {
                path: path::normalize(dir_path),
            });
        }
        self.tree.delete(id)
    }

    /// Delete a directory and everything beneath it
    ///
    /// Destructive administrative operation: cascades to all tables and
    /// their assignments in the subtree. Not part of normal operation,
    /// since the data model is append-only.
    pub fn delete_directory_recursive(&mut self, dir_path: &str) -> Result<()> {
        let id = self.tree.resolve(dir_path)?;
        let removed_dirs = self.tree.delete_subtree(id)?;

        let mut removed_tables = 0usize;
        let mut removed_assignments = 0usize;
        for dir in removed_dirs {
            for table in self.tables.tables_in(dir).to_vec() {
                removed_assignments += self.index.delete_assignments_of_table(table);
                self.tables.delete(table)?;
                removed_tables += 1;
            }
        }
        info!(
            user = %self.user_name,
            directory = %path::normalize(dir_path),
            removed_tables,
            removed_assignments,
            "directory deleted recursively"
        );
        Ok(())
    }

    /// Wildcard search for directories
    ///
    /// With no parent path the whole tree is searched. A pattern
    /// containing `/` matches the path relative to the search scope,
    /// otherwise the final segment.
    pub fn search_directories(
        &self,
        pattern: &str,
        parent_path: Option<&str>,
        page: Page,
    ) -> Result<Vec<Directory>> {
        let scope = match parent_path {
            Some(p) => Some(self.tree.resolve(p)?),
            None => None,
        };
        let hits = self.tree.search(pattern, scope, page)?;
        Ok(hits
            .into_iter()
            .filter_map(|id| self.tree.directory(id).cloned())
            .collect())
    }

    // =========================================================================
    // Type tables
    // =========================================================================

    /// Resolve a table path to its id
    pub fn table_id(&self, table_path: &str) -> Result<TableId> {
        let parent = self.tree.resolve(path::parent_of(table_path))?;
        let name = path::name_of(table_path);
        self.tables
            .find(parent, name)
            .ok_or_else(|| Error::TableNotFound {
                path: path::normalize(table_path),
            })
    }

    /// Get a type table by absolute path
    ///
    /// Column metadata is attached only when `load_columns` is set; the
    /// row/column counts are always present.
    pub fn table(&self, table_path: &str, load_columns: bool) -> Result<TypeTable> {
        let id = self.table_id(table_path)?;
        let table = self.tables.get(id).expect("resolved id is present");
        Ok(if load_columns {
            table.clone()
        } else {
            table.without_columns()
        })
    }

    /// Absolute path of a table
    pub fn table_path(&self, table: &TypeTable) -> String {
        let dir = self
            .tree
            .path_of(table.directory())
            .unwrap_or_else(|| path::ROOT_PATH.to_string());
        path::combine(&dir, table.name())
    }

    /// Ordered tables of one directory
    pub fn tables_in(&self, dir_path: &str, load_columns: bool) -> Result<Vec<TypeTable>> {
        let dir = self.tree.resolve(dir_path)?;
        Ok(self
            .tables
            .tables_in(dir)
            .iter()
            .filter_map(|&id| self.tables.get(id))
            .map(|t| {
                if load_columns {
                    t.clone()
                } else {
                    t.without_columns()
                }
            })
            .collect())
    }

    /// Number of tables directly in one directory
    pub fn count_tables(&self, dir_path: &str) -> Result<usize> {
        let dir = self.tree.resolve(dir_path)?;
        Ok(self.tables.count_in(dir))
    }

    /// Wildcard search for tables
    ///
    /// Scope and pattern semantics match
    /// [`search_directories`](Self::search_directories); the subtree of
    /// the parent path (or the whole tree) is searched.
    pub fn search_tables(
        &self,
        pattern: &str,
        parent_path: Option<&str>,
        load_columns: bool,
        page: Page,
    ) -> Result<Vec<TypeTable>> {
        let scope = match parent_path {
            Some(p) => self.tree.resolve(p)?,
            None => DirectoryId::ROOT,
        };
        let match_full_path = pattern.contains(path::PATH_SEPARATOR);

        let mut scopes: Vec<(DirectoryId, String)> = vec![(scope, String::new())];
        scopes.extend(self.tree.descendants(scope));

        let mut hits = Vec::new();
        for (dir, prefix) in scopes {
            for &id in self.tables.tables_in(dir) {
                let Some(table) = self.tables.get(id) else {
                    continue;
                };
                let target = if match_full_path {
                    if prefix.is_empty() {
                        table.name().to_string()
                    } else {
                        format!("{prefix}/{}", table.name())
                    }
                } else {
                    table.name().to_string()
                };
                if wildcard_match(pattern, &target) {
                    hits.push(if load_columns {
                        table.clone()
                    } else {
                        table.without_columns()
                    });
                }
            }
        }
        Ok(page.apply(hits))
    }

    /// Create a type table
    ///
    /// `columns` is the ordered (name, type-name) list; unrecognized type
    /// names become `double`. The layout (row count, columns) is immutable
    /// after creation.
    pub fn create_table(
        &mut self,
        name: &str,
        parent_path: &str,
        n_rows: usize,
        columns: &[(String, String)],
        comment: &str,
    ) -> Result<TableId> {
        let parent = self.tree.resolve(parent_path)?;
        if n_rows == 0 || columns.is_empty() {
            return Err(Error::EmptyLayout);
        }
        if self.tree.child_by_name(parent, name).is_some() {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = self.tables.create(name, parent, n_rows, columns, comment)?;
        info!(user = %self.user_name, table = %path::combine(parent_path, name), "type table created");
        Ok(id)
    }

    /// Update a table's name, parent directory and comment
    ///
    /// Layout changes are unsupported: delete and recreate instead, which
    /// is blocked while assignments exist.
    pub fn update_table(
        &mut self,
        table_path: &str,
        new_name: Option<&str>,
        new_parent_path: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        let id = self.table_id(table_path)?;
        let current = self.tables.get(id).expect("resolved id is present");

        let target_dir = match new_parent_path {
            Some(p) => Some(self.tree.resolve(p)?),
            None => None,
        };
        let final_dir = target_dir.unwrap_or_else(|| current.directory());
        let final_name = new_name.unwrap_or_else(|| current.name());
        if self.tree.child_by_name(final_dir, final_name).is_some() {
            return Err(Error::DuplicateName {
                name: final_name.to_string(),
            });
        }
        self.tables.update(id, new_name, target_dir, comment)
    }

    /// Delete a table with no assignments
    ///
    /// Blocked with a conflict while any assignment exists.
    pub fn delete_table(&mut self, table_path: &str) -> Result<()> {
        let id = self.table_id(table_path)?;
        let dependents = self.index.count_for_table(id);
        if dependents > 0 {
            return Err(Error::TableInUse {
                path: path::normalize(table_path),
                assignments: dependents,
            });
        }
        self.tables.delete(id)?;
        info!(user = %self.user_name, table = %path::normalize(table_path), "type table deleted");
        Ok(())
    }

    /// Delete a table and all its assignments
    ///
    /// Destructive administrative operation.
    pub fn delete_table_recursive(&mut self, table_path: &str) -> Result<()> {
        let id = self.table_id(table_path)?;
        let removed = self.index.delete_assignments_of_table(id);
        self.tables.delete(id)?;
        info!(
            user = %self.user_name,
            table = %path::normalize(table_path),
            removed_assignments = removed,
            "type table deleted recursively"
        );
        Ok(())
    }

    /// Column metadata of a table
    ///
    /// The separate fetch lets search/list operations skip column loading;
    /// call this when a columns-stripped view needs hydrating.
    pub fn columns_of(&self, table_path: &str) -> Result<Vec<Column>> {
        let id = self.table_id(table_path)?;
        Ok(self
            .tables
            .get(id)
            .expect("resolved id is present")
            .columns()
            .to_vec())
    }

    // =========================================================================
    // Run ranges
    // =========================================================================

    /// Get the run range with the given bounds, creating it when absent
    pub fn get_or_create_run_range(
        &mut self,
        min: RunNumber,
        max: RunNumber,
        name: Option<&str>,
        comment: &str,
    ) -> Result<RunRange> {
        let id = self.index.get_or_create_run_range(min, max, name, comment)?;
        Ok(self.index.run_range(id).expect("created above").clone())
    }

    /// Get a run range by symbolic name
    pub fn run_range_by_name(&self, name: &str) -> Result<RunRange> {
        self.index
            .run_range_by_name(name)
            .and_then(|id| self.index.run_range(id))
            .cloned()
            .ok_or_else(|| Error::RunRangeNotFound {
                request: name.to_string(),
            })
    }

    /// Distinct run ranges referenced by a table's assignments
    ///
    /// Optionally filtered to one variation name; unknown names yield an
    /// empty list.
    pub fn run_ranges_of_table(
        &self,
        table_path: &str,
        variation: Option<&str>,
        page: Page,
    ) -> Result<Vec<RunRange>> {
        let table = self.table_id(table_path)?;
        let variation_id = match variation {
            Some(name) => match self.index.variation_by_name(name) {
                Some(id) => Some(id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        Ok(self
            .index
            .run_ranges_of_table(table, variation_id, page)
            .into_iter()
            .filter_map(|id| self.index.run_range(id))
            .cloned()
            .collect())
    }

    /// Update a run range's bounds and comment (never its name or id)
    pub fn update_run_range(
        &mut self,
        range: &RunRange,
        min: Option<RunNumber>,
        max: Option<RunNumber>,
        comment: Option<&str>,
    ) -> Result<()> {
        self.index.update_run_range(range.id(), min, max, comment)
    }

    /// Delete a run range with no dependent assignments
    pub fn delete_run_range(&mut self, range: &RunRange) -> Result<()> {
        self.index.delete_run_range(range.id())
    }

    /// Delete a run range and every assignment referencing it
    pub fn delete_run_range_recursive(&mut self, range: &RunRange) -> Result<usize> {
        let removed = self.index.delete_run_range_recursive(range.id())?;
        info!(user = %self.user_name, min = range.min(), max = range.max(), removed = removed.len(), "run range deleted recursively");
        Ok(removed.len())
    }

    // =========================================================================
    // Variations
    // =========================================================================

    /// Get a variation by name
    pub fn variation(&self, name: &str) -> Result<Variation> {
        self.index
            .variation_by_name(name)
            .and_then(|id| self.index.variation(id))
            .cloned()
            .ok_or_else(|| Error::VariationNotFound {
                name: name.to_string(),
            })
    }

    /// Create a variation with an optional parent name
    ///
    /// With no parent the new variation chains to `default`.
    pub fn create_variation(
        &mut self,
        name: &str,
        parent: Option<&str>,
        comment: &str,
    ) -> Result<Variation> {
        let parent_id = match parent {
            Some(parent_name) => Some(
                self.index
                    .variation_by_name(parent_name)
                    .ok_or_else(|| Error::VariationNotFound {
                        name: parent_name.to_string(),
                    })?,
            ),
            None => Some(self.index.default_variation()),
        };
        let id = self.index.create_variation(name, parent_id, comment)?;
        info!(user = %self.user_name, variation = name, "variation created");
        Ok(self.index.variation(id).expect("created above").clone())
    }

    /// Distinct variations referenced by a table's assignments
    ///
    /// Optionally filtered to assignments covering one run.
    pub fn variations_of_table(
        &self,
        table_path: &str,
        run: Option<RunNumber>,
        page: Page,
    ) -> Result<Vec<Variation>> {
        let table = self.table_id(table_path)?;
        Ok(self
            .index
            .variations_of_table(table, run, page)
            .into_iter()
            .filter_map(|id| self.index.variation(id))
            .cloned()
            .collect())
    }

    /// Update a variation's comment
    pub fn update_variation(&mut self, name: &str, comment: &str) -> Result<()> {
        let id = self
            .index
            .variation_by_name(name)
            .ok_or_else(|| Error::VariationNotFound {
                name: name.to_string(),
            })?;
        self.index.update_variation_comment(id, comment)
    }

    /// Delete a variation with no dependents
    pub fn delete_variation(&mut self, name: &str) -> Result<()> {
        let id = self
            .index
            .variation_by_name(name)
            .ok_or_else(|| Error::VariationNotFound {
                name: name.to_string(),
            })?;
        self.index.delete_variation(id)
    }

    /// Delete a variation and every assignment referencing it
    pub fn delete_variation_recursive(&mut self, name: &str) -> Result<usize> {
        let id = self
            .index
            .variation_by_name(name)
            .ok_or_else(|| Error::VariationNotFound {
                name: name.to_string(),
            })?;
        let removed = self.index.delete_variation_recursive(id)?;
        info!(user = %self.user_name, variation = name, removed = removed.len(), "variation deleted recursively");
        Ok(removed.len())
    }

    // =========================================================================
    // Assignments: creation
    // =========================================================================

    /// Create an assignment, the only way new constants enter the store
    ///
    /// Validates the data shape against the table, resolves or creates the
    /// run range and variation, allocates the next version in scope and
    /// stamps the creation time. Any validation failure aborts before
    /// anything is written.
    pub fn create_assignment(&mut self, request: NewAssignment) -> Result<AssignmentId> {
        let table_id = self.table_id(&request.path)?;
        let table = self.tables.get(table_id).expect("resolved id is present");

        let data = DataTable::from_rows(request.rows)?;
        Self::check_shape(table, &data)?;

        // validate everything fallible before the get-or-creates so a
        // failure cannot leave a half-written scope behind
        if self.index.variation_by_name(&request.variation).is_none() {
            validate_name(&request.variation).map_err(|source| Error::InvalidName {
                name: request.variation.clone(),
                source,
            })?;
        }
        let range_id = match &request.run_range_name {
            Some(name) => self
                .index
                .run_range_by_name(name)
                .ok_or_else(|| Error::RunRangeNotFound {
                    request: name.clone(),
                })?,
            None => {
                if request.run_min > request.run_max {
                    return Err(Error::InvalidRunRange {
                        min: request.run_min,
                        max: request.run_max,
                    });
                }
                self.index
                    .get_or_create_run_range(request.run_min, request.run_max, None, "")?
            }
        };
        let variation_id = self.index.get_or_create_variation(&request.variation)?;

        let created = request.created.unwrap_or_else(Timestamp::now);
        let id = self.index.create_assignment_at(
            table_id,
            range_id,
            variation_id,
            data,
            &request.comment,
            created,
        )?;
        info!(
            user = %self.user_name,
            table = %path::normalize(&request.path),
            variation = %request.variation,
            version = self.index.assignment(id).expect("created above").version(),
            "assignment created"
        );
        Ok(id)
    }

    /// Create an assignment from text records
    ///
    /// The text is tokenized line by line (quoting and comments apply) and
    /// the flat token sequence is grouped into rows using the table's
    /// column count.
    pub fn create_assignment_from_text(
        &mut self,
        table_path: &str,
        text: &str,
        run_min: RunNumber,
        run_max: RunNumber,
        variation: &str,
        comment: &str,
    ) -> Result<AssignmentId> {
        let table = self.table(table_path, false)?;
        let data = DataTable::from_tokens(tokenize_text(text), table.n_columns())?;
        self.create_assignment(
            NewAssignment::new(table_path, data.into_rows(), run_min, run_max)
                .variation(variation)
                .comment(comment),
        )
    }

    fn check_shape(table: &TypeTable, data: &DataTable) -> Result<()> {
        if data.n_rows() != table.n_rows() {
            return Err(Error::RowCountMismatch {
                expected: table.n_rows(),
                actual: data.n_rows(),
            });
        }
        if data.n_columns() != table.n_columns() {
            return Err(Error::ColumnCountMismatch {
                row: 0,
                expected: table.n_columns(),
                actual: data.n_columns(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Assignments: resolution
    // =========================================================================

    /// Resolve the constants for (table, run, variation): the hot path
    ///
    /// Returns only the data matrix and version information; column
    /// metadata is attached when `load_columns` is set. Use
    /// [`get_assignment`](Self::get_assignment) for the hydrated form.
    pub fn get_constants(
        &self,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
        load_columns: bool,
    ) -> Result<ConstantsData> {
        let table_id = self.table_id(table_path)?;
        let selected = self.select_assignment(table_id, table_path, run, variation, mode)?;
        let columns = load_columns.then(|| {
            self.tables
                .get(table_id)
                .expect("resolved id is present")
                .columns()
                .to_vec()
        });
        Ok(ConstantsData {
            assignment: selected.id(),
            version: selected.version(),
            created: selected.created(),
            data: selected.data().clone(),
            columns,
        })
    }

    /// Resolve an assignment with all related objects hydrated
    pub fn get_assignment(
        &self,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
    ) -> Result<ConstantsRecord> {
        let table_id = self.table_id(table_path)?;
        let selected = self.select_assignment(table_id, table_path, run, variation, mode)?;

        let table = self.tables.get(table_id).expect("resolved id is present");
        let run_range = self
            .index
            .run_range(selected.run_range())
            .ok_or_else(|| Error::Internal {
                message: format!("assignment {} references a missing run range", selected.id()),
            })?;
        let variation_obj = self
            .index
            .variation(selected.variation())
            .ok_or_else(|| Error::Internal {
                message: format!("assignment {} references a missing variation", selected.id()),
            })?;

        Ok(ConstantsRecord {
            constants: ConstantsData {
                assignment: selected.id(),
                version: selected.version(),
                created: selected.created(),
                data: selected.data().clone(),
                columns: Some(table.columns().to_vec()),
            },
            table: table.clone(),
            run_range: run_range.clone(),
            variation: variation_obj.clone(),
            comment: selected.comment().to_string(),
        })
    }

    fn select_assignment(
        &self,
        table_id: TableId,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
    ) -> Result<&Assignment> {
        let not_found = || Error::AssignmentNotFound {
            path: path::normalize(table_path),
            run,
            variation: variation.to_string(),
        };

        let variation_id = self
            .index
            .variation_by_name(variation)
            .ok_or_else(|| not_found())?;
        let candidates: Vec<&Assignment> = self
            .index
            .candidates(table_id, run)
            .into_iter()
            .filter(|a| a.variation() == variation_id)
            .collect();
        resolver::select(&candidates, mode).ok_or_else(|| not_found())
    }

    /// List assignments of a table with optional filters and paging
    ///
    /// `variation` filters by exact name (unknown names yield an empty
    /// list), `until` keeps assignments created at or before the cutoff.
    pub fn get_assignments(
        &self,
        table_path: &str,
        run: Option<RunNumber>,
        variation: Option<&str>,
        until: Option<Timestamp>,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Assignment>> {
        let table = self.table_id(table_path)?;
        let variation_id = match variation {
            Some(name) => match self.index.variation_by_name(name) {
                Some(id) => Some(id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };
        Ok(self
            .index
            .list_assignments(table, run, variation_id, until, order, page)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Update an assignment's comment, the only mutable field
    pub fn update_assignment_comment(&mut self, id: AssignmentId, comment: &str) -> Result<()> {
        self.index.update_assignment_comment(id, comment)
    }

    /// Delete one assignment (administrative)
    pub fn delete_assignment(&mut self, id: AssignmentId) -> Result<()> {
        self.index.delete_assignment(id)?;
        info!(user = %self.user_name, %id, "assignment deleted");
        Ok(())
    }

    /// Look up one assignment by id
    pub fn assignment(&self, id: AssignmentId) -> Result<Assignment> {
        self.index
            .assignment(id)
            .cloned()
            .ok_or(Error::AssignmentMissing { id })
    }

    // =========================================================================
    // Helpers for the variation chain
    // =========================================================================

    /// Walk the variation inheritance chain, starting at `name`
    ///
    /// Yields the variation itself followed by its ancestors up to (and
    /// including) `default`. The resolver never does this implicitly;
    /// fallback across the chain is a calling-layer policy.
    pub fn variation_chain(&self, name: &str) -> Result<Vec<Variation>> {
        let mut current = self.variation(name)?;
        let mut chain = vec![current.clone()];
        while let Some(parent_id) = current.parent() {
            let Some(parent) = self.index.variation(parent_id) else {
                break;
            };
            current = parent.clone();
            chain.push(current.clone());
        }
        Ok(chain)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
