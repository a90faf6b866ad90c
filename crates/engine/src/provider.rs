//! Provider boundary
//!
//! [`Provider`] is the capability interface integration adapters consume:
//! connection lifecycle, the CRUD surface of the engine, and the bounded
//! error report. Backends implement the trait once and are composed in;
//! there is no inheritance hierarchy.
//!
//! Every operation that can fail clears the report at entry and appends
//! exactly one primary error record on failure, then propagates the error
//! value. Returned records are snapshots; copy them before the next
//! failing call if they must outlive it.

use crate::config::DatabaseConfig;
use crate::connection::ConnectionDescriptor;
use crate::database::{ConstantsData, ConstantsRecord, Database, NewAssignment};
use crate::resolver::QueryMode;
use condb_catalog::{Directory, TypeTable};
use condb_core::{
    AssignmentId, DirectoryId, Error, ErrorCode, ErrorRecord, ErrorReport, Page, Result, RunNumber,
    TableId, Timestamp,
};
use condb_index::{Assignment, RunRange, SortOrder, Variation};
use tracing::info;

/// Capability interface to a constants backend
pub trait Provider {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect using an opaque descriptor string
    fn connect(&mut self, descriptor: &str) -> Result<()>;

    /// Close the connection; further operations fail with `NotConnected`
    fn disconnect(&mut self);

    /// Whether the connection is open
    fn is_connected(&self) -> bool;

    /// Descriptor of the last successful connect, credentials elided
    fn connection_string(&self) -> Option<&str>;

    // =========================================================================
    // Error report
    // =========================================================================

    /// Category code of the most recent error
    fn last_error_code(&self) -> Option<ErrorCode>;

    /// Snapshot of the current error/warning records, oldest first
    fn errors(&self) -> Vec<ErrorRecord>;

    // =========================================================================
    // Directories
    // =========================================================================

    /// Get a directory by absolute path
    fn get_directory(&mut self, dir_path: &str) -> Result<Directory>;

    /// Create a directory under a parent path
    fn make_directory(&mut self, name: &str, parent_path: &str, comment: &str)
        -> Result<DirectoryId>;

    /// Update a directory's comment
    fn update_directory(&mut self, dir_path: &str, comment: &str) -> Result<()>;

    /// Delete an empty directory
    fn delete_directory(&mut self, dir_path: &str) -> Result<()>;

    /// Delete a directory and everything beneath it (administrative)
    fn delete_directory_recursive(&mut self, dir_path: &str) -> Result<()>;

    /// Wildcard search for directories
    fn search_directories(
        &mut self,
        pattern: &str,
        parent_path: Option<&str>,
        page: Page,
    ) -> Result<Vec<Directory>>;

    // =========================================================================
    // Type tables
    // =========================================================================

    /// Get a type table by absolute path
    fn get_type_table(&mut self, table_path: &str, load_columns: bool) -> Result<TypeTable>;

    /// Ordered tables of one directory
    fn get_type_tables(&mut self, parent_path: &str, load_columns: bool)
        -> Result<Vec<TypeTable>>;

    /// Wildcard search for tables
    fn search_type_tables(
        &mut self,
        pattern: &str,
        parent_path: Option<&str>,
        load_columns: bool,
        page: Page,
    ) -> Result<Vec<TypeTable>>;

    /// Number of tables directly in one directory
    fn count_type_tables(&mut self, parent_path: &str) -> Result<usize>;

    /// Create a type table
    fn create_type_table(
        &mut self,
        name: &str,
        parent_path: &str,
        n_rows: usize,
        columns: &[(String, String)],
        comment: &str,
    ) -> Result<TableId>;

    /// Update a table's name, parent and comment (layout is immutable)
    fn update_type_table(
        &mut self,
        table_path: &str,
        new_name: Option<&str>,
        new_parent_path: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()>;

    /// Delete a table with no assignments
    fn delete_type_table(&mut self, table_path: &str) -> Result<()>;

    /// Delete a table and all its assignments (administrative)
    fn delete_type_table_recursive(&mut self, table_path: &str) -> Result<()>;

    // =========================================================================
    // Run ranges
    // =========================================================================

    /// Get the run range with the given bounds, creating it when absent
    fn get_or_create_run_range(
        &mut self,
        min: RunNumber,
        max: RunNumber,
        name: Option<&str>,
        comment: &str,
    ) -> Result<RunRange>;

    /// Get a run range by symbolic name
    fn get_run_range(&mut self, name: &str) -> Result<RunRange>;

    /// Distinct run ranges referenced by a table's assignments
    fn get_run_ranges(
        &mut self,
        table_path: &str,
        variation: Option<&str>,
        page: Page,
    ) -> Result<Vec<RunRange>>;

    /// Update a run range's bounds and comment (never name or id)
    fn update_run_range(
        &mut self,
        range: &RunRange,
        min: Option<RunNumber>,
        max: Option<RunNumber>,
        comment: Option<&str>,
    ) -> Result<()>;

    /// Delete a run range with no dependent assignments
    fn delete_run_range(&mut self, range: &RunRange) -> Result<()>;

    /// Delete a run range and its assignments (administrative)
    fn delete_run_range_recursive(&mut self, range: &RunRange) -> Result<usize>;

    // =========================================================================
    // Variations
    // =========================================================================

    /// Get a variation by name
    fn get_variation(&mut self, name: &str) -> Result<Variation>;

    /// Distinct variations referenced by a table's assignments
    fn get_variations(
        &mut self,
        table_path: &str,
        run: Option<RunNumber>,
        page: Page,
    ) -> Result<Vec<Variation>>;

    /// Create a variation with an optional parent name
    fn create_variation(
        &mut self,
        name: &str,
        parent: Option<&str>,
        comment: &str,
    ) -> Result<Variation>;

    /// Update a variation's comment
    fn update_variation(&mut self, name: &str, comment: &str) -> Result<()>;

    /// Delete a variation with no dependents
    fn delete_variation(&mut self, name: &str) -> Result<()>;

    /// Delete a variation and its assignments (administrative)
    fn delete_variation_recursive(&mut self, name: &str) -> Result<usize>;

    // =========================================================================
    // Assignments
    // =========================================================================

    /// Resolve constants: the hot path (data matrix only)
    fn get_constants(
        &mut self,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
        load_columns: bool,
    ) -> Result<ConstantsData>;

    /// Resolve an assignment with related objects hydrated
    fn get_assignment(
        &mut self,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
    ) -> Result<ConstantsRecord>;

    /// List assignments of a table with optional filters and paging
    fn get_assignments(
        &mut self,
        table_path: &str,
        run: Option<RunNumber>,
        variation: Option<&str>,
        until: Option<Timestamp>,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Assignment>>;

    /// Create an assignment
    fn create_assignment(&mut self, request: NewAssignment) -> Result<AssignmentId>;

    /// Update an assignment's comment
    fn update_assignment_comment(&mut self, id: AssignmentId, comment: &str) -> Result<()>;

    /// Delete one assignment (administrative)
    fn delete_assignment(&mut self, id: AssignmentId) -> Result<()>;
}

/// In-memory provider backed by the in-process [`Database`]
///
/// Answers to `mem://` descriptors. Data lives for the lifetime of the
/// provider value and survives disconnect/reconnect cycles.
#[derive(Debug)]
pub struct MemoryProvider {
    db: Database,
    report: ErrorReport,
    connected: bool,
    descriptor: Option<String>,
}

impl MemoryProvider {
    /// Scheme this provider answers to
    pub const SCHEME: &'static str = "mem";

    /// Create a disconnected provider with default configuration
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    /// Create a disconnected provider with explicit configuration
    pub fn with_config(config: DatabaseConfig) -> Self {
        MemoryProvider {
            db: Database::with_user(config.user_name.clone()),
            report: ErrorReport::with_capacity(config.max_held_errors),
            connected: false,
            descriptor: None,
        }
    }

    /// Direct read access to the underlying database
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The full error report (records plus last error code)
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    fn run<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut Database) -> Result<T>,
    ) -> Result<T> {
        self.report.clear();
        if !self.connected {
            let err = Error::NotConnected;
            self.report.error(operation, &err);
            return Err(err);
        }
        match f(&mut self.db) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.report.error(operation, &err);
                Err(err)
            }
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for MemoryProvider {
    fn connect(&mut self, descriptor: &str) -> Result<()> {
        self.report.clear();
        let parsed = match ConnectionDescriptor::parse(descriptor) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.report.error("connect", &err);
                return Err(err);
            }
        };
        if parsed.scheme != Self::SCHEME {
            let err = Error::ConnectFailed {
                descriptor: parsed.redacted(),
                reason: format!("unsupported scheme {:?}", parsed.scheme),
            };
            self.report.error("connect", &err);
            return Err(err);
        }
        self.connected = true;
        self.descriptor = Some(parsed.redacted());
        info!(descriptor = %parsed, "connected");
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.connected {
            info!("disconnected");
        }
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connection_string(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    fn last_error_code(&self) -> Option<ErrorCode> {
        self.report.last_error_code()
    }

    fn errors(&self) -> Vec<ErrorRecord> {
        self.report.records()
    }

    fn get_directory(&mut self, dir_path: &str) -> Result<Directory> {
        self.run("get_directory", |db| db.directory(dir_path))
    }

    fn make_directory(
        &mut self,
        name: &str,
        parent_path: &str,
        comment: &str,
    ) -> Result<DirectoryId> {
        self.run("make_directory", |db| {
            db.make_directory(name, parent_path, comment)
        })
    }

    fn update_directory(&mut self, dir_path: &str, comment: &str) -> Result<()> {
        self.run("update_directory", |db| {
            db.update_directory(dir_path, comment)
        })
    }

    fn delete_directory(&mut self, dir_path: &str) -> Result<()> {
        self.run("delete_directory", |db| db.delete_directory(dir_path))
    }

    fn delete_directory_recursive(&mut self, dir_path: &str) -> Result<()> {
        self.run("delete_directory_recursive", |db| {
            db.delete_directory_recursive(dir_path)
        })
    }

    fn search_directories(
        &mut self,
        pattern: &str,
        parent_path: Option<&str>,
        page: Page,
    ) -> Result<Vec<Directory>> {
        self.run("search_directories", |db| {
            db.search_directories(pattern, parent_path, page)
        })
    }

    fn get_type_table(&mut self, table_path: &str, load_columns: bool) -> Result<TypeTable> {
        self.run("get_type_table", |db| db.table(table_path, load_columns))
    }

    fn get_type_tables(
        &mut self,
        parent_path: &str,
        load_columns: bool,
    ) -> Result<Vec<TypeTable>> {
        self.run("get_type_tables", |db| {
            db.tables_in(parent_path, load_columns)
        })
    }

    fn search_type_tables(
        &mut self,
        pattern: &str,
        parent_path: Option<&str>,
        load_columns: bool,
        page: Page,
    ) -> Result<Vec<TypeTable>> {
        self.run("search_type_tables", |db| {
            db.search_tables(pattern, parent_path, load_columns, page)
        })
    }

    fn count_type_tables(&mut self, parent_path: &str) -> Result<usize> {
        self.run("count_type_tables", |db| db.count_tables(parent_path))
    }

    fn create_type_table(
        &mut self,
        name: &str,
        parent_path: &str,
        n_rows: usize,
        columns: &[(String, String)],
        comment: &str,
    ) -> Result<TableId> {
        self.run("create_type_table", |db| {
            db.create_table(name, parent_path, n_rows, columns, comment)
        })
    }

    fn update_type_table(
        &mut self,
        table_path: &str,
        new_name: Option<&str>,
        new_parent_path: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        self.run("update_type_table", |db| {
            db.update_table(table_path, new_name, new_parent_path, comment)
        })
    }

    fn delete_type_table(&mut self, table_path: &str) -> Result<()> {
        self.run("delete_type_table", |db| db.delete_table(table_path))
    }

    fn delete_type_table_recursive(&mut self, table_path: &str) -> Result<()> {
        self.run("delete_type_table_recursive", |db| {
            db.delete_table_recursive(table_path)
        })
    }

    fn get_or_create_run_range(
        &mut self,
        min: RunNumber,
        max: RunNumber,
        name: Option<&str>,
        comment: &str,
    ) -> Result<RunRange> {
        self.run("get_or_create_run_range", |db| {
            db.get_or_create_run_range(min, max, name, comment)
        })
    }

    fn get_run_range(&mut self, name: &str) -> Result<RunRange> {
        self.run("get_run_range", |db| db.run_range_by_name(name))
    }

    fn get_run_ranges(
        &mut self,
        table_path: &str,
        variation: Option<&str>,
        page: Page,
    ) -> Result<Vec<RunRange>> {
        self.run("get_run_ranges", |db| {
            db.run_ranges_of_table(table_path, variation, page)
        })
    }

    fn update_run_range(
        &mut self,
        range: &RunRange,
        min: Option<RunNumber>,
        max: Option<RunNumber>,
        comment: Option<&str>,
    ) -> Result<()> {
        self.run("update_run_range", |db| {
            db.update_run_range(range, min, max, comment)
        })
    }

    fn delete_run_range(&mut self, range: &RunRange) -> Result<()> {
        self.run("delete_run_range", |db| db.delete_run_range(range))
    }

    fn delete_run_range_recursive(&mut self, range: &RunRange) -> Result<usize> {
        self.run("delete_run_range_recursive", |db| {
            db.delete_run_range_recursive(range)
        })
    }

    fn get_variation(&mut self, name: &str) -> Result<Variation> {
        self.run("get_variation", |db| db.variation(name))
    }

    fn get_variations(
        &mut self,
        table_path: &str,
        run: Option<RunNumber>,
        page: Page,
    ) -> Result<Vec<Variation>> {
        self.run("get_variations", |db| {
            db.variations_of_table(table_path, run, page)
        })
    }

    fn create_variation(
        &mut self,
        name: &str,
        parent: Option<&str>,
        comment: &str,
    ) -> Result<Variation> {
        self.run("create_variation", |db| {
            db.create_variation(name, parent, comment)
        })
    }

    fn update_variation(&mut self, name: &str, comment: &str) -> Result<()> {
        self.run("update_variation", |db| db.update_variation(name, comment))
    }

    fn delete_variation(&mut self, name: &str) -> Result<()> {
        self.run("delete_variation", |db| db.delete_variation(name))
    }

    fn delete_variation_recursive(&mut self, name: &str) -> Result<usize> {
        self.run("delete_variation_recursive", |db| {
            db.delete_variation_recursive(name)
        })
    }

    fn get_constants(
        &mut self,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
        load_columns: bool,
    ) -> Result<ConstantsData> {
        self.run("get_constants", |db| {
            db.get_constants(table_path, run, variation, mode, load_columns)
        })
    }

    fn get_assignment(
        &mut self,
        table_path: &str,
        run: RunNumber,
        variation: &str,
        mode: QueryMode,
    ) -> Result<ConstantsRecord> {
        self.run("get_assignment", |db| {
            db.get_assignment(table_path, run, variation, mode)
        })
    }

    fn get_assignments(
        &mut self,
        table_path: &str,
        run: Option<RunNumber>,
        variation: Option<&str>,
        until: Option<Timestamp>,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Assignment>> {
        self.run("get_assignments", |db| {
            db.get_assignments(table_path, run, variation, until, order, page)
        })
    }

    fn create_assignment(&mut self, request: NewAssignment) -> Result<AssignmentId> {
        self.run("create_assignment", |db| db.create_assignment(request))
    }

    fn update_assignment_comment(&mut self, id: AssignmentId, comment: &str) -> Result<()> {
        self.run("update_assignment_comment", |db| {
            db.update_assignment_comment(id, comment)
        })
    }

    fn delete_assignment(&mut self, id: AssignmentId) -> Result<()> {
        self.run("delete_assignment", |db| db.delete_assignment(id))
    }
}
