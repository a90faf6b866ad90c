//! condb: a versioned calibration constants database engine
//!
//! Stores and retrieves versioned calibration constants organized under a
//! hierarchical namespace, typed by schema, scoped by run number and named
//! variation. Consumers ask for "the constants valid for run N, variation
//! V, as of time T (or version K)" and receive a tabular data blob.
//!
//! ## Quick start
//!
//! ```
//! use condb::{Database, NewAssignment, QueryMode};
//!
//! let mut db = Database::new();
//! db.make_directory("calo", "/", "calorimeter constants").unwrap();
//! db.create_table(
//!     "gains",
//!     "/calo",
//!     1,
//!     &[("gain".to_string(), "double".to_string())],
//!     "",
//! )
//! .unwrap();
//!
//! db.create_assignment(NewAssignment::new(
//!     "/calo/gains",
//!     vec![vec!["1.25".to_string()]],
//!     0,
//!     9999,
//! ))
//! .unwrap();
//!
//! let constants = db
//!     .get_constants("/calo/gains", 1250, "default", QueryMode::Latest, false)
//!     .unwrap();
//! assert_eq!(constants.data.get(0, 0), Some("1.25"));
//! ```
//!
//! ## Crate layout
//!
//! - [`condb_core`]: ids, timestamps, column types, paths, errors, the
//!   bounded error report
//! - [`condb_format`]: the flat-file tokenizer and token encoding
//! - [`condb_catalog`]: the namespace tree and table store
//! - [`condb_index`]: run ranges, variations, the assignment log
//! - [`condb_engine`]: the resolution engine and provider boundary

pub use condb_core::{
    parse_bool, parse_double, parse_int, parse_long, parse_uint, parse_ulong, parse_unix_time,
    wildcard_match, AssignmentId, CellValue, Column, ColumnType, DataTable, DirectoryId, Error,
    ErrorCode, ErrorRecord, ErrorReport, Page, ParseError, Result, RunNumber, RunRangeId,
    Severity, TableId, Timestamp, VariationId, DEFAULT_VARIATION, MAX_HELD_ERRORS,
};

pub use condb_format::{decode, encode, lexical_split, tokenize, tokenize_text, Tokenizer};

pub use condb_catalog::{Directory, NamespaceTree, TableStore, TypeTable};

pub use condb_index::{Assignment, RunRange, SortOrder, Variation, VersioningIndex};

pub use condb_engine::{
    AdvisoryLocks, ConnectionDescriptor, ConstantsData, ConstantsRecord, ConstantsRequest,
    Database, DatabaseConfig, MemoryProvider, NewAssignment, Provider, QueryMode,
};

/// Path helpers: combine/extract/normalize and identifier validation
pub mod path {
    pub use condb_core::path::{
        combine, is_root, is_valid_name, name_of, normalize, parent_of, segments, validate_name,
        NameError, PATH_SEPARATOR, ROOT_PATH,
    };
}
