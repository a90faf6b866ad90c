//! Core types for the condb constants engine
//!
//! This crate defines the foundational types used throughout the system:
//! - Ids: stable lightweight handles for directories, tables, run ranges,
//!   variations and assignments
//! - Timestamp: microsecond-precision creation times
//! - ColumnType / Column: the typed-table schema vocabulary
//! - CellValue: one typed cell extracted from stored data
//! - DataTable: the rectangular row/column matrix carried by an assignment
//! - Error: error type hierarchy and stable error codes
//! - ErrorReport: the bounded error/warning record surface
//! - Path helpers: object path grammar, identifier validation
//! - Wildcard matching and paging

#![warn(clippy::all)]

pub mod column;
pub mod data;
pub mod error;
pub mod ids;
pub mod paging;
pub mod parse;
pub mod path;
pub mod report;
pub mod timestamp;
pub mod value;
pub mod wildcard;

// Re-export commonly used types at the crate root
pub use column::{Column, ColumnType};
pub use data::DataTable;
pub use error::{Error, ErrorCode, Result};
pub use ids::{AssignmentId, DirectoryId, RunNumber, RunRangeId, TableId, VariationId};
pub use paging::Page;
pub use parse::{
    parse_bool, parse_double, parse_int, parse_long, parse_uint, parse_ulong, parse_unix_time,
    ParseError,
};
pub use report::{ErrorRecord, ErrorReport, Severity};
pub use timestamp::Timestamp;
pub use value::CellValue;
pub use wildcard::wildcard_match;

/// Name of the variation that always exists and is the default query scope.
pub const DEFAULT_VARIATION: &str = "default";

/// Maximum number of error records retained by an [`ErrorReport`].
pub const MAX_HELD_ERRORS: usize = 100;

/// Maximum length of a directory, table or column name, in bytes.
pub const MAX_NAME_BYTES: usize = 255;
