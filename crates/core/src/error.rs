//! Error types for the constants engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Every variant belongs to one of five categories (see [`ErrorCode`]):
//! NotFound, Validation, Conflict, Connectivity, Internal. The category is
//! what flows into [`ErrorRecord`](crate::report::ErrorRecord)s on the
//! provider report surface; the variant carries the specific payload.

use crate::ids::{AssignmentId, RunNumber};
use crate::parse::ParseError;
use crate::path::NameError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stable category code attached to every error record.
///
/// Codes are part of the external report surface and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    /// A path, table, run range, variation or assignment is absent
    NotFound = 1,
    /// Bad identifier, count mismatch, malformed value or range
    Validation = 2,
    /// Deletion blocked by dependents, or a duplicate name
    Conflict = 3,
    /// Backend unreachable or not connected
    Connectivity = 4,
    /// Unexpected internal condition
    Internal = 5,
}

impl ErrorCode {
    /// Short lowercase name for log output
    pub const fn name(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::Validation => "validation",
            ErrorCode::Conflict => "conflict",
            ErrorCode::Connectivity => "connectivity",
            ErrorCode::Internal => "internal",
        }
    }
}

/// Error type for the constants engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No directory exists at the given path
    #[error("directory not found: {path}")]
    DirectoryNotFound {
        /// Requested absolute path
        path: String,
    },

    /// No type table exists at the given path
    #[error("type table not found: {path}")]
    TableNotFound {
        /// Requested absolute path
        path: String,
    },

    /// No run range matches the requested bounds or name
    #[error("run range not found: {request}")]
    RunRangeNotFound {
        /// Human-readable description of the lookup
        request: String,
    },

    /// No variation with the given name exists
    #[error("variation not found: {name}")]
    VariationNotFound {
        /// Requested variation name
        name: String,
    },

    /// No assignment satisfies the resolution query
    #[error("no assignment for table {path}, run {run}, variation {variation}")]
    AssignmentNotFound {
        /// Table path the query targeted
        path: String,
        /// Run number the query targeted
        run: RunNumber,
        /// Variation name the query targeted
        variation: String,
    },

    /// An id-addressed assignment no longer exists
    #[error("assignment {id} does not exist")]
    AssignmentMissing {
        /// The stale assignment id
        id: AssignmentId,
    },

    /// An identifier failed name validation
    #[error("invalid name {name:?}: {source}")]
    InvalidName {
        /// The offending name
        name: String,
        /// The specific rule it violated
        source: NameError,
    },

    /// A path is malformed (empty, relative where absolute is required, ...)
    #[error("invalid path: {path:?}")]
    InvalidPath {
        /// The offending path
        path: String,
    },

    /// Table layout without rows or columns
    #[error("table layout must have at least one row and one column")]
    EmptyLayout,

    /// Run range bounds are inverted
    #[error("invalid run range: min {min} > max {max}")]
    InvalidRunRange {
        /// Lower bound
        min: RunNumber,
        /// Upper bound
        max: RunNumber,
    },

    /// Data matrix has the wrong number of rows for the table
    #[error("row count mismatch: table expects {expected} rows, data has {actual}")]
    RowCountMismatch {
        /// Rows defined by the type table
        expected: usize,
        /// Rows present in the data
        actual: usize,
    },

    /// One data row has the wrong number of columns for the table
    #[error("column count mismatch in row {row}: table expects {expected} columns, row has {actual}")]
    ColumnCountMismatch {
        /// Zero-based row index
        row: usize,
        /// Columns defined by the type table
        expected: usize,
        /// Columns present in the row
        actual: usize,
    },

    /// A cell failed typed parsing
    #[error(transparent)]
    InvalidValue(#[from] ParseError),

    /// Sibling with the same name already exists
    #[error("name already taken: {name}")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// Non-recursive directory deletion with children or tables present
    #[error("directory not empty: {path}")]
    DirectoryNotEmpty {
        /// Path of the directory
        path: String,
    },

    /// The namespace root cannot be deleted or moved
    #[error("the root directory cannot be deleted")]
    RootImmutable,

    /// The default variation always exists and cannot be deleted
    #[error("the default variation cannot be deleted")]
    VariationImmutable,

    /// Table deletion blocked by existing assignments
    #[error("table {path} still has {assignments} assignment(s)")]
    TableInUse {
        /// Path of the table
        path: String,
        /// Number of dependent assignments
        assignments: usize,
    },

    /// Run range deletion blocked by existing assignments
    #[error("run range [{min}, {max}] is referenced by {assignments} assignment(s)")]
    RunRangeInUse {
        /// Lower bound
        min: RunNumber,
        /// Upper bound
        max: RunNumber,
        /// Number of dependent assignments
        assignments: usize,
    },

    /// Variation deletion blocked by existing assignments or children
    #[error("variation {name} is referenced by {assignments} assignment(s)")]
    VariationInUse {
        /// Variation name
        name: String,
        /// Number of dependent assignments
        assignments: usize,
    },

    /// Connection attempt failed
    #[error("connection failed for {descriptor}: {reason}")]
    ConnectFailed {
        /// Descriptor with credentials elided
        descriptor: String,
        /// Backend-specific reason
        reason: String,
    },

    /// Operation requires an open connection
    #[error("provider is not connected")]
    NotConnected,

    /// Unexpected internal condition
    #[error("internal error: {message}")]
    Internal {
        /// Description of the condition
        message: String,
    },
}

impl Error {
    /// Category code for the report surface
    pub const fn code(&self) -> ErrorCode {
        match self {
            Error::DirectoryNotFound { .. }
            | Error::TableNotFound { .. }
            | Error::RunRangeNotFound { .. }
            | Error::VariationNotFound { .. }
            | Error::AssignmentNotFound { .. }
            | Error::AssignmentMissing { .. } => ErrorCode::NotFound,

            Error::InvalidName { .. }
            | Error::InvalidPath { .. }
            | Error::EmptyLayout
            | Error::InvalidRunRange { .. }
            | Error::RowCountMismatch { .. }
            | Error::ColumnCountMismatch { .. }
            | Error::InvalidValue(_) => ErrorCode::Validation,

            Error::DuplicateName { .. }
            | Error::DirectoryNotEmpty { .. }
            | Error::RootImmutable
            | Error::VariationImmutable
            | Error::TableInUse { .. }
            | Error::RunRangeInUse { .. }
            | Error::VariationInUse { .. } => ErrorCode::Conflict,

            Error::ConnectFailed { .. } | Error::NotConnected => ErrorCode::Connectivity,

            Error::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Whether this is a NotFound-category error
    pub const fn is_not_found(&self) -> bool {
        matches!(self.code(), ErrorCode::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_category() {
        let err = Error::TableNotFound {
            path: "/test/calo/gains".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/test/calo/gains"));
    }

    #[test]
    fn test_validation_category() {
        let err = Error::RowCountMismatch {
            expected: 12,
            actual: 11,
        };
        assert_eq!(err.code(), ErrorCode::Validation);
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("11"));
    }

    #[test]
    fn test_conflict_category() {
        let err = Error::TableInUse {
            path: "/a/b".to_string(),
            assignments: 3,
        };
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[test]
    fn test_connectivity_category() {
        assert_eq!(Error::NotConnected.code(), ErrorCode::Connectivity);
    }

    #[test]
    fn test_internal_category() {
        let err = Error::Internal {
            message: "index out of sync".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::Internal);
    }

    #[test]
    fn test_code_names() {
        assert_eq!(ErrorCode::NotFound.name(), "not_found");
        assert_eq!(ErrorCode::Internal.name(), "internal");
    }

    #[test]
    fn test_assignment_not_found_message() {
        let err = Error::AssignmentNotFound {
            path: "/calo/gains".to_string(),
            run: 100,
            variation: "default".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("run 100"));
        assert!(msg.contains("default"));
    }
}
