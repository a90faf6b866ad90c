//! Bounded error/warning record surface
//!
//! Providers keep an [`ErrorReport`]: a fixed-capacity list of records
//! describing failures and warnings of recent operations. The report is
//! cleared at the start of every public operation that can fail, then zero
//! or more records are appended before a failure sentinel is returned.
//!
//! ## Copy-before-reuse contract
//!
//! Returned records are snapshots valid until the next failing call;
//! callers who need them longer must copy them out, which [`records`]
//! already does by cloning.
//!
//! [`records`]: ErrorReport::records

use crate::error::{Error, ErrorCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Record severity. Warnings use the same channel as errors but do not
/// imply operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Operation failed
    Error,
    /// Noteworthy but non-fatal condition
    Warning,
}

/// One error or warning record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Stable category code
    pub code: ErrorCode,
    /// Name of the originating operation, e.g. `create_assignment`
    pub operation: String,
    /// Human-readable message
    pub message: String,
    /// Error or warning
    pub severity: Severity,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.name(),
            self.operation,
            self.message
        )
    }
}

/// Fixed-capacity list of error/warning records
///
/// When the report is full the oldest record is discarded. The capacity
/// defaults to [`MAX_HELD_ERRORS`](crate::MAX_HELD_ERRORS).
#[derive(Debug, Clone)]
pub struct ErrorReport {
    records: VecDeque<ErrorRecord>,
    capacity: usize,
    last_code: Option<ErrorCode>,
}

impl ErrorReport {
    /// Create a report with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(crate::MAX_HELD_ERRORS)
    }

    /// Create a report holding at most `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        ErrorReport {
            records: VecDeque::with_capacity(capacity),
            capacity,
            last_code: None,
        }
    }

    /// Clear all records
    ///
    /// Called at the start of every public operation that can fail.
    pub fn clear(&mut self) {
        self.records.clear();
        self.last_code = None;
    }

    /// Record a failed operation
    pub fn error(&mut self, operation: &str, error: &Error) {
        self.push(ErrorRecord {
            code: error.code(),
            operation: operation.to_string(),
            message: error.to_string(),
            severity: Severity::Error,
        });
    }

    /// Record a warning; does not change the failure state of the call
    pub fn warning(&mut self, operation: &str, message: impl Into<String>) {
        self.push(ErrorRecord {
            code: ErrorCode::Internal,
            operation: operation.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    /// Append a record, discarding the oldest when full
    pub fn push(&mut self, record: ErrorRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        if record.severity == Severity::Error {
            self.last_code = Some(record.code);
        }
        self.records.push_back(record);
    }

    /// Category code of the most recent error, if any
    pub fn last_error_code(&self) -> Option<ErrorCode> {
        self.last_code
    }

    /// Snapshot of all current records, oldest first
    pub fn records(&self) -> Vec<ErrorRecord> {
        self.records.iter().cloned().collect()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ErrorReport {
    fn default() -> Self {
        Self::new()
    }
}
