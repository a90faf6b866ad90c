//! Object path grammar and identifier validation
//!
//! Namespace objects are addressed by absolute paths: `/` is the root,
//! `/calo/gains` names the object `gains` inside directory `/calo`.
//! These helpers are enforced by all API layers.
//!
//! ## Contract
//!
//! - Paths are `/`-separated; the root path is the single character `/`
//! - Path segments (directory, table and column names) contain only ASCII
//!   letters, digits, `_` and `-`
//! - A segment must be non-empty and at most `MAX_NAME_BYTES` long
//!
//! Combining a parent path with a name and then re-extracting the parent
//! reproduces the original parent, for all valid inputs.

use crate::MAX_NAME_BYTES;
use thiserror::Error;

/// Path separator for namespace objects
pub const PATH_SEPARATOR: char = '/';

/// Path of the namespace root
pub const ROOT_PATH: &str = "/";

/// Name validation errors
///
/// These errors map to the `Validation` error code on the report surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Name is empty (length 0)
    #[error("name cannot be empty")]
    Empty,

    /// Name contains a character outside `[A-Za-z0-9_-]`
    #[error("character {0:?} is not allowed in names")]
    InvalidChar(char),

    /// Name exceeds maximum length
    #[error("name too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual name length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },
}

/// Validate a directory, table or column name
///
/// Names may contain ASCII letters, digits, `_` and `-`. Path separators
/// are rejected here, so a valid name is always a single path segment.
///
/// # Examples
///
/// ```
/// use condb_core::path::validate_name;
///
/// assert!(validate_name("gains").is_ok());
/// assert!(validate_name("layer-2_offsets").is_ok());
///
/// assert!(validate_name("").is_err());
/// assert!(validate_name("a/b").is_err());
/// assert!(validate_name("white space").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(NameError::TooLong {
            actual: name.len(),
            max: MAX_NAME_BYTES,
        });
    }
    for ch in name.chars() {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
            return Err(NameError::InvalidChar(ch));
        }
    }
    Ok(())
}

/// Check a name without reporting the violated rule
pub fn is_valid_name(name: &str) -> bool {
    validate_name(name).is_ok()
}

/// Combine two path fragments, normalizing separators at the seam
///
/// Handles any mix of trailing/leading separators: `/a/b/` + `/c` is
/// `/a/b/c`. An empty right side returns the left side unchanged (and
/// vice versa).
///
/// # Examples
///
/// ```
/// use condb_core::path::combine;
///
/// assert_eq!(combine("/calo", "gains"), "/calo/gains");
/// assert_eq!(combine("/calo/", "/gains"), "/calo/gains");
/// assert_eq!(combine("/", "calo"), "/calo");
/// ```
pub fn combine(left: &str, right: &str) -> String {
    let left = left.trim_end_matches(PATH_SEPARATOR);
    let right = right.trim_start_matches(PATH_SEPARATOR);
    match (left.is_empty(), right.is_empty()) {
        (true, true) => ROOT_PATH.to_string(),
        (true, false) => format!("/{right}"),
        (false, true) => left.to_string(),
        (false, false) => format!("{left}/{right}"),
    }
}

/// Extract the directory part of an object path
///
/// `/dir/subdir/object` yields `/dir/subdir`; an object directly under the
/// root yields `/`.
///
/// # Examples
///
/// ```
/// use condb_core::path::parent_of;
///
/// assert_eq!(parent_of("/dir/subdir/object"), "/dir/subdir");
/// assert_eq!(parent_of("/object"), "/");
/// ```
pub fn parent_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches(PATH_SEPARATOR);
    match trimmed.rfind(PATH_SEPARATOR) {
        Some(0) | None => ROOT_PATH,
        Some(idx) => &trimmed[..idx],
    }
}

/// Extract the object name from an object path
///
/// `/dir/subdir/object` yields `object`. The root path yields an empty
/// string.
pub fn name_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches(PATH_SEPARATOR);
    match trimmed.rfind(PATH_SEPARATOR) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Split a path into its non-empty segments
///
/// Leading, trailing and repeated separators produce no segments, so
/// `//a//b/` yields `["a", "b"]`.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

/// Normalize a path to its canonical absolute form
///
/// Collapses repeated separators and strips the trailing separator; the
/// result always starts with `/`. This does not resolve `.` or `..`
/// segments, which are invalid names anyway.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in segments(path) {
        out.push(PATH_SEPARATOR);
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push(PATH_SEPARATOR);
    }
    out
}

/// Whether a path is the root path after normalization
pub fn is_root(path: &str) -> bool {
    segments(path).next().is_none()
}
