//! Typed-table schema vocabulary
//!
//! A type table's layout is an ordered list of named, typed columns. The
//! seven column types mirror the storage vocabulary of the text data
//! format; cells are stored as strings and parsed on extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of one table column
///
/// ## Fallback policy
///
/// Type-name strings map to tags case-sensitively. Anything unrecognized
/// (including the empty string) becomes `Double`. This is the documented
/// creation-time policy, not an error: `("px", "")` declares a double
/// column named `px`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 32-bit signed integer
    Int,
    /// 32-bit unsigned integer
    UInt,
    /// 64-bit signed integer
    Long,
    /// 64-bit unsigned integer
    ULong,
    /// 64-bit IEEE-754 floating point
    #[default]
    Double,
    /// Boolean
    Bool,
    /// Free-form string
    String,
}

impl ColumnType {
    /// Map a type-name string to a tag, applying the `Double` fallback
    ///
    /// The match is case-sensitive: `"Int"` is not a recognized name and
    /// therefore maps to `Double`.
    pub fn from_type_name(name: &str) -> ColumnType {
        match name {
            "int" => ColumnType::Int,
            "uint" => ColumnType::UInt,
            "long" => ColumnType::Long,
            "ulong" => ColumnType::ULong,
            "double" => ColumnType::Double,
            "bool" => ColumnType::Bool,
            "string" => ColumnType::String,
            _ => ColumnType::Double,
        }
    }

    /// Canonical type-name string
    pub const fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::UInt => "uint",
            ColumnType::Long => "long",
            ColumnType::ULong => "ulong",
            ColumnType::Double => "double",
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One named, typed field of a table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, satisfies identifier validation
    pub name: String,
    /// Value type of cells in this column
    pub column_type: ColumnType,
    /// Zero-based ordinal position within the table
    pub position: usize,
}

impl Column {
    /// Create a column at the given ordinal position
    pub fn new(name: impl Into<String>, column_type: ColumnType, position: usize) -> Self {
        Column {
            name: name.into(),
            column_type,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_type_names() {
        assert_eq!(ColumnType::from_type_name("int"), ColumnType::Int);
        assert_eq!(ColumnType::from_type_name("uint"), ColumnType::UInt);
        assert_eq!(ColumnType::from_type_name("long"), ColumnType::Long);
        assert_eq!(ColumnType::from_type_name("ulong"), ColumnType::ULong);
        assert_eq!(ColumnType::from_type_name("double"), ColumnType::Double);
        assert_eq!(ColumnType::from_type_name("bool"), ColumnType::Bool);
        assert_eq!(ColumnType::from_type_name("string"), ColumnType::String);
    }

    #[test]
    fn test_unrecognized_falls_back_to_double() {
        assert_eq!(ColumnType::from_type_name(""), ColumnType::Double);
        assert_eq!(ColumnType::from_type_name("float"), ColumnType::Double);
        assert_eq!(ColumnType::from_type_name("i32"), ColumnType::Double);
    }

    #[test]
    fn test_case_sensitive_mapping() {
        assert_eq!(ColumnType::from_type_name("Int"), ColumnType::Double);
        assert_eq!(ColumnType::from_type_name("STRING"), ColumnType::Double);
    }

    #[test]
    fn test_type_name_round_trip() {
        for ct in [
            ColumnType::Int,
            ColumnType::UInt,
            ColumnType::Long,
            ColumnType::ULong,
            ColumnType::Double,
            ColumnType::Bool,
            ColumnType::String,
        ] {
            assert_eq!(ColumnType::from_type_name(ct.type_name()), ct);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ColumnType::ULong.to_string(), "ulong");
    }
}
