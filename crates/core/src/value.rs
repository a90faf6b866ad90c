//! Typed cell values
//!
//! A [`CellValue`] is one cell of a resolved data matrix, parsed according
//! to the owning column's [`ColumnType`]. Cells are stored as strings;
//! typed extraction happens on demand and is fallible.

use crate::column::ColumnType;
use crate::parse::{
    parse_bool, parse_double, parse_int, parse_long, parse_uint, parse_ulong, ParseError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One typed cell extracted from stored data
///
/// ## Float equality
///
/// `Double` comparison follows IEEE-754 semantics: `NaN != NaN`,
/// `-0.0 == 0.0`. Different variants are never equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit unsigned integer
    UInt(u32),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit unsigned integer
    ULong(u64),
    /// 64-bit IEEE-754 floating point
    Double(f64),
    /// Boolean
    Bool(bool),
    /// Free-form string
    String(String),
}

impl CellValue {
    /// Column type this value belongs to
    pub const fn column_type(&self) -> ColumnType {
        match self {
            CellValue::Int(_) => ColumnType::Int,
            CellValue::UInt(_) => ColumnType::UInt,
            CellValue::Long(_) => ColumnType::Long,
            CellValue::ULong(_) => ColumnType::ULong,
            CellValue::Double(_) => ColumnType::Double,
            CellValue::Bool(_) => ColumnType::Bool,
            CellValue::String(_) => ColumnType::String,
        }
    }

    /// Extract as double, converting numeric variants losslessly where
    /// possible
    ///
    /// Strings and bools do not convert; this is an accessor, not a parse.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(f64::from(*v)),
            CellValue::UInt(v) => Some(f64::from(*v)),
            CellValue::Long(v) => Some(*v as f64),
            CellValue::ULong(v) => Some(*v as f64),
            CellValue::Double(v) => Some(*v),
            CellValue::Bool(_) | CellValue::String(_) => None,
        }
    }

    /// Extract the string payload of a `String` cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl ColumnType {
    /// Parse raw cell text into a typed value of this column type
    pub fn parse_cell(&self, raw: &str) -> Result<CellValue, ParseError> {
        match self {
            ColumnType::Int => parse_int(raw).map(CellValue::Int),
            ColumnType::UInt => parse_uint(raw).map(CellValue::UInt),
            ColumnType::Long => parse_long(raw).map(CellValue::Long),
            ColumnType::ULong => parse_ulong(raw).map(CellValue::ULong),
            ColumnType::Double => parse_double(raw).map(CellValue::Double),
            ColumnType::Bool => parse_bool(raw).map(CellValue::Bool),
            ColumnType::String => Ok(CellValue::String(raw.to_string())),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::UInt(v) => write!(f, "{v}"),
            CellValue::Long(v) => write!(f, "{v}"),
            CellValue::ULong(v) => write!(f, "{v}"),
            CellValue::Double(v) => write!(f, "{v}"),
            CellValue::Bool(v) => write!(f, "{v}"),
            CellValue::String(v) => f.write_str(v),
        }
    }
}
