//! Fallible conversions from stored cell text
//!
//! Cells are stored as strings; consumers extract them as typed values.
//! Every conversion here returns a `Result`; a malformed cell is a
//! first-class outcome, never silently substituted with a default.
//!
//! Inputs are trimmed of surrounding whitespace before parsing, matching
//! what the tokenizer can emit for quoted cells.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed-parse failure for one cell
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("cannot parse {value:?} as {expected}")]
pub struct ParseError {
    /// The raw cell text (trimmed)
    pub value: String,
    /// Human-readable target type name
    pub expected: &'static str,
}

impl ParseError {
    fn new(value: &str, expected: &'static str) -> Self {
        ParseError {
            value: value.to_string(),
            expected,
        }
    }
}

/// Parse a 32-bit signed integer cell
pub fn parse_int(source: &str) -> Result<i32, ParseError> {
    let s = source.trim();
    s.parse().map_err(|_| ParseError::new(s, "int"))
}

/// Parse a 32-bit unsigned integer cell
pub fn parse_uint(source: &str) -> Result<u32, ParseError> {
    let s = source.trim();
    s.parse().map_err(|_| ParseError::new(s, "uint"))
}

/// Parse a 64-bit signed integer cell
pub fn parse_long(source: &str) -> Result<i64, ParseError> {
    let s = source.trim();
    s.parse().map_err(|_| ParseError::new(s, "long"))
}

/// Parse a 64-bit unsigned integer cell
pub fn parse_ulong(source: &str) -> Result<u64, ParseError> {
    let s = source.trim();
    s.parse().map_err(|_| ParseError::new(s, "ulong"))
}

/// Parse a double cell
pub fn parse_double(source: &str) -> Result<f64, ParseError> {
    let s = source.trim();
    s.parse().map_err(|_| ParseError::new(s, "double"))
}

/// Parse a boolean cell
///
/// Accepts the literals `true` / `false` and integer forms: any non-zero
/// integer is `true`, zero is `false`.
pub fn parse_bool(source: &str) -> Result<bool, ParseError> {
    let s = source.trim();
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => match s.parse::<i64>() {
            Ok(n) => Ok(n != 0),
            Err(_) => Err(ParseError::new(s, "bool")),
        },
    }
}

/// Parse a unix-time cell into a [`Timestamp`]
///
/// Accepts integer seconds since the epoch, or an RFC 3339 datetime such
/// as `2012-08-30T23:48:42Z`.
pub fn parse_unix_time(source: &str) -> Result<Timestamp, ParseError> {
    let s = source.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Timestamp::from_secs(secs));
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| Timestamp::from_datetime(dt.into()))
        .map_err(|_| ParseError::new(s, "unix time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int(" -7 "), Ok(-7));
        assert!(parse_int("4.2").is_err());
        assert!(parse_int("abc").is_err());
        assert!(parse_int("").is_err());
    }

    #[test]
    fn test_parse_uint_rejects_negative() {
        assert_eq!(parse_uint("42"), Ok(42));
        assert!(parse_uint("-1").is_err());
    }

    #[test]
    fn test_parse_long_ranges() {
        assert_eq!(parse_long("-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(parse_ulong("18446744073709551615"), Ok(u64::MAX));
        assert!(parse_long("18446744073709551615").is_err());
    }

    #[test]
    fn test_parse_double() {
        assert_eq!(parse_double("5.14"), Ok(5.14));
        assert_eq!(parse_double("1e-3"), Ok(0.001));
        assert!(parse_double("5,14").is_err());
    }

    #[test]
    fn test_parse_bool_literals() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
    }

    #[test]
    fn test_parse_bool_numeric() {
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert_eq!(parse_bool("-3"), Ok(true));
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("True").is_err());
    }

    #[test]
    fn test_parse_unix_time_seconds() {
        assert_eq!(
            parse_unix_time("1600000000"),
            Ok(Timestamp::from_secs(1_600_000_000))
        );
    }

    #[test]
    fn test_parse_unix_time_rfc3339() {
        let ts = parse_unix_time("1970-01-01T00:01:00Z").unwrap();
        assert_eq!(ts, Timestamp::from_secs(60));
    }

    #[test]
    fn test_parse_unix_time_rejects_garbage() {
        assert!(parse_unix_time("yesterday").is_err());
    }

    #[test]
    fn test_error_message_names_type() {
        let err = parse_int("oops").unwrap_err();
        assert!(err.to_string().contains("int"));
        assert!(err.to_string().contains("oops"));
    }
}
