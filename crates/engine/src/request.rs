//! Single-string constants requests
//!
//! Interactive tooling addresses constants with one colon-separated
//! string:
//!
//! ```text
//! /calo/gains:1250:mc:2024-06-01T00:00:00Z
//! ```
//!
//! Every field after the path is optional and empty fields fall back to
//! defaults: run 0, variation `default`, no time cutoff. The time field
//! accepts unix seconds or an RFC 3339 datetime (which itself contains
//! colons, so the time is everything after the third separator).

use crate::resolver::QueryMode;
use condb_core::{parse_unix_time, Error, Result, RunNumber, Timestamp, DEFAULT_VARIATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed constants request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantsRequest {
    /// Absolute table path
    pub path: String,
    /// Run number; defaults to 0
    pub run: RunNumber,
    /// Variation name; defaults to `default`
    pub variation: String,
    /// Optional as-of cutoff
    pub time: Option<Timestamp>,
}

impl ConstantsRequest {
    /// Request for a table path with all defaults
    pub fn for_path(path: impl Into<String>) -> Self {
        ConstantsRequest {
            path: path.into(),
            run: 0,
            variation: DEFAULT_VARIATION.to_string(),
            time: None,
        }
    }

    /// Parse a `path:run:variation:time` request string
    ///
    /// # Examples
    ///
    /// ```
    /// use condb_engine::ConstantsRequest;
    ///
    /// let r = ConstantsRequest::parse("/calo/gains:1250:mc").unwrap();
    /// assert_eq!(r.run, 1250);
    /// assert_eq!(r.variation, "mc");
    ///
    /// let r = ConstantsRequest::parse("/calo/gains::").unwrap();
    /// assert_eq!(r.run, 0);
    /// assert_eq!(r.variation, "default");
    /// ```
    pub fn parse(request: &str) -> Result<Self> {
        let mut parts = request.splitn(4, ':');
        let path = parts.next().unwrap_or_default();
        if path.is_empty() {
            return Err(Error::InvalidPath {
                path: request.to_string(),
            });
        }

        let mut parsed = Self::for_path(path);
        if let Some(run) = parts.next() {
            if !run.is_empty() {
                parsed.run = run.parse().map_err(|_| Error::InvalidPath {
                    path: request.to_string(),
                })?;
            }
        }
        if let Some(variation) = parts.next() {
            if !variation.is_empty() {
                parsed.variation = variation.to_string();
            }
        }
        if let Some(time) = parts.next() {
            if !time.is_empty() {
                parsed.time = Some(parse_unix_time(time)?);
            }
        }
        Ok(parsed)
    }

    /// Query mode implied by this request: as-of when a time is present,
    /// latest otherwise
    pub fn mode(&self) -> QueryMode {
        match self.time {
            Some(cutoff) => QueryMode::AsOf(cutoff),
            None => QueryMode::Latest,
        }
    }
}

impl fmt::Display for ConstantsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.run, self.variation)?;
        if let Some(time) = self.time {
            write!(f, ":{}", time.as_secs())?;
        }
        Ok(())
    }
}
