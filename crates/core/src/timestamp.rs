//! Microsecond-precision timestamp type
//!
//! Every assignment records when it was created; as-of-time queries compare
//! against these values. Timestamps are stored as microseconds since the
//! Unix epoch (1970-01-01 00:00:00 UTC).
//!
//! Never expose raw arithmetic. Use the explicit constructors:
//!
//! ```
//! use condb_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let from_secs = Timestamp::from_secs(1000);
//! let from_micros = Timestamp::from_micros(1_000_000_000);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microsecond-precision timestamp
///
/// Represents a point in time as microseconds since Unix epoch.
/// This is the canonical time representation in the engine.
///
/// ## Invariants
///
/// - Timestamps are always non-negative (u64)
/// - Timestamps are always in microseconds
/// - Timestamps are comparable and orderable
/// - The zero timestamp represents Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp for the current moment
    ///
    /// Uses system time. Returns epoch (0) if the system clock is before the
    /// Unix epoch (e.g., clock went backwards due to NTP adjustment).
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis.saturating_mul(1_000))
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Create a timestamp from a UTC datetime
    ///
    /// Datetimes before the Unix epoch clamp to [`Timestamp::EPOCH`].
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let micros = dt.timestamp_micros();
        if micros < 0 {
            Timestamp::EPOCH
        } else {
            Timestamp(micros as u64)
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get milliseconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// Get seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Convert to a UTC datetime
    ///
    /// Returns `None` for values past the chrono-representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if self.0 > i64::MAX as u64 {
            return None;
        }
        Utc.timestamp_micros(self.0 as i64).single()
    }

    /// Previous representable instant, saturating at the epoch
    ///
    /// Used by tests and callers that need "just before T" semantics for
    /// as-of-time queries.
    #[inline]
    pub const fn just_before(&self) -> Self {
        Timestamp(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f")),
            None => write!(f, "+{}us", self.0),
        }
    }
}
