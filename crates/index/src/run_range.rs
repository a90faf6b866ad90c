//! Run ranges: inclusive intervals of run numbers

use condb_core::{RunNumber, RunRangeId};
use serde::{Deserialize, Serialize};

/// Inclusive interval of run numbers an assignment applies to
///
/// Bounds satisfy `min <= max`. A range may carry a unique name so that
/// callers can address it symbolically (`"all"`, `"commissioning-2024"`).
/// Name and id are fixed at creation; only bounds and comment may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRange {
    id: RunRangeId,
    min: RunNumber,
    max: RunNumber,
    name: Option<String>,
    comment: String,
}

impl RunRange {
    pub(crate) fn new(
        id: RunRangeId,
        min: RunNumber,
        max: RunNumber,
        name: Option<String>,
        comment: String,
    ) -> Self {
        RunRange {
            id,
            min,
            max,
            name,
            comment,
        }
    }

    /// Stable id of this range
    pub fn id(&self) -> RunRangeId {
        self.id
    }

    /// Lower bound (inclusive)
    pub fn min(&self) -> RunNumber {
        self.min
    }

    /// Upper bound (inclusive)
    pub fn max(&self) -> RunNumber {
        self.max
    }

    /// Optional symbolic name, unique across ranges
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Free-form comment
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Whether a run number falls inside this range
    pub fn contains(&self, run: RunNumber) -> bool {
        self.min <= run && run <= self.max
    }

    pub(crate) fn set_bounds(&mut self, min: RunNumber, max: RunNumber) {
        self.min = min;
        self.max = max;
    }

    pub(crate) fn set_comment(&mut self, comment: String) {
        self.comment = comment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let range = RunRange::new(RunRangeId::from_raw(0), 10, 20, None, String::new());
        assert!(range.contains(10));
        assert!(range.contains(15));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }

    #[test]
    fn test_single_run_range() {
        let range = RunRange::new(RunRangeId::from_raw(0), 7, 7, None, String::new());
        assert!(range.contains(7));
        assert!(!range.contains(6));
    }
}
