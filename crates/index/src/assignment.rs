//! Assignments: immutable versioned deliveries of table data

use condb_core::{AssignmentId, DataTable, RunRangeId, TableId, Timestamp, VariationId};
use serde::{Deserialize, Serialize};

/// One immutable, versioned delivery of a table's data
///
/// Created once and never mutated; corrections are made by creating a
/// new, later assignment. Only the comment may be updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    id: AssignmentId,
    table: TableId,
    run_range: RunRangeId,
    variation: VariationId,
    created: Timestamp,
    version: u32,
    data: DataTable,
    comment: String,
}

impl Assignment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: AssignmentId,
        table: TableId,
        run_range: RunRangeId,
        variation: VariationId,
        created: Timestamp,
        version: u32,
        data: DataTable,
        comment: String,
    ) -> Self {
        Assignment {
            id,
            table,
            run_range,
            variation,
            created,
            version,
            data,
            comment,
        }
    }

    /// Stable id of this assignment
    pub fn id(&self) -> AssignmentId {
        self.id
    }

    /// Table this assignment delivers data for
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Run range this assignment covers
    pub fn run_range(&self) -> RunRangeId {
        self.run_range
    }

    /// Variation this assignment belongs to
    pub fn variation(&self) -> VariationId {
        self.variation
    }

    /// Creation time
    pub fn created(&self) -> Timestamp {
        self.created
    }

    /// 1-based version within the (table, run range, variation) scope
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The delivered data matrix
    pub fn data(&self) -> &DataTable {
        &self.data
    }

    /// Free-form comment; the only mutable field
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub(crate) fn set_comment(&mut self, comment: String) {
        self.comment = comment;
    }
}
