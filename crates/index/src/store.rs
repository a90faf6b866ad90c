//! The versioning index store
//!
//! Owns run ranges, variations and the assignment log. Get-or-create
//! semantics for run ranges and variations mirror the creation path:
//! referencing a name or bounds that do not exist yet creates them on
//! demand. Deletion is guarded while assignments reference an entity;
//! the recursive variants cascade and exist for administrative cleanup
//! only.

use crate::assignment::Assignment;
use crate::run_range::RunRange;
use crate::variation::Variation;
use condb_core::path::validate_name;
use condb_core::{
    AssignmentId, DataTable, Error, Page, Result, RunNumber, RunRangeId, TableId, Timestamp,
    VariationId, DEFAULT_VARIATION,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Sort order for assignment listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first
    #[default]
    CreatedAsc,
    /// Newest first
    CreatedDesc,
}

/// Store of run ranges, variations and assignments
#[derive(Debug, Clone)]
pub struct VersioningIndex {
    run_ranges: HashMap<RunRangeId, RunRange>,
    range_by_bounds: HashMap<(RunNumber, RunNumber), RunRangeId>,
    range_by_name: HashMap<String, RunRangeId>,
    next_range_id: u32,

    variations: BTreeMap<VariationId, Variation>,
    variation_by_name: HashMap<String, VariationId>,
    next_variation_id: u32,

    assignments: BTreeMap<AssignmentId, Assignment>,
    by_table: HashMap<TableId, Vec<AssignmentId>>,
    version_counters: HashMap<(TableId, RunRangeId, VariationId), u32>,
    next_assignment_id: u64,
}

impl VersioningIndex {
    /// Create an index holding only the default variation
    pub fn new() -> Self {
        let mut index = VersioningIndex {
            run_ranges: HashMap::new(),
            range_by_bounds: HashMap::new(),
            range_by_name: HashMap::new(),
            next_range_id: 0,
            variations: BTreeMap::new(),
            variation_by_name: HashMap::new(),
            next_variation_id: 0,
            assignments: BTreeMap::new(),
            by_table: HashMap::new(),
            version_counters: HashMap::new(),
            next_assignment_id: 0,
        };
        let id = VariationId::from_raw(0);
        index.next_variation_id = 1;
        index.variations.insert(
            id,
            Variation::new(id, DEFAULT_VARIATION.to_string(), None, String::new()),
        );
        index
            .variation_by_name
            .insert(DEFAULT_VARIATION.to_string(), id);
        index
    }

    // =========================================================================
    // Run ranges
    // =========================================================================

    /// Look up a run range by id
    pub fn run_range(&self, id: RunRangeId) -> Option<&RunRange> {
        self.run_ranges.get(&id)
    }

    /// Find a run range by exact bounds
    pub fn run_range_by_bounds(&self, min: RunNumber, max: RunNumber) -> Option<RunRangeId> {
        self.range_by_bounds.get(&(min, max)).copied()
    }

    /// Find a run range by symbolic name
    pub fn run_range_by_name(&self, name: &str) -> Option<RunRangeId> {
        self.range_by_name.get(name).copied()
    }

    /// Get the range with the given bounds, creating it when absent
    ///
    /// A new range takes the optional name; the name must not be taken by
    /// a range with different bounds. Bounds must satisfy `min <= max`.
    pub fn get_or_create_run_range(
        &mut self,
        min: RunNumber,
        max: RunNumber,
        name: Option<&str>,
        comment: &str,
    ) -> Result<RunRangeId> {
        if min > max {
            return Err(Error::InvalidRunRange { min, max });
        }
        if let Some(id) = self.run_range_by_bounds(min, max) {
            return Ok(id);
        }
        if let Some(name) = name {
            validate_name(name).map_err(|source| Error::InvalidName {
                name: name.to_string(),
                source,
            })?;
            if self.range_by_name.contains_key(name) {
                return Err(Error::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        let id = RunRangeId::from_raw(self.next_range_id);
        self.next_range_id += 1;
        self.run_ranges.insert(
            id,
            RunRange::new(id, min, max, name.map(str::to_string), comment.to_string()),
        );
        self.range_by_bounds.insert((min, max), id);
        if let Some(name) = name {
            self.range_by_name.insert(name.to_string(), id);
        }
        debug!(min, max, name = name.unwrap_or(""), "run range created");
        Ok(id)
    }

    /// Update a run range's bounds and comment
    ///
    /// Name and id never change. `None` fields are left untouched.
    pub fn update_run_range(
        &mut self,
        id: RunRangeId,
        min: Option<RunNumber>,
        max: Option<RunNumber>,
        comment: Option<&str>,
    ) -> Result<()> {
        let range = self.run_ranges.get(&id).ok_or_else(|| Error::RunRangeNotFound {
            request: id.to_string(),
        })?;
        let new_min = min.unwrap_or_else(|| range.min());
        let new_max = max.unwrap_or_else(|| range.max());
        if new_min > new_max {
            return Err(Error::InvalidRunRange {
                min: new_min,
                max: new_max,
            });
        }
        if (new_min, new_max) != (range.min(), range.max())
            && self.range_by_bounds.contains_key(&(new_min, new_max))
        {
            return Err(Error::DuplicateName {
                name: format!("[{new_min}, {new_max}]"),
            });
        }

        let old_bounds = (range.min(), range.max());
        let range = self.run_ranges.get_mut(&id).expect("presence checked above");
        range.set_bounds(new_min, new_max);
        if let Some(comment) = comment {
            range.set_comment(comment.to_string());
        }
        if old_bounds != (new_min, new_max) {
            self.range_by_bounds.remove(&old_bounds);
            self.range_by_bounds.insert((new_min, new_max), id);
        }
        Ok(())
    }

    /// Delete a run range with no dependent assignments
    pub fn delete_run_range(&mut self, id: RunRangeId) -> Result<()> {
        let range = self.run_ranges.get(&id).ok_or_else(|| Error::RunRangeNotFound {
            request: id.to_string(),
        })?;
        let dependents = self.count_for_run_range(id);
        if dependents > 0 {
            return Err(Error::RunRangeInUse {
                min: range.min(),
                max: range.max(),
                assignments: dependents,
            });
        }
        self.remove_run_range_entry(id);
        Ok(())
    }

    /// Delete a run range and every assignment referencing it
    ///
    /// Destructive administrative operation; returns the removed
    /// assignment ids.
    pub fn delete_run_range_recursive(&mut self, id: RunRangeId) -> Result<Vec<AssignmentId>> {
        if !self.run_ranges.contains_key(&id) {
            return Err(Error::RunRangeNotFound {
                request: id.to_string(),
            });
        }
        let doomed: Vec<AssignmentId> = self
            .assignments
            .values()
            .filter(|a| a.run_range() == id)
            .map(Assignment::id)
            .collect();
        for assignment in &doomed {
            self.remove_assignment_entry(*assignment);
        }
        self.remove_run_range_entry(id);
        info!(%id, removed = doomed.len(), "run range deleted recursively");
        Ok(doomed)
    }

    fn remove_run_range_entry(&mut self, id: RunRangeId) {
        if let Some(range) = self.run_ranges.remove(&id) {
            self.range_by_bounds.remove(&(range.min(), range.max()));
            if let Some(name) = range.name() {
                self.range_by_name.remove(name);
            }
        }
    }

    // =========================================================================
    // Variations
    // =========================================================================

    /// Look up a variation by id
    pub fn variation(&self, id: VariationId) -> Option<&Variation> {
        self.variations.get(&id)
    }

    /// Find a variation by name
    pub fn variation_by_name(&self, name: &str) -> Option<VariationId> {
        self.variation_by_name.get(name).copied()
    }

    /// Id of the always-present default variation
    pub fn default_variation(&self) -> VariationId {
        VariationId::from_raw(0)
    }

    /// Get the variation with this name, creating it when absent
    ///
    /// A variation created on demand gets the default variation as its
    /// parent.
    pub fn get_or_create_variation(&mut self, name: &str) -> Result<VariationId> {
        if let Some(id) = self.variation_by_name(name) {
            return Ok(id);
        }
        self.create_variation(name, Some(self.default_variation()), "")
    }

    /// Create a variation with an explicit parent
    pub fn create_variation(
        &mut self,
        name: &str,
        parent: Option<VariationId>,
        comment: &str,
    ) -> Result<VariationId> {
        validate_name(name).map_err(|source| Error::InvalidName {
            name: name.to_string(),
            source,
        })?;
        if self.variation_by_name.contains_key(name) {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        if let Some(parent) = parent {
            if !self.variations.contains_key(&parent) {
                return Err(Error::VariationNotFound {
                    name: parent.to_string(),
                });
            }
        }

        let id = VariationId::from_raw(self.next_variation_id);
        self.next_variation_id += 1;
        self.variations.insert(
            id,
            Variation::new(id, name.to_string(), parent, comment.to_string()),
        );
        self.variation_by_name.insert(name.to_string(), id);
        debug!(variation = name, "variation created");
        Ok(id)
    }

    /// Update a variation's comment
    pub fn update_variation_comment(&mut self, id: VariationId, comment: &str) -> Result<()> {
        let variation = self.variations.get_mut(&id).ok_or_else(|| {
            Error::VariationNotFound {
                name: id.to_string(),
            }
        })?;
        variation.set_comment(comment.to_string());
        Ok(())
    }

    /// Delete a variation with no dependent assignments
    ///
    /// The default variation and variations that are a parent of another
    /// variation cannot be deleted.
    pub fn delete_variation(&mut self, id: VariationId) -> Result<()> {
        let variation = self.variations.get(&id).ok_or_else(|| {
            Error::VariationNotFound {
                name: id.to_string(),
            }
        })?;
        if id == self.default_variation() {
            return Err(Error::VariationImmutable);
        }
        let dependents = self.count_for_variation(id);
        let children = self
            .variations
            .values()
            .filter(|v| v.parent() == Some(id))
            .count();
        if dependents > 0 || children > 0 {
            return Err(Error::VariationInUse {
                name: variation.name().to_string(),
                assignments: dependents,
            });
        }
        self.remove_variation_entry(id);
        Ok(())
    }

    /// Delete a variation and every assignment referencing it
    ///
    /// Destructive administrative operation; returns the removed
    /// assignment ids. Child variations are re-parented to the default
    /// variation.
    pub fn delete_variation_recursive(&mut self, id: VariationId) -> Result<Vec<AssignmentId>> {
        if !self.variations.contains_key(&id) {
            return Err(Error::VariationNotFound {
                name: id.to_string(),
            });
        }
        if id == self.default_variation() {
            return Err(Error::VariationImmutable);
        }
        let doomed: Vec<AssignmentId> = self
            .assignments
            .values()
            .filter(|a| a.variation() == id)
            .map(Assignment::id)
            .collect();
        for assignment in &doomed {
            self.remove_assignment_entry(*assignment);
        }
        let default = self.default_variation();
        let orphans: Vec<VariationId> = self
            .variations
            .values()
            .filter(|v| v.parent() == Some(id))
            .map(Variation::id)
            .collect();
        for orphan in orphans {
            if let Some(v) = self.variations.remove(&orphan) {
                let reparented =
                    Variation::new(v.id(), v.name().to_string(), Some(default), v.comment().to_string());
                self.variations.insert(orphan, reparented);
            }
        }
        self.remove_variation_entry(id);
        info!(%id, removed = doomed.len(), "variation deleted recursively");
        Ok(doomed)
    }

    fn remove_variation_entry(&mut self, id: VariationId) {
        if let Some(variation) = self.variations.remove(&id) {
            self.variation_by_name.remove(variation.name());
        }
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    /// Look up an assignment by id
    pub fn assignment(&self, id: AssignmentId) -> Option<&Assignment> {
        self.assignments.get(&id)
    }

    /// Create an assignment, stamping the current time
    ///
    /// The caller has already validated the data shape against the table;
    /// the index allocates the next version number in the
    /// (table, run range, variation) scope.
    pub fn create_assignment(
        &mut self,
        table: TableId,
        run_range: RunRangeId,
        variation: VariationId,
        data: DataTable,
        comment: &str,
    ) -> Result<AssignmentId> {
        self.create_assignment_at(table, run_range, variation, data, comment, Timestamp::now())
    }

    /// Create an assignment with an explicit creation time
    ///
    /// Used by import and backfill tooling that replays historical data;
    /// version numbers still follow creation order of the calls, not the
    /// supplied timestamps.
    pub fn create_assignment_at(
        &mut self,
        table: TableId,
        run_range: RunRangeId,
        variation: VariationId,
        data: DataTable,
        comment: &str,
        created: Timestamp,
    ) -> Result<AssignmentId> {
        if !self.run_ranges.contains_key(&run_range) {
            return Err(Error::RunRangeNotFound {
                request: run_range.to_string(),
            });
        }
        if !self.variations.contains_key(&variation) {
            return Err(Error::VariationNotFound {
                name: variation.to_string(),
            });
        }

        let counter = self
            .version_counters
            .entry((table, run_range, variation))
            .or_insert(0);
        *counter += 1;
        let version = *counter;

        let id = AssignmentId::from_raw(self.next_assignment_id);
        self.next_assignment_id += 1;
        self.assignments.insert(
            id,
            Assignment::new(
                id,
                table,
                run_range,
                variation,
                created,
                version,
                data,
                comment.to_string(),
            ),
        );
        self.by_table.entry(table).or_default().push(id);

        debug!(%table, version, "assignment created");
        Ok(id)
    }

    /// Update an assignment's comment, the only mutable field
    pub fn update_assignment_comment(&mut self, id: AssignmentId, comment: &str) -> Result<()> {
        let assignment = self
            .assignments
            .get_mut(&id)
            .ok_or(Error::AssignmentMissing { id })?;
        assignment.set_comment(comment.to_string());
        Ok(())
    }

    /// Delete one assignment
    ///
    /// Administrative escape hatch from the append-only model; version
    /// numbers of the remaining assignments do not shift.
    pub fn delete_assignment(&mut self, id: AssignmentId) -> Result<Assignment> {
        if !self.assignments.contains_key(&id) {
            return Err(Error::AssignmentMissing { id });
        }
        info!(%id, "assignment deleted");
        Ok(self.remove_assignment_entry(id).expect("presence checked above"))
    }

    fn remove_assignment_entry(&mut self, id: AssignmentId) -> Option<Assignment> {
        let assignment = self.assignments.remove(&id)?;
        if let Some(list) = self.by_table.get_mut(&assignment.table()) {
            list.retain(|&a| a != id);
        }
        Some(assignment)
    }

    /// Remove every assignment of a table, returning how many were removed
    ///
    /// Used when a table is deleted recursively.
    pub fn delete_assignments_of_table(&mut self, table: TableId) -> usize {
        let doomed = self.by_table.remove(&table).unwrap_or_default();
        for id in &doomed {
            self.assignments.remove(id);
        }
        doomed.len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Assignment ids of a table, in creation order
    pub fn assignments_of_table(&self, table: TableId) -> &[AssignmentId] {
        self.by_table.get(&table).map_or(&[], Vec::as_slice)
    }

    /// Number of assignments stored for a table
    pub fn count_for_table(&self, table: TableId) -> usize {
        self.assignments_of_table(table).len()
    }

    /// Number of assignments referencing a run range
    pub fn count_for_run_range(&self, id: RunRangeId) -> usize {
        self.assignments
            .values()
            .filter(|a| a.run_range() == id)
            .count()
    }

    /// Number of assignments referencing a variation
    pub fn count_for_variation(&self, id: VariationId) -> usize {
        self.assignments
            .values()
            .filter(|a| a.variation() == id)
            .count()
    }

    /// Candidate assignments of a table whose run range covers `run`
    ///
    /// Creation order is preserved.
    pub fn candidates(&self, table: TableId, run: RunNumber) -> Vec<&Assignment> {
        self.assignments_of_table(table)
            .iter()
            .filter_map(|id| self.assignments.get(id))
            .filter(|a| {
                self.run_ranges
                    .get(&a.run_range())
                    .is_some_and(|r| r.contains(run))
            })
            .collect()
    }

    /// List assignments of a table with optional filters and paging
    ///
    /// `run` filters by run-range coverage, `variation` by exact id,
    /// `until` keeps assignments created at or before the cutoff.
    pub fn list_assignments(
        &self,
        table: TableId,
        run: Option<RunNumber>,
        variation: Option<VariationId>,
        until: Option<Timestamp>,
        order: SortOrder,
        page: Page,
    ) -> Vec<&Assignment> {
        let mut hits: Vec<&Assignment> = self
            .assignments_of_table(table)
            .iter()
            .filter_map(|id| self.assignments.get(id))
            .filter(|a| match run {
                Some(run) => self
                    .run_ranges
                    .get(&a.run_range())
                    .is_some_and(|r| r.contains(run)),
                None => true,
            })
            .filter(|a| variation.map_or(true, |v| a.variation() == v))
            .filter(|a| until.map_or(true, |t| a.created() <= t))
            .collect();
        hits.sort_by_key(|a| (a.created(), a.version(), a.id()));
        if order == SortOrder::CreatedDesc {
            hits.reverse();
        }
        page.apply(hits)
    }

    /// Distinct run ranges referenced by a table's assignments
    ///
    /// Optionally restricted to one variation; ordered by bounds.
    pub fn run_ranges_of_table(
        &self,
        table: TableId,
        variation: Option<VariationId>,
        page: Page,
    ) -> Vec<RunRangeId> {
        let mut ids: Vec<RunRangeId> = Vec::new();
        for id in self.assignments_of_table(table) {
            let Some(a) = self.assignments.get(id) else {
                continue;
            };
            if variation.map_or(true, |v| a.variation() == v) && !ids.contains(&a.run_range()) {
                ids.push(a.run_range());
            }
        }
        ids.sort_by_key(|id| {
            self.run_ranges
                .get(id)
                .map(|r| (r.min(), r.max()))
                .unwrap_or((RunNumber::MAX, RunNumber::MAX))
        });
        page.apply(ids)
    }

    /// Distinct variations referenced by a table's assignments
    ///
    /// Optionally restricted to assignments covering one run; ordered by
    /// variation id (creation order).
    pub fn variations_of_table(
        &self,
        table: TableId,
        run: Option<RunNumber>,
        page: Page,
    ) -> Vec<VariationId> {
        let mut ids: Vec<VariationId> = Vec::new();
        for id in self.assignments_of_table(table) {
            let Some(a) = self.assignments.get(id) else {
                continue;
            };
            let covered = run.map_or(true, |r| {
                self.run_ranges
                    .get(&a.run_range())
                    .is_some_and(|range| range.contains(r))
            });
            if covered && !ids.contains(&a.variation()) {
                ids.push(a.variation());
            }
        }
        ids.sort();
        page.apply(ids)
    }
}

impl Default for VersioningIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> DataTable {
        DataTable::from_rows(vec![vec!["1".to_string(), "2".to_string()]]).unwrap()
    }

    fn index_with_scope() -> (VersioningIndex, TableId, RunRangeId, VariationId) {
        let mut index = VersioningIndex::new();
        let range = index.get_or_create_run_range(0, 100, None, "").unwrap();
        let variation = index.default_variation();
        (index, TableId::from_raw(0), range, variation)
    }

    #[test]
    fn test_default_variation_always_exists() {
        let index = VersioningIndex::new();
        let id = index.variation_by_name(DEFAULT_VARIATION).unwrap();
        assert_eq!(id, index.default_variation());
        assert_eq!(index.variation(id).unwrap().parent(), None);
    }

    #[test]
    fn test_default_variation_cannot_be_deleted() {
        let mut index = VersioningIndex::new();
        let id = index.default_variation();
        assert!(matches!(
            index.delete_variation(id),
            Err(Error::VariationImmutable)
        ));
        assert!(matches!(
            index.delete_variation_recursive(id),
            Err(Error::VariationImmutable)
        ));
    }

    #[test]
    fn test_get_or_create_run_range_reuses_bounds() {
        let mut index = VersioningIndex::new();
        let a = index.get_or_create_run_range(0, 10, None, "").unwrap();
        let b = index.get_or_create_run_range(0, 10, None, "").unwrap();
        assert_eq!(a, b);
        let c = index.get_or_create_run_range(0, 11, None, "").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_run_range_rejects_inverted_bounds() {
        let mut index = VersioningIndex::new();
        assert!(matches!(
            index.get_or_create_run_range(10, 5, None, ""),
            Err(Error::InvalidRunRange { min: 10, max: 5 })
        ));
    }

    #[test]
    fn test_run_range_name_is_unique() {
        let mut index = VersioningIndex::new();
        index.get_or_create_run_range(0, 10, Some("all"), "").unwrap();
        assert!(matches!(
            index.get_or_create_run_range(20, 30, Some("all"), ""),
            Err(Error::DuplicateName { .. })
        ));
        assert_eq!(
            index.run_range_by_name("all"),
            index.run_range_by_bounds(0, 10)
        );
    }

    #[test]
    fn test_update_run_range_keeps_name() {
        let mut index = VersioningIndex::new();
        let id = index
            .get_or_create_run_range(0, 10, Some("early"), "")
            .unwrap();
        index.update_run_range(id, Some(5), Some(20), Some("widened")).unwrap();

        let range = index.run_range(id).unwrap();
        assert_eq!((range.min(), range.max()), (5, 20));
        assert_eq!(range.name(), Some("early"));
        assert_eq!(range.comment(), "widened");
        assert_eq!(index.run_range_by_bounds(5, 20), Some(id));
        assert_eq!(index.run_range_by_bounds(0, 10), None);
    }

    #[test]
    fn test_version_numbers_are_monotonic_per_scope() {
        let (mut index, table, range, variation) = index_with_scope();
        for expected in 1..=5u32 {
            let id = index
                .create_assignment(table, range, variation, data(), "")
                .unwrap();
            assert_eq!(index.assignment(id).unwrap().version(), expected);
        }
        // a different scope starts at 1 again
        let other = index.get_or_create_variation("mc").unwrap();
        let id = index
            .create_assignment(table, range, other, data(), "")
            .unwrap();
        assert_eq!(index.assignment(id).unwrap().version(), 1);
    }

    #[test]
    fn test_version_numbers_survive_deletion() {
        let (mut index, table, range, variation) = index_with_scope();
        let first = index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();
        index.delete_assignment(first).unwrap();
        let second = index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();
        assert_eq!(index.assignment(second).unwrap().version(), 2);
    }

    #[test]
    fn test_delete_guards() {
        let (mut index, table, range, variation) = index_with_scope();
        index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();

        assert!(matches!(
            index.delete_run_range(range),
            Err(Error::RunRangeInUse { assignments: 1, .. })
        ));

        let mc = index.get_or_create_variation("mc").unwrap();
        index.create_assignment(table, range, mc, data(), "").unwrap();
        assert!(matches!(
            index.delete_variation(mc),
            Err(Error::VariationInUse { assignments: 1, .. })
        ));
    }

    #[test]
    fn test_parent_variation_cannot_be_deleted() {
        let mut index = VersioningIndex::new();
        let parent = index.create_variation("mc", None, "").unwrap();
        index
            .create_variation("mc-2024", Some(parent), "")
            .unwrap();
        assert!(matches!(
            index.delete_variation(parent),
            Err(Error::VariationInUse { .. })
        ));
    }

    #[test]
    fn test_recursive_delete_cascades() {
        let (mut index, table, range, variation) = index_with_scope();
        index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();
        index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();

        let removed = index.delete_run_range_recursive(range).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(index.run_range(range).is_none());
        assert_eq!(index.count_for_table(table), 0);
    }

    #[test]
    fn test_recursive_variation_delete_reparents_children() {
        let mut index = VersioningIndex::new();
        let mc = index.create_variation("mc", None, "").unwrap();
        let child = index.create_variation("mc-2024", Some(mc), "").unwrap();

        index.delete_variation_recursive(mc).unwrap();
        assert!(index.variation(mc).is_none());
        assert_eq!(
            index.variation(child).unwrap().parent(),
            Some(index.default_variation())
        );
    }

    #[test]
    fn test_candidates_filter_by_run_coverage() {
        let (mut index, table, range, variation) = index_with_scope();
        let late = index.get_or_create_run_range(200, 300, None, "").unwrap();
        index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();
        index
            .create_assignment(table, late, variation, data(), "")
            .unwrap();

        assert_eq!(index.candidates(table, 50).len(), 1);
        assert_eq!(index.candidates(table, 250).len(), 1);
        assert_eq!(index.candidates(table, 150).len(), 0);
    }

    #[test]
    fn test_list_assignments_filters_and_orders() {
        let (mut index, table, range, variation) = index_with_scope();
        for secs in [10u64, 30, 20] {
            index
                .create_assignment_at(
                    table,
                    range,
                    variation,
                    data(),
                    "",
                    Timestamp::from_secs(secs),
                )
                .unwrap();
        }

        let asc = index.list_assignments(
            table,
            Some(50),
            Some(variation),
            None,
            SortOrder::CreatedAsc,
            Page::ALL,
        );
        let times: Vec<u64> = asc.iter().map(|a| a.created().as_secs()).collect();
        assert_eq!(times, vec![10, 20, 30]);

        let until = index.list_assignments(
            table,
            None,
            None,
            Some(Timestamp::from_secs(20)),
            SortOrder::CreatedDesc,
            Page::ALL,
        );
        assert_eq!(until.len(), 2);
        assert_eq!(until[0].created().as_secs(), 20);

        let paged = index.list_assignments(
            table,
            None,
            None,
            None,
            SortOrder::CreatedAsc,
            Page::new(1, 1),
        );
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].created().as_secs(), 20);
    }

    #[test]
    fn test_run_ranges_and_variations_of_table() {
        let (mut index, table, range, variation) = index_with_scope();
        let late = index.get_or_create_run_range(200, 300, None, "").unwrap();
        let mc = index.get_or_create_variation("mc").unwrap();
        index
            .create_assignment(table, range, variation, data(), "")
            .unwrap();
        index.create_assignment(table, late, mc, data(), "").unwrap();

        assert_eq!(index.run_ranges_of_table(table, None, Page::ALL), vec![range, late]);
        assert_eq!(
            index.run_ranges_of_table(table, Some(mc), Page::ALL),
            vec![late]
        );
        assert_eq!(
            index.variations_of_table(table, None, Page::ALL),
            vec![variation, mc]
        );
        assert_eq!(
            index.variations_of_table(table, Some(250), Page::ALL),
            vec![mc]
        );
    }
}
