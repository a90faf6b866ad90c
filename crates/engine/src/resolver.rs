//! Assignment selection
//!
//! The matching algorithm works on a candidate set that has already been
//! narrowed to one table, one run number and one variation (exact name
//! match, no inheritance-chain walking):
//!
//! - **Latest**: maximum creation timestamp; identical timestamps resolve
//!   to the higher version number.
//! - **As-of-time(T)**: candidates created at or before `T`, then the
//!   latest of those. The query never falls forward to a later
//!   assignment; an empty set is "not found".
//! - **By-version(K)**: the candidate sequence ordered by creation
//!   ascending, `K` 1-based. `K` past the end is "not found".

use condb_core::Timestamp;
use condb_index::Assignment;

/// Query mode: exactly one way of picking among candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// The most recently created assignment
    #[default]
    Latest,
    /// The most recent assignment created at or before the cutoff
    AsOf(Timestamp),
    /// The K-th assignment ever created for the scope, 1-based
    Version(u32),
}

/// Pick the single matching assignment from a candidate set
///
/// Candidates must all belong to the queried (table, run, variation)
/// scope; order does not matter. Returns `None` when nothing qualifies.
pub fn select<'a>(candidates: &[&'a Assignment], mode: QueryMode) -> Option<&'a Assignment> {
    match mode {
        QueryMode::Latest => newest(candidates.iter().copied()),
        QueryMode::AsOf(cutoff) => newest(
            candidates
                .iter()
                .copied()
                .filter(|a| a.created() <= cutoff),
        ),
        QueryMode::Version(version) => {
            if version == 0 {
                return None;
            }
            let mut ordered: Vec<&Assignment> = candidates.to_vec();
            ordered.sort_by_key(|a| (a.created(), a.version(), a.id()));
            ordered.get(version as usize - 1).copied()
        }
    }
}

/// Maximum by creation time, ties broken by the higher version
fn newest<'a>(candidates: impl Iterator<Item = &'a Assignment>) -> Option<&'a Assignment> {
    candidates.max_by_key(|a| (a.created(), a.version(), a.id()))
}
