//! Variations: named deployment contexts

use condb_core::VariationId;
use serde::{Deserialize, Serialize};

/// Named deployment context scoping an assignment
///
/// Variations may form an inheritance chain through their parent link
/// (`mc-2024` → `mc` → `default`). The chain is a hint for calling layers
/// that want fallback behavior; the resolver itself matches variation
/// names exactly and never walks the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    id: VariationId,
    name: String,
    parent: Option<VariationId>,
    comment: String,
}

impl Variation {
    pub(crate) fn new(
        id: VariationId,
        name: String,
        parent: Option<VariationId>,
        comment: String,
    ) -> Self {
        Variation {
            id,
            name,
            parent,
            comment,
        }
    }

    /// Stable id of this variation
    pub fn id(&self) -> VariationId {
        self.id
    }

    /// Unique variation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent in the inheritance chain; `None` for the default variation
    pub fn parent(&self) -> Option<VariationId> {
        self.parent
    }

    /// Free-form comment
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub(crate) fn set_comment(&mut self, comment: String) {
        self.comment = comment;
    }
}
