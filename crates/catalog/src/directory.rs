//! Directory node of the namespace tree

use condb_core::{DirectoryId, Timestamp};
use serde::{Deserialize, Serialize};

/// One node in the hierarchical namespace
///
/// The root directory has an empty name, no parent, and the fixed id
/// [`DirectoryId::ROOT`]. All other directories have a valid identifier
/// name and exactly one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    id: DirectoryId,
    name: String,
    parent: Option<DirectoryId>,
    children: Vec<DirectoryId>,
    comment: String,
    created: Timestamp,
    modified: Timestamp,
}

impl Directory {
    pub(crate) fn root(created: Timestamp) -> Self {
        Directory {
            id: DirectoryId::ROOT,
            name: String::new(),
            parent: None,
            children: Vec::new(),
            comment: String::new(),
            created,
            modified: created,
        }
    }

    pub(crate) fn new(
        id: DirectoryId,
        name: String,
        parent: DirectoryId,
        comment: String,
        created: Timestamp,
    ) -> Self {
        Directory {
            id,
            name,
            parent: Some(parent),
            children: Vec::new(),
            comment,
            created,
            modified: created,
        }
    }

    /// Stable id of this directory
    pub fn id(&self) -> DirectoryId {
        self.id
    }

    /// Final path segment; empty for the root
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent directory id; `None` for the root
    pub fn parent(&self) -> Option<DirectoryId> {
        self.parent
    }

    /// Ordered child directory ids
    pub fn children(&self) -> &[DirectoryId] {
        &self.children
    }

    /// Free-form comment
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Creation time
    pub fn created(&self) -> Timestamp {
        self.created
    }

    /// Last structural or comment modification time
    pub fn modified(&self) -> Timestamp {
        self.modified
    }

    pub(crate) fn add_child(&mut self, child: DirectoryId, now: Timestamp) {
        self.children.push(child);
        self.modified = now;
    }

    pub(crate) fn remove_child(&mut self, child: DirectoryId, now: Timestamp) {
        self.children.retain(|&c| c != child);
        self.modified = now;
    }

    pub(crate) fn set_comment(&mut self, comment: String, now: Timestamp) {
        self.comment = comment;
        self.modified = now;
    }
}
