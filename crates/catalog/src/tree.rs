//! Arena-backed namespace tree
//!
//! Directories live in an arena indexed by [`DirectoryId`]. Ids are
//! allocated sequentially and never reused; deleting a directory vacates
//! its slot. A previously issued id therefore stays safe to hold across
//! structural mutations: it either still resolves or cleanly reports
//! "not found". The [`revision`](NamespaceTree::revision) counter bumps on
//! every structural change so callers can invalidate cached subtree
//! listings.

use crate::directory::Directory;
use condb_core::path::{self, validate_name};
use condb_core::{wildcard_match, DirectoryId, Error, Page, Result, Timestamp};
use tracing::{debug, info};

/// The hierarchical directory namespace
///
/// The root (`/`) always exists and cannot be deleted.
#[derive(Debug, Clone)]
pub struct NamespaceTree {
    nodes: Vec<Option<Directory>>,
    revision: u64,
}

impl NamespaceTree {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        NamespaceTree {
            nodes: vec![Some(Directory::root(Timestamp::now()))],
            revision: 0,
        }
    }

    /// Structural revision counter
    ///
    /// Incremented by every successful create or delete. Cached child
    /// listings taken at an older revision must be re-read.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The root directory
    pub fn root(&self) -> &Directory {
        self.nodes[DirectoryId::ROOT.as_raw() as usize]
            .as_ref()
            .expect("root directory always exists")
    }

    /// Look up a directory by id
    ///
    /// Returns `None` for ids whose directory has been deleted.
    pub fn directory(&self, id: DirectoryId) -> Option<&Directory> {
        self.nodes.get(id.as_raw() as usize)?.as_ref()
    }

    fn directory_mut(&mut self, id: DirectoryId) -> Option<&mut Directory> {
        self.nodes.get_mut(id.as_raw() as usize)?.as_mut()
    }

    /// Resolve an absolute path to a directory id
    ///
    /// An absent segment yields [`Error::DirectoryNotFound`] rather than a
    /// panic; `/` resolves to the root.
    pub fn resolve(&self, raw_path: &str) -> Result<DirectoryId> {
        let mut current = DirectoryId::ROOT;
        for segment in path::segments(raw_path) {
            current = self
                .child_by_name(current, segment)
                .ok_or_else(|| Error::DirectoryNotFound {
                    path: path::normalize(raw_path),
                })?;
        }
        Ok(current)
    }

    /// Find a direct child by name
    pub fn child_by_name(&self, parent: DirectoryId, name: &str) -> Option<DirectoryId> {
        let dir = self.directory(parent)?;
        dir.children()
            .iter()
            .copied()
            .find(|&c| self.directory(c).is_some_and(|d| d.name() == name))
    }

    /// Absolute path of a directory
    ///
    /// Returns `None` when the id no longer resolves.
    pub fn path_of(&self, id: DirectoryId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self.directory(id)?;
        while let Some(parent) = current.parent() {
            segments.push(current.name().to_string());
            current = self.directory(parent)?;
        }
        if segments.is_empty() {
            return Some(path::ROOT_PATH.to_string());
        }
        segments.reverse();
        let mut out = String::new();
        for s in &segments {
            out.push(path::PATH_SEPARATOR);
            out.push_str(s);
        }
        Some(out)
    }

    /// Create a directory under a parent
    ///
    /// The name must pass identifier validation and be unique among the
    /// parent's children. Bumps the revision on success.
    pub fn create(
        &mut self,
        parent: DirectoryId,
        name: &str,
        comment: &str,
    ) -> Result<DirectoryId> {
        validate_name(name).map_err(|source| Error::InvalidName {
            name: name.to_string(),
            source,
        })?;
        if self.directory(parent).is_none() {
            return Err(Error::DirectoryNotFound {
                path: format!("<{parent}>"),
            });
        }
        if self.child_by_name(parent, name).is_some() {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }

        let now = Timestamp::now();
        let id = DirectoryId::from_raw(self.nodes.len() as u32);
        self.nodes.push(Some(Directory::new(
            id,
            name.to_string(),
            parent,
            comment.to_string(),
            now,
        )));
        self.directory_mut(parent)
            .expect("parent checked above")
            .add_child(id, now);
        self.revision += 1;

        debug!(directory = %self.path_of(id).unwrap_or_default(), "directory created");
        Ok(id)
    }

    /// Update a directory's comment
    ///
    /// Not a structural change; the revision is unchanged.
    pub fn set_comment(&mut self, id: DirectoryId, comment: &str) -> Result<()> {
        let now = Timestamp::now();
        let dir = self
            .directory_mut(id)
            .ok_or_else(|| Error::DirectoryNotFound {
                path: format!("<{id}>"),
            })?;
        dir.set_comment(comment.to_string(), now);
        Ok(())
    }

    /// Delete an empty directory
    ///
    /// Fails with [`Error::DirectoryNotEmpty`] when child directories
    /// exist. The caller is responsible for checking that no tables live
    /// here (the tree does not see the table store). The root cannot be
    /// deleted.
    pub fn delete(&mut self, id: DirectoryId) -> Result<()> {
        if id.is_root() {
            return Err(Error::RootImmutable);
        }
        let dir = self.directory(id).ok_or_else(|| Error::DirectoryNotFound {
            path: format!("<{id}>"),
        })?;
        if !dir.children().is_empty() {
            return Err(Error::DirectoryNotEmpty {
                path: self.path_of(id).unwrap_or_default(),
            });
        }
        let parent = dir.parent().expect("non-root has a parent");

        let now = Timestamp::now();
        let path = self.path_of(id).unwrap_or_default();
        if let Some(p) = self.directory_mut(parent) {
            p.remove_child(id, now);
        }
        self.nodes[id.as_raw() as usize] = None;
        self.revision += 1;

        debug!(directory = %path, "directory deleted");
        Ok(())
    }

    /// Delete a whole subtree, returning the removed directory ids
    ///
    /// Destructive administrative operation: the caller must cascade the
    /// removal of tables (and their assignments) that lived in the
    /// returned directories. The root cannot be deleted.
    pub fn delete_subtree(&mut self, id: DirectoryId) -> Result<Vec<DirectoryId>> {
        if id.is_root() {
            return Err(Error::RootImmutable);
        }
        if self.directory(id).is_none() {
            return Err(Error::DirectoryNotFound {
                path: format!("<{id}>"),
            });
        }

        let removed: Vec<DirectoryId> = std::iter::once(id)
            .chain(self.descendants(id).into_iter().map(|(d, _)| d))
            .collect();

        let now = Timestamp::now();
        let path = self.path_of(id).unwrap_or_default();
        let parent = self
            .directory(id)
            .and_then(|d| d.parent())
            .expect("non-root has a parent");
        if let Some(p) = self.directory_mut(parent) {
            p.remove_child(id, now);
        }
        for &d in &removed {
            self.nodes[d.as_raw() as usize] = None;
        }
        self.revision += 1;

        info!(directory = %path, removed = removed.len(), "subtree deleted");
        Ok(removed)
    }

    /// Pre-order listing of all descendants of `scope`
    ///
    /// Yields `(id, relative_path)` pairs where the relative path has no
    /// leading separator; the scope itself is not listed.
    pub fn descendants(&self, scope: DirectoryId) -> Vec<(DirectoryId, String)> {
        let mut out = Vec::new();
        let Some(dir) = self.directory(scope) else {
            return out;
        };
        let mut stack: Vec<(DirectoryId, String)> = dir
            .children()
            .iter()
            .rev()
            .filter_map(|&c| self.directory(c).map(|d| (c, d.name().to_string())))
            .collect();
        while let Some((id, rel)) = stack.pop() {
            if let Some(dir) = self.directory(id) {
                for &c in dir.children().iter().rev() {
                    if let Some(child) = self.directory(c) {
                        stack.push((c, format!("{rel}/{}", child.name())));
                    }
                }
            }
            out.push((id, rel));
        }
        out
    }

    /// Wildcard search for directories
    ///
    /// `pattern` supports `*` and `?`. A pattern containing `/` is matched
    /// against the path relative to the search scope; otherwise it is
    /// matched against the final path segment. With no scope the whole
    /// tree is searched.
    pub fn search(
        &self,
        pattern: &str,
        scope: Option<DirectoryId>,
        page: Page,
    ) -> Result<Vec<DirectoryId>> {
        let scope = scope.unwrap_or(DirectoryId::ROOT);
        if self.directory(scope).is_none() {
            return Err(Error::DirectoryNotFound {
                path: format!("<{scope}>"),
            });
        }
        let match_full_path = pattern.contains(path::PATH_SEPARATOR);
        let hits = self
            .descendants(scope)
            .into_iter()
            .filter(|(id, rel)| {
                let target = if match_full_path {
                    rel.as_str()
                } else {
                    self.directory(*id).map(Directory::name).unwrap_or("")
                };
                wildcard_match(pattern, target)
            })
            .map(|(id, _)| id)
            .collect();
        Ok(page.apply(hits))
    }
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}
