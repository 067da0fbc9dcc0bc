//! Parent/child index with bidirectional lookup.
//!
//! The child -> parent map is the source of truth. The parent -> children
//! lists are a reverse index maintained by [`Hierarchy::set_parent`], the
//! only operation that changes either side.

use std::collections::HashMap;

use assetgraph_foundation::{Error, Result, Uid};

/// Stores the object tree.
///
/// Maintains both directions for O(1) traversal:
/// - Forward: child -> parent
/// - Reverse: parent -> children, in the order they were attached
#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
    /// Forward index: child -> parent.
    parents: HashMap<Uid, Uid>,
    /// Reverse index: parent -> children.
    children: HashMap<Uid, Vec<Uid>>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `child` under `parent`, or detaches it when `parent` is `None`.
    ///
    /// Re-attaching under the current parent is idempotent and keeps the
    /// child's position. Returns the previous parent.
    ///
    /// # Errors
    ///
    /// Returns `HierarchyCycle` if `parent` is `child` or one of its descendants.
    pub fn set_parent(&mut self, child: Uid, parent: Option<Uid>) -> Result<Option<Uid>> {
        let previous = self.parent(child);
        if previous == parent {
            return Ok(previous);
        }

        if let Some(parent) = parent {
            if parent == child || self.is_ancestor(child, parent) {
                return Err(Error::hierarchy_cycle(child, parent));
            }
        }

        if let Some(old) = previous {
            self.detach(child, old);
        }

        if let Some(parent) = parent {
            self.parents.insert(child, parent);
            self.children.entry(parent).or_default().push(child);
        }

        Ok(previous)
    }

    fn detach(&mut self, child: Uid, parent: Uid) {
        self.parents.remove(&child);
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.retain(|&c| c != child);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    /// Gets the parent of an object (forward traversal).
    #[must_use]
    pub fn parent(&self, child: Uid) -> Option<Uid> {
        self.parents.get(&child).copied()
    }

    /// Gets the children of an object in attachment order (reverse traversal).
    #[must_use]
    pub fn children(&self, parent: Uid) -> &[Uid] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates ancestors from the direct parent up to the root.
    pub fn ancestors(&self, uid: Uid) -> impl Iterator<Item = Uid> + '_ {
        std::iter::successors(self.parent(uid), move |&current| self.parent(current))
    }

    /// Returns true if `ancestor` is a strict ancestor of `uid`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: Uid, uid: Uid) -> bool {
        self.ancestors(uid).any(|a| a == ancestor)
    }

    /// Number of objects that currently have a parent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns true if no object has a parent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
