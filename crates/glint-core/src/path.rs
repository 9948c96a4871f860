//! Ordered root-to-leaf element paths.
//!
//! An `ElementPath` is the result of a hit test: the chain of elements from
//! a surface root down to the leaf under a point. Paths are value types;
//! cloning one yields a sequence independent of later mutation, which is
//! what lets a locked focus survive structural changes in the scene.

use crate::ids::ElementId;
use smallvec::SmallVec;

/// Root-to-leaf sequence of element ids.
///
/// Backed by a `SmallVec` since real hit paths are almost always shallow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementPath {
    ids: SmallVec<[ElementId; 8]>,
}

impl ElementPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(ids: &[ElementId]) -> Self {
        Self {
            ids: SmallVec::from_slice(ids),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The deepest element on the path, if any.
    pub fn leaf(&self) -> Option<ElementId> {
        self.ids.last().copied()
    }

    /// The surface root, if any.
    pub fn root(&self) -> Option<ElementId> {
        self.ids.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.ids.get(index).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = ElementId> + '_ {
        self.ids.iter().copied()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Position of `id` on the path, root side first.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.ids.iter().position(|&candidate| candidate == id)
    }

    /// True if `prefix` is an initial segment of this path.
    pub fn starts_with(&self, prefix: &ElementPath) -> bool {
        self.ids.len() >= prefix.ids.len() && self.ids[..prefix.ids.len()] == prefix.ids[..]
    }

    /// Length of the shared initial segment with `other`.
    ///
    /// This is the branch point used when diffing an old hover path against
    /// a new one: elements past the common prefix are exited or entered.
    pub fn common_prefix_len(&self, other: &ElementPath) -> usize {
        self.ids
            .iter()
            .zip(other.ids.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// The initial segment of length `len` (clamped to the path length).
    pub fn prefix(&self, len: usize) -> ElementPath {
        let len = len.min(self.ids.len());
        Self {
            ids: SmallVec::from_slice(&self.ids[..len]),
        }
    }

    /// The root-to-`id` prefix, inclusive, if `id` is on the path.
    ///
    /// Used for group highlighting (root-to-group) and for the
    /// self-relative sub-path recomputed on pointer moves.
    pub fn truncate_at(&self, id: ElementId) -> Option<ElementPath> {
        self.index_of(id).map(|index| self.prefix(index + 1))
    }
}

impl FromIterator<ElementId> for ElementPath {
    fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl From<&[ElementId]> for ElementPath {
    fn from(ids: &[ElementId]) -> Self {
        Self::from_slice(ids)
    }
}
