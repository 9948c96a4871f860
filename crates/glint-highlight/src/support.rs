//! The capability predicate consumed from the host scene.

use glint_core::{ElementId, ElementPath};

/// Host-provided answers about scene elements.
///
/// Glint never walks the scene graph; it asks these questions about ids it
/// finds on hit paths. The answers may change over time (elements hidden,
/// capabilities toggled) and are re-queried on every decision.
pub trait HighlightSupport {
    /// Does this element support the highlight feature? Drives the
    /// descendant-wins tie-break on pointer moves.
    fn supports_highlight(&self, element: ElementId) -> bool;

    /// Is every element on this path still pickable (visible and
    /// hit-testable)? An exited path that is no longer pickable releases a
    /// lock it still contains, so a node hidden mid-drag cannot strand its
    /// highlight.
    fn is_path_pickable(&self, path: &ElementPath) -> bool {
        let _ = path;
        true
    }
}
