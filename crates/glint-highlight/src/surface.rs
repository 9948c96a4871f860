//! Surfaces and the explicit surface registry.

use crate::focus::SurfaceFocusStore;
use glint_core::{Signal, SurfaceId};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// An independently rendered display root.
///
/// Owns its focus store and the externally toggled highlight feature flag
/// (typically an accessibility preference). Highlighting starts disabled;
/// hosts opt surfaces in.
pub struct Surface {
    id: SurfaceId,
    focus: SurfaceFocusStore,
    highlights_enabled: Signal<bool>,
}

impl Surface {
    fn new(id: SurfaceId) -> Rc<Self> {
        Rc::new(Self {
            id,
            focus: SurfaceFocusStore::new(),
            highlights_enabled: Signal::new(false),
        })
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn focus(&self) -> &SurfaceFocusStore {
        &self.focus
    }

    pub fn highlights_enabled(&self) -> &Signal<bool> {
        &self.highlights_enabled
    }

    pub fn set_highlights_enabled(&self, enabled: bool) {
        self.highlights_enabled.set(enabled);
    }
}

/// Insertion-ordered registry of live surfaces.
///
/// Populated by the composition root at startup; surface iteration order
/// everywhere in Glint is this registration order. Also the allocator of
/// surface ids.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: RefCell<IndexMap<SurfaceId, Rc<Surface>>>,
    next_id: Cell<u64>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self {
            surfaces: RefCell::new(IndexMap::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn create_surface(&self) -> Rc<Surface> {
        let id = SurfaceId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        let surface = Surface::new(id);
        self.surfaces.borrow_mut().insert(id, Rc::clone(&surface));
        log::debug!("surface {:?} registered", id);
        surface
    }

    pub fn get(&self, id: SurfaceId) -> Option<Rc<Surface>> {
        self.surfaces.borrow().get(&id).cloned()
    }

    pub fn remove(&self, id: SurfaceId) -> Option<Rc<Surface>> {
        let removed = self.surfaces.borrow_mut().shift_remove(&id);
        if removed.is_some() {
            log::debug!("surface {:?} removed", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.surfaces.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.borrow().is_empty()
    }

    /// Snapshot of the registered surfaces in registration order.
    pub fn surfaces(&self) -> Vec<Rc<Surface>> {
        self.surfaces.borrow().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_unique_ids_in_order() {
        let registry = SurfaceRegistry::new();
        let a = registry.create_surface();
        let b = registry.create_surface();

        assert_ne!(a.id(), b.id());
        let order: Vec<SurfaceId> = registry.surfaces().iter().map(|s| s.id()).collect();
        assert_eq!(order, vec![a.id(), b.id()]);
    }

    #[test]
    fn remove_forgets_surface() {
        let registry = SurfaceRegistry::new();
        let a = registry.create_surface();
        assert!(registry.get(a.id()).is_some());

        registry.remove(a.id());
        assert!(registry.get(a.id()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn highlights_start_disabled() {
        let registry = SurfaceRegistry::new();
        let surface = registry.create_surface();
        assert!(!surface.highlights_enabled().get());

        surface.set_highlights_enabled(true);
        assert!(surface.highlights_enabled().get());
    }
}
