//! The input router: converts hit-test results into listener dispatch.
//!
//! The host performs hit testing and feeds the router one call per
//! platform event (`pointer_move`, `pointer_down`, ...). The router keeps
//! the current hover path per `(pointer, surface)`, diffs it against the
//! incoming path, and synthesizes enter/exit/over dispatch around the raw
//! event. Elements register listeners keyed by id; the pointer's own
//! listeners always run after the path elements (bubbling order).
//!
//! Ordering guarantee: when the hover path changes, `exit` for departed
//! elements is dispatched before `enter` and `over` for the new path.
//! Group highlighting depends on this — a child's exit must clear focus
//! before its group container re-claims it.

use crate::listener::InputListener;
use crate::pointer::PointerHandle;
use crate::types::InputEvent;
use glint_core::{ElementId, ElementPath, Point, PointerId, SurfaceId};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

type EventCallback = Rc<dyn Fn(&InputEvent)>;

#[derive(Default)]
pub struct InputRouter {
    element_listeners: RefCell<FxHashMap<ElementId, Vec<Rc<InputListener>>>>,
    over_paths: RefCell<FxHashMap<(PointerId, SurfaceId), ElementPath>>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Element listener registry
    // ------------------------------------------------------------------

    pub fn add_element_listener(&self, element: ElementId, listener: Rc<InputListener>) {
        let mut listeners = self.element_listeners.borrow_mut();
        let entry = listeners.entry(element).or_default();
        debug_assert!(
            !entry.iter().any(|candidate| Rc::ptr_eq(candidate, &listener)),
            "listener already registered for element {:?}",
            element
        );
        entry.push(listener);
    }

    pub fn remove_element_listener(&self, element: ElementId, listener: &Rc<InputListener>) {
        let mut listeners = self.element_listeners.borrow_mut();
        if let Some(entry) = listeners.get_mut(&element) {
            entry.retain(|candidate| !Rc::ptr_eq(candidate, listener));
            if entry.is_empty() {
                listeners.remove(&element);
            }
        }
    }

    fn element_snapshot(&self, element: ElementId) -> Vec<Rc<InputListener>> {
        self.element_listeners
            .borrow()
            .get(&element)
            .cloned()
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Event entry points
    // ------------------------------------------------------------------

    /// Routes a pointer move. `path` is the fresh hit path for `point`
    /// (empty when nothing is under the pointer). Synthesizes exit, enter,
    /// and over dispatch when the path changed, then dispatches the move
    /// itself.
    pub fn pointer_move(
        &self,
        pointer: &PointerHandle,
        surface: SurfaceId,
        point: Point,
        path: &ElementPath,
    ) {
        pointer.set_point(point);

        let key = (pointer.id(), surface);
        let old_path = self
            .over_paths
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_default();

        if old_path != *path {
            self.over_paths.borrow_mut().insert(key, path.clone());
            self.dispatch_branch_change(pointer, surface, point, &old_path, path);
        }

        let event = InputEvent::new(Rc::clone(pointer), surface, point, path.clone());
        self.dispatch_bubbling(&event, |listener| listener.move_.clone());
    }

    fn dispatch_branch_change(
        &self,
        pointer: &PointerHandle,
        surface: SurfaceId,
        point: Point,
        old_path: &ElementPath,
        new_path: &ElementPath,
    ) {
        let branch = old_path.common_prefix_len(new_path);
        log::trace!(
            "pointer {:?} surface {:?}: hover path changed (branch at {})",
            pointer.id(),
            surface,
            branch
        );

        // Exits first, leaf inward. Each element's event carries the
        // root-to-element segment of the departed path, so an exited
        // ancestor never sees descendants it still contains.
        if old_path.len() > branch {
            for index in (branch..old_path.len()).rev() {
                let element = old_path.get(index).unwrap();
                let exit_event =
                    InputEvent::new(Rc::clone(pointer), surface, point, old_path.prefix(index + 1));
                self.dispatch_to_element(element, &exit_event, |listener| listener.exit.clone());
            }
            let exit_event = InputEvent::new(Rc::clone(pointer), surface, point, old_path.clone());
            self.dispatch_to_pointer(&exit_event, |listener| listener.exit.clone());
        }

        // Then enters, branch outward: ancestors first, so the deepest
        // element's focus claim lands last and wins.
        if new_path.len() > branch {
            for index in branch..new_path.len() {
                let element = new_path.get(index).unwrap();
                let enter_event =
                    InputEvent::new(Rc::clone(pointer), surface, point, new_path.prefix(index + 1));
                self.dispatch_to_element(element, &enter_event, |listener| listener.enter.clone());
            }
            let enter_event = InputEvent::new(Rc::clone(pointer), surface, point, new_path.clone());
            self.dispatch_to_pointer(&enter_event, |listener| listener.enter.clone());
        }

        // Finally over, bubbling along the whole new path.
        if !new_path.is_empty() {
            let over_event =
                InputEvent::new(Rc::clone(pointer), surface, point, new_path.clone());
            self.dispatch_bubbling(&over_event, |listener| listener.over.clone());
        }
    }

    /// Routes a press. `path` is the hit path at press time.
    pub fn pointer_down(
        &self,
        pointer: &PointerHandle,
        surface: SurfaceId,
        point: Point,
        path: &ElementPath,
    ) {
        pointer.set_down(point);
        let event = InputEvent::new(Rc::clone(pointer), surface, point, path.clone());
        self.dispatch_bubbling(&event, |listener| listener.down.clone());
    }

    /// Routes a release. Returns whether the pointer location changed with
    /// the release, so hosts can skip redundant hover work.
    pub fn pointer_up(
        &self,
        pointer: &PointerHandle,
        surface: SurfaceId,
        point: Point,
        path: &ElementPath,
    ) -> bool {
        let changed = pointer.set_up(point);
        let event = InputEvent::new(Rc::clone(pointer), surface, point, path.clone());
        self.dispatch_bubbling(&event, |listener| listener.up.clone());
        changed
    }

    /// Routes a cancel (window blur, gesture takeover, contact lost).
    pub fn pointer_cancel(
        &self,
        pointer: &PointerHandle,
        surface: SurfaceId,
        point: Point,
        path: &ElementPath,
    ) -> bool {
        let changed = pointer.set_cancelled(point);
        let event = InputEvent::new(Rc::clone(pointer), surface, point, path.clone());
        self.dispatch_bubbling(&event, |listener| listener.cancel.clone());
        changed
    }

    /// Interrupts every listener on the pointer.
    pub fn pointer_interrupt(&self, pointer: &PointerHandle) {
        pointer.interrupt_all();
    }

    /// Key release on a synthesized keyboard pointer. Keyboard pointers
    /// have no hit path; only the pointer's own listeners run.
    pub fn keyup(&self, pointer: &PointerHandle) {
        for listener in pointer.listener_snapshot() {
            if let Some(callback) = listener.keyup.clone() {
                callback();
            }
        }
    }

    /// Focus blur on a synthesized keyboard pointer.
    pub fn blur(&self, pointer: &PointerHandle) {
        for listener in pointer.listener_snapshot() {
            if let Some(callback) = listener.blur.clone() {
                callback();
            }
        }
    }

    /// Drops routing state for a pointer that is going away.
    pub fn forget_pointer(&self, pointer: &PointerHandle) {
        self.over_paths
            .borrow_mut()
            .retain(|(id, _), _| *id != pointer.id());
    }

    /// The hover path currently tracked for `(pointer, surface)`.
    pub fn over_path(&self, pointer: &PointerHandle, surface: SurfaceId) -> ElementPath {
        self.over_paths
            .borrow()
            .get(&(pointer.id(), surface))
            .cloned()
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Dispatch helpers — all iterate snapshots
    // ------------------------------------------------------------------

    fn dispatch_to_element(
        &self,
        element: ElementId,
        event: &InputEvent,
        select: impl Fn(&InputListener) -> Option<EventCallback>,
    ) {
        for listener in self.element_snapshot(element) {
            if let Some(callback) = select(&listener) {
                callback(event);
            }
        }
    }

    fn dispatch_to_pointer(
        &self,
        event: &InputEvent,
        select: impl Fn(&InputListener) -> Option<EventCallback>,
    ) {
        for listener in event.pointer.listener_snapshot() {
            if let Some(callback) = select(&listener) {
                callback(event);
            }
        }
    }

    /// Leaf-to-root along the event path, then the pointer's listeners.
    fn dispatch_bubbling(
        &self,
        event: &InputEvent,
        select: impl Fn(&InputListener) -> Option<EventCallback>,
    ) {
        for element in event.path.iter().rev() {
            self.dispatch_to_element(element, event, &select);
        }
        self.dispatch_to_pointer(event, &select);
    }
}
