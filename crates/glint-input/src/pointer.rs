//! The pointer abstraction: one instance per physical input contact.
//!
//! A pointer owns an ordered listener list and at most one "attached"
//! listener. Attachment does not affect delivery — every listener still
//! receives exit/cancel/interrupt so it can release its own resources —
//! it only designates the canonical target of [`Pointer::interrupt_attached`].
//!
//! All contract guards here are `debug_assert!`s: double-attach, duplicate
//! registration, and disposing with outstanding listeners are programmer
//! errors, not recoverable runtime conditions.

use crate::listener::InputListener;
use crate::types::{IntentSet, PointerKind};
use glint_core::{Point, PointerId};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type ListenerList = SmallVec<[Rc<InputListener>; 4]>;

/// Shared handle to a pointer. All mutation goes through `&self` methods,
/// so handles clone freely into listener closures.
pub type PointerHandle = Rc<Pointer>;

pub struct Pointer {
    id: PointerId,
    kind: PointerKind,
    point: Cell<Point>,
    down: Cell<bool>,
    captured: Cell<bool>,
    listeners: RefCell<ListenerList>,
    attached: RefCell<Option<Rc<InputListener>>>,
    intents: Cell<IntentSet>,
    // Reservation slots; at most one listener per drag modality.
    pub(crate) drag_reservation: RefCell<Option<Rc<InputListener>>>,
    pub(crate) keyboard_drag_reservation: RefCell<Option<Rc<InputListener>>>,
}

impl Pointer {
    /// Creates a pointer for a fresh contact (e.g. a touch-start).
    pub fn new(kind: PointerKind, point: Point) -> PointerHandle {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = PointerId::new(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        log::trace!("pointer {:?} created ({:?})", id, kind);
        Rc::new(Self {
            id,
            kind,
            point: Cell::new(point),
            down: Cell::new(false),
            captured: Cell::new(false),
            listeners: RefCell::new(SmallVec::new()),
            attached: RefCell::new(None),
            intents: Cell::new(IntentSet::NONE),
            drag_reservation: RefCell::new(None),
            keyboard_drag_reservation: RefCell::new(None),
        })
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn kind(&self) -> PointerKind {
        self.kind
    }

    pub fn point(&self) -> Point {
        self.point.get()
    }

    pub fn set_point(&self, point: Point) {
        self.point.set(point);
    }

    pub fn is_down(&self) -> bool {
        self.down.get()
    }

    pub fn is_captured(&self) -> bool {
        self.captured.get()
    }

    pub fn intents(&self) -> IntentSet {
        self.intents.get()
    }

    pub(crate) fn set_intents(&self, intents: IntentSet) {
        self.intents.set(intents);
    }

    // ------------------------------------------------------------------
    // Listener management
    // ------------------------------------------------------------------

    /// Appends `listener` to the dispatch list. With `attach`, the
    /// listener becomes the pointer's single exclusive consumer and must
    /// define `interrupt`.
    pub fn add_input_listener(&self, listener: Rc<InputListener>, attach: bool) {
        debug_assert!(
            !self.contains_listener(&listener),
            "listener already registered on pointer {:?}",
            self.id
        );
        self.listeners.borrow_mut().push(Rc::clone(&listener));
        if attach {
            self.attach(listener);
        }
    }

    /// Removes `listener`, detaching it first if it is the attached one.
    pub fn remove_input_listener(&self, listener: &Rc<InputListener>) {
        debug_assert!(
            self.contains_listener(listener),
            "listener not registered on pointer {:?}",
            self.id
        );
        let is_attached = self
            .attached
            .borrow()
            .as_ref()
            .is_some_and(|attached| Rc::ptr_eq(attached, listener));
        if is_attached {
            self.detach(listener);
        }
        self.listeners
            .borrow_mut()
            .retain(|candidate| !Rc::ptr_eq(candidate, listener));
    }

    pub fn contains_listener(&self, listener: &Rc<InputListener>) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|candidate| Rc::ptr_eq(candidate, listener))
    }

    pub fn has_attached_listener(&self) -> bool {
        self.attached.borrow().is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Defensive copy of the listener list. Dispatch iterates this, never
    /// the live list, so handlers can remove themselves mid-iteration.
    pub(crate) fn listener_snapshot(&self) -> ListenerList {
        self.listeners.borrow().clone()
    }

    fn attach(&self, listener: Rc<InputListener>) {
        debug_assert!(
            listener.has_interrupt(),
            "attached listener must implement interrupt"
        );
        let mut attached = self.attached.borrow_mut();
        debug_assert!(
            attached.is_none(),
            "pointer {:?} already has an attached listener",
            self.id
        );
        *attached = Some(listener);
    }

    fn detach(&self, listener: &Rc<InputListener>) {
        let mut attached = self.attached.borrow_mut();
        debug_assert!(
            attached
                .as_ref()
                .is_some_and(|current| Rc::ptr_eq(current, listener)),
            "detach of a listener that is not attached on pointer {:?}",
            self.id
        );
        *attached = None;
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    pub fn set_down(&self, point: Point) {
        self.down.set(true);
        self.point.set(point);
    }

    /// Ends the press. Returns whether the point actually moved, so
    /// callers can skip redundant work on an in-place release.
    pub fn set_up(&self, point: Point) -> bool {
        self.down.set(false);
        let changed = self.point.get() != point;
        self.point.set(point);
        changed
    }

    /// Cancels the contact. Same change-reporting as [`Pointer::set_up`].
    pub fn set_cancelled(&self, point: Point) -> bool {
        self.down.set(false);
        let changed = self.point.get() != point;
        self.point.set(point);
        changed
    }

    // ------------------------------------------------------------------
    // Interrupts and capture
    // ------------------------------------------------------------------

    /// Interrupts only the attached listener, if any.
    pub fn interrupt_attached(&self) {
        let attached = self.attached.borrow().clone();
        if let Some(listener) = attached {
            log::debug!("pointer {:?}: interrupting attached listener", self.id);
            listener.notify_interrupt();
        }
    }

    /// Interrupts every listener that defines `interrupt`, over a snapshot
    /// of the list so listeners may remove themselves (or each other).
    pub fn interrupt_all(&self) {
        log::debug!("pointer {:?}: interrupting all listeners", self.id);
        for listener in self.listener_snapshot() {
            listener.notify_interrupt();
        }
    }

    pub fn on_got_pointer_capture(&self) {
        self.captured.set(true);
    }

    /// Capture loss without a prior end-event means the platform dropped
    /// our stream; interrupt everything so no listener waits forever.
    pub fn on_lost_pointer_capture(&self) {
        if self.captured.get() {
            self.captured.set(false);
            log::warn!(
                "pointer {:?}: capture lost while still marked captured, interrupting",
                self.id
            );
            self.interrupt_all();
        }
    }

    /// Releases the pointer. Outstanding listeners or an attachment at
    /// this point indicate a leak upstream.
    pub fn dispose(&self) {
        debug_assert!(
            self.attached.borrow().is_none(),
            "pointer {:?} disposed while a listener is attached",
            self.id
        );
        debug_assert!(
            self.listeners.borrow().is_empty(),
            "pointer {:?} disposed with {} listeners outstanding",
            self.id,
            self.listeners.borrow().len()
        );
        self.listeners.borrow_mut().clear();
        self.attached.borrow_mut().take();
        self.drag_reservation.borrow_mut().take();
        self.keyboard_drag_reservation.borrow_mut().take();
        log::trace!("pointer {:?} disposed", self.id);
    }
}
