//! Highlightable elements: per-element focus bookkeeping and the
//! focus-lock protocol.
//!
//! A `Highlightable` is a capability object composed next to a scene
//! element (explicit composition, not trait mixing). It registers one
//! input listener with the router, drives its member surfaces' focus
//! stores from pointer events, and exposes activation as a signal.
//!
//! The pointer↔element back-reference during a drag is held as a single
//! ownership token, [`ActiveLock`], released atomically by one operation
//! no matter which path triggered it: up, cancel, interrupt, or an
//! external actor clearing the locked slot.

use crate::focus::Focus;
use crate::support::HighlightSupport;
use crate::surface::Surface;
use glint_core::{ElementId, Signal, Subscription, SurfaceId};
use glint_input::{InputEvent, InputListener, PointerHandle};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// One registered surface, reference counted for DAG membership: an
/// element reachable through several scene instances on the same surface
/// wires its subscriptions once and tears them down with the last
/// instance.
struct SurfaceEntry {
    surface: Rc<Surface>,
    instances: usize,
    enabled_sub: Subscription,
    unlocked_sub: Subscription,
    locked_sub: Subscription,
}

/// The single ownership token for an in-flight drag.
struct ActiveLock {
    surface: Rc<Surface>,
    pointer: PointerHandle,
    listener: Rc<InputListener>,
    lock_sub: Subscription,
}

pub struct Highlightable {
    element: ElementId,
    group: bool,
    support: Rc<dyn HighlightSupport>,
    activation: Signal<bool>,
    surfaces: RefCell<IndexMap<SurfaceId, SurfaceEntry>>,
    active_lock: RefCell<Option<ActiveLock>>,
    listener: RefCell<Option<Rc<InputListener>>>,
}

impl Highlightable {
    pub fn new(element: ElementId, support: Rc<dyn HighlightSupport>) -> Rc<Self> {
        Self::build(element, false, support)
    }

    /// A group container: claims a root-to-group highlight for hits on any
    /// of its children that lack a more specific one.
    pub fn new_group(element: ElementId, support: Rc<dyn HighlightSupport>) -> Rc<Self> {
        Self::build(element, true, support)
    }

    fn build(element: ElementId, group: bool, support: Rc<dyn HighlightSupport>) -> Rc<Self> {
        Rc::new(Self {
            element,
            group,
            support,
            activation: Signal::new(false),
            surfaces: RefCell::new(IndexMap::new()),
            active_lock: RefCell::new(None),
            listener: RefCell::new(None),
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn is_group(&self) -> bool {
        self.group
    }

    /// Observable activation flag; true while some member surface with the
    /// feature enabled has this element focused (locked, or unlocked with
    /// no lock in the way).
    pub fn activation(&self) -> &Signal<bool> {
        &self.activation
    }

    pub fn is_activated(&self) -> bool {
        self.activation.get()
    }

    /// The element-level listener to register with the router. Built once
    /// and cached; callbacks hold weak references so the listener never
    /// keeps its element alive.
    pub fn input_listener(self: &Rc<Self>) -> Rc<InputListener> {
        if let Some(listener) = self.listener.borrow().as_ref() {
            return Rc::clone(listener);
        }
        let on_enter = Rc::downgrade(self);
        let on_over = Rc::downgrade(self);
        let on_move = Rc::downgrade(self);
        let on_exit = Rc::downgrade(self);
        let on_down = Rc::downgrade(self);
        let listener = InputListener::builder()
            .on_enter(move |event| {
                if let Some(this) = on_enter.upgrade() {
                    this.on_pointer_entered(event);
                }
            })
            .on_over(move |event| {
                if let Some(this) = on_over.upgrade() {
                    this.on_pointer_over(event);
                }
            })
            .on_move(move |event| {
                if let Some(this) = on_move.upgrade() {
                    this.on_pointer_move(event);
                }
            })
            .on_exit(move |event| {
                if let Some(this) = on_exit.upgrade() {
                    this.on_pointer_exited(event);
                }
            })
            .on_down(move |event| {
                if let Some(this) = on_down.upgrade() {
                    this.on_pointer_down(event);
                }
            })
            .build();
        *self.listener.borrow_mut() = Some(Rc::clone(&listener));
        listener
    }

    // ------------------------------------------------------------------
    // Surface membership
    // ------------------------------------------------------------------

    /// Called when an instance of this element enters a surface's render
    /// tree.
    pub fn on_display_added(self: &Rc<Self>, surface: &Rc<Surface>) {
        {
            let mut surfaces = self.surfaces.borrow_mut();
            if let Some(entry) = surfaces.get_mut(&surface.id()) {
                entry.instances += 1;
                return;
            }

            let weak = Rc::downgrade(self);
            let enabled_sub = surface.highlights_enabled().subscribe(move |_, _| {
                if let Some(this) = weak.upgrade() {
                    this.recompute_activation();
                }
            });
            let weak = Rc::downgrade(self);
            let unlocked_sub = surface.focus().unlocked_signal().subscribe(move |_, _| {
                if let Some(this) = weak.upgrade() {
                    this.recompute_activation();
                }
            });
            let weak = Rc::downgrade(self);
            let locked_sub = surface.focus().locked_signal().subscribe(move |_, _| {
                if let Some(this) = weak.upgrade() {
                    this.recompute_activation();
                }
            });
            surfaces.insert(
                surface.id(),
                SurfaceEntry {
                    surface: Rc::clone(surface),
                    instances: 1,
                    enabled_sub,
                    unlocked_sub,
                    locked_sub,
                },
            );
        }
        log::trace!(
            "element {:?} joined surface {:?}",
            self.element,
            surface.id()
        );
        self.recompute_activation();
    }

    /// Called when an instance leaves a surface's render tree. The last
    /// instance unwires the surface and releases a lock held through it.
    pub fn on_display_removed(&self, surface_id: SurfaceId) {
        let entry = {
            let mut surfaces = self.surfaces.borrow_mut();
            let Some(entry) = surfaces.get_mut(&surface_id) else {
                debug_assert!(
                    false,
                    "element {:?} is not displayed on surface {:?}",
                    self.element, surface_id
                );
                return;
            };
            entry.instances -= 1;
            if entry.instances > 0 {
                return;
            }
            surfaces.shift_remove(&surface_id).unwrap()
        };

        entry
            .surface
            .highlights_enabled()
            .unsubscribe(entry.enabled_sub);
        entry
            .surface
            .focus()
            .unlocked_signal()
            .unsubscribe(entry.unlocked_sub);
        entry
            .surface
            .focus()
            .locked_signal()
            .unsubscribe(entry.locked_sub);

        // The lock subscription outlives membership, so unlocking the
        // store still routes through release_lock.
        let holds_lock = self
            .active_lock
            .borrow()
            .as_ref()
            .is_some_and(|lock| Rc::ptr_eq(&lock.surface, &entry.surface));
        if holds_lock {
            entry.surface.focus().unlock();
        }

        log::trace!("element {:?} left surface {:?}", self.element, surface_id);
        self.recompute_activation();
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.borrow().len()
    }

    /// The surfaces this element is currently displayed on, in
    /// registration order.
    pub fn member_surfaces(&self) -> Vec<Rc<Surface>> {
        self.surfaces
            .borrow()
            .values()
            .map(|entry| Rc::clone(&entry.surface))
            .collect()
    }

    fn member_surface(&self, surface_id: SurfaceId) -> Option<Rc<Surface>> {
        self.surfaces
            .borrow()
            .get(&surface_id)
            .map(|entry| Rc::clone(&entry.surface))
    }

    // ------------------------------------------------------------------
    // Dispatch handlers
    // ------------------------------------------------------------------

    fn on_pointer_entered(self: &Rc<Self>, event: &InputEvent) {
        let Some(surface) = self.member_surface(event.surface) else {
            return;
        };
        let store = surface.focus();
        let differs = store
            .unlocked()
            .map_or(true, |focus| focus.path != event.path);
        if differs {
            store.set_unlocked(Some(Focus::new(event.surface, event.path.clone())));
        }
        // A pointer that already has an attached listener is claimed by an
        // exclusive consumer; freeze the highlight for that interaction.
        if !store.is_locked() && event.pointer.has_attached_listener() {
            self.lock_from(&surface, &event.pointer);
        }
    }

    fn on_pointer_over(&self, event: &InputEvent) {
        if !self.group {
            return;
        }
        let Some(surface) = self.member_surface(event.surface) else {
            return;
        };
        let Some(prefix) = event.path.truncate_at(self.element) else {
            return;
        };
        // Children that claimed a highlight of their own keep it; the
        // child's exit always dispatched before this over, so a stale
        // sibling focus can't linger here.
        let store = surface.focus();
        let more_specific = store
            .unlocked()
            .is_some_and(|focus| focus.path.len() >= prefix.len() && focus.path.starts_with(&prefix));
        if !more_specific {
            store.set_unlocked(Some(Focus::new(event.surface, prefix)));
        }
    }

    fn on_pointer_move(&self, event: &InputEvent) {
        let Some(surface) = self.member_surface(event.surface) else {
            return;
        };
        let Some(index) = event.path.index_of(self.element) else {
            return;
        };
        // Descendant wins: any capable element below us on the path takes
        // precedence, so we defer entirely.
        let deferred = (index + 1..event.path.len()).any(|below| {
            event
                .path
                .get(below)
                .is_some_and(|id| self.support.supports_highlight(id))
        });
        if deferred {
            return;
        }
        let candidate = event.path.prefix(index + 1);
        let store = surface.focus();
        let differs = store
            .unlocked()
            .map_or(true, |focus| focus.path != candidate);
        if differs {
            store.set_unlocked(Some(Focus::new(event.surface, candidate)));
        }
    }

    fn on_pointer_exited(&self, event: &InputEvent) {
        let Some(surface) = self.member_surface(event.surface) else {
            return;
        };
        let store = surface.focus();
        store.set_unlocked(None);

        // A path that stopped being pickable mid-drag must not strand the
        // lock it still contains. Release goes through this store's locked
        // signal only: a lock held through another member surface is not
        // this exit's to drop.
        if !self.support.is_path_pickable(&event.path) {
            let release = match store.locked() {
                None => true,
                Some(focus) => focus
                    .path
                    .leaf()
                    .is_some_and(|leaf| event.path.contains(leaf)),
            };
            if release {
                store.unlock();
            }
        }
    }

    fn on_pointer_down(self: &Rc<Self>, event: &InputEvent) {
        let Some(surface) = self.member_surface(event.surface) else {
            return;
        };
        self.lock_from(&surface, &event.pointer);
    }

    // ------------------------------------------------------------------
    // Focus-lock protocol
    // ------------------------------------------------------------------

    /// `Unlocked → Locked` on behalf of `pointer`. A no-op when another
    /// pointer already holds the surface's lock (multitouch guard) or when
    /// there is nothing to lock.
    fn lock_from(self: &Rc<Self>, surface: &Rc<Surface>, pointer: &PointerHandle) {
        let store = surface.focus();
        if store.is_locked() {
            return;
        }
        debug_assert!(
            self.active_lock.borrow().is_none(),
            "element {:?} already tracks a drag pointer",
            self.element
        );
        if !store.lock() {
            return;
        }

        let on_up = Rc::downgrade(self);
        let on_cancel = Rc::downgrade(self);
        let on_interrupt = Rc::downgrade(self);
        let release_listener = InputListener::builder()
            .on_up(move |_| {
                if let Some(this) = on_up.upgrade() {
                    this.unlock();
                }
            })
            .on_cancel(move |_| {
                if let Some(this) = on_cancel.upgrade() {
                    this.unlock();
                }
            })
            .on_interrupt(move || {
                if let Some(this) = on_interrupt.upgrade() {
                    this.unlock();
                }
            })
            .build();
        pointer.add_input_listener(Rc::clone(&release_listener), false);

        // One-shot: fires when the lock clears by any means, including an
        // unrelated external actor resetting the store.
        let weak = Rc::downgrade(self);
        let lock_sub = store.locked_signal().subscribe(move |_, new| {
            if new.is_none() {
                if let Some(this) = weak.upgrade() {
                    this.release_lock();
                }
            }
        });

        log::debug!(
            "element {:?}: drag lock acquired by pointer {:?} on surface {:?}",
            self.element,
            pointer.id(),
            surface.id()
        );
        *self.active_lock.borrow_mut() = Some(ActiveLock {
            surface: Rc::clone(surface),
            pointer: Rc::clone(pointer),
            listener: release_listener,
            lock_sub,
        });
    }

    /// `Locked → Unlocked`. Every release path — up, cancel, interrupt —
    /// lands here and converges on the locked signal's notification.
    fn unlock(&self) {
        let surface = self
            .active_lock
            .borrow()
            .as_ref()
            .map(|lock| Rc::clone(&lock.surface));
        if let Some(surface) = surface {
            surface.focus().unlock();
        }
    }

    /// Drops the ownership token: removes the per-pointer listener,
    /// unsubscribes the lock-cleared observer, and forgets the pointer.
    /// Idempotent; runs from the lock signal no matter who cleared it.
    fn release_lock(&self) {
        let Some(lock) = self.active_lock.borrow_mut().take() else {
            return;
        };
        lock.pointer.remove_input_listener(&lock.listener);
        lock.surface
            .focus()
            .locked_signal()
            .unsubscribe(lock.lock_sub);
        log::debug!(
            "element {:?}: drag lock released from pointer {:?}",
            self.element,
            lock.pointer.id()
        );
        self.recompute_activation();
    }

    /// True while the element remembers a drag pointer.
    pub fn has_drag_pointer(&self) -> bool {
        self.active_lock.borrow().is_some()
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    /// Recomputes the activation flag: OR over member surfaces, first
    /// match in registration order, counting only surfaces with the
    /// feature enabled. A locked focus targeting us activates; with no
    /// lock, the unlocked focus decides.
    pub fn recompute_activation(&self) {
        let mut active = false;
        {
            let surfaces = self.surfaces.borrow();
            for entry in surfaces.values() {
                if !entry.surface.highlights_enabled().get() {
                    continue;
                }
                let store = entry.surface.focus();
                let targeted = match store.locked() {
                    Some(focus) => focus.targets(self.element),
                    None => store
                        .unlocked()
                        .is_some_and(|focus| focus.targets(self.element)),
                };
                if targeted {
                    active = true;
                    break;
                }
            }
        }
        self.activation.set(active);
    }
}
