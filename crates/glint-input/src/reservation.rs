//! Intent reservations: transient, self-removing listeners.
//!
//! Reserving an intent tags the pointer (so other listeners in the
//! dispatch chain can see a drag is coming) and installs exactly one
//! listener keyed to the terminating event for that modality. When the
//! terminating event fires, the listener removes the intent, removes
//! itself from the pointer, and clears its slot so a later reservation
//! cycle starts clean.

use crate::listener::InputListener;
use crate::pointer::{Pointer, PointerHandle};
use crate::types::Intent;
use std::rc::{Rc, Weak};

/// Reserves the [`Intent::Drag`] tag on `pointer` until the next `up`.
///
/// Idempotent: a pointer already carrying the intent is left untouched.
pub fn reserve_for_drag(pointer: &PointerHandle) {
    if pointer.intents().contains(Intent::Drag) {
        return;
    }
    debug_assert!(
        pointer.drag_reservation.borrow().is_none(),
        "drag reservation listener already installed"
    );

    let mut intents = pointer.intents();
    intents.insert(Intent::Drag);
    pointer.set_intents(intents);
    log::trace!("pointer {:?}: drag intent reserved", pointer.id());

    let weak = Rc::downgrade(pointer);
    let listener = InputListener::builder()
        .on_up(move |_| release(&weak, Intent::Drag))
        .build();
    pointer.add_input_listener(Rc::clone(&listener), false);
    *pointer.drag_reservation.borrow_mut() = Some(listener);
}

/// Reserves the [`Intent::KeyboardDrag`] tag on `pointer` until the next
/// key release or focus blur — whichever fires first runs the same
/// release.
///
/// Idempotent like [`reserve_for_drag`].
pub fn reserve_for_keyboard_drag(pointer: &PointerHandle) {
    if pointer.intents().contains(Intent::KeyboardDrag) {
        return;
    }
    debug_assert!(
        pointer.keyboard_drag_reservation.borrow().is_none(),
        "keyboard drag reservation listener already installed"
    );

    let mut intents = pointer.intents();
    intents.insert(Intent::KeyboardDrag);
    pointer.set_intents(intents);
    log::trace!("pointer {:?}: keyboard drag intent reserved", pointer.id());

    let weak_keyup = Rc::downgrade(pointer);
    let weak_blur = Rc::downgrade(pointer);
    let listener = InputListener::builder()
        .on_keyup(move || release(&weak_keyup, Intent::KeyboardDrag))
        .on_blur(move || release(&weak_blur, Intent::KeyboardDrag))
        .build();
    pointer.add_input_listener(Rc::clone(&listener), false);
    *pointer.keyboard_drag_reservation.borrow_mut() = Some(listener);
}

fn release(pointer: &Weak<Pointer>, intent: Intent) {
    let Some(pointer) = pointer.upgrade() else {
        return;
    };
    let slot = match intent {
        Intent::Drag => &pointer.drag_reservation,
        Intent::KeyboardDrag => &pointer.keyboard_drag_reservation,
    };
    // Blur after keyup (or vice versa) finds the slot already empty.
    let Some(listener) = slot.borrow_mut().take() else {
        return;
    };

    let mut intents = pointer.intents();
    intents.remove(intent);
    pointer.set_intents(intents);
    pointer.remove_input_listener(&listener);
    log::trace!("pointer {:?}: {:?} intent released", pointer.id(), intent);
}
