use crate::pointer::Pointer;
use crate::reservation::{reserve_for_drag, reserve_for_keyboard_drag};
use crate::router::InputRouter;
use crate::types::{Intent, PointerKind};
use glint_core::{ElementPath, Point, SurfaceId};

const SURFACE: SurfaceId = SurfaceId::new(1);

#[test]
fn reserve_for_drag_is_idempotent() {
    let pointer = Pointer::new(PointerKind::Touch, Point::ZERO);

    reserve_for_drag(&pointer);
    reserve_for_drag(&pointer);

    assert!(pointer.intents().contains(Intent::Drag));
    // Exactly one self-removing listener regardless of repeat calls.
    assert_eq!(pointer.listener_count(), 1);
}

#[test]
fn drag_reservation_round_trip() {
    let pointer = Pointer::new(PointerKind::Touch, Point::ZERO);
    let router = InputRouter::new();

    reserve_for_drag(&pointer);
    assert!(pointer.intents().contains(Intent::Drag));
    assert_eq!(pointer.listener_count(), 1);

    router.pointer_up(&pointer, SURFACE, Point::ZERO, &ElementPath::new());

    assert!(!pointer.intents().contains(Intent::Drag));
    assert_eq!(pointer.listener_count(), 0);
    pointer.dispose();
}

#[test]
fn second_reservation_cycle_runs_cleanly() {
    let pointer = Pointer::new(PointerKind::Touch, Point::ZERO);
    let router = InputRouter::new();

    reserve_for_drag(&pointer);
    router.pointer_up(&pointer, SURFACE, Point::ZERO, &ElementPath::new());

    reserve_for_drag(&pointer);
    assert!(pointer.intents().contains(Intent::Drag));
    assert_eq!(pointer.listener_count(), 1);

    router.pointer_up(&pointer, SURFACE, Point::ZERO, &ElementPath::new());
    assert!(pointer.intents().is_empty());
    pointer.dispose();
}

#[test]
fn keyboard_reservation_releases_on_keyup() {
    let pointer = Pointer::new(PointerKind::Keyboard, Point::ZERO);
    let router = InputRouter::new();

    reserve_for_keyboard_drag(&pointer);
    assert!(pointer.intents().contains(Intent::KeyboardDrag));
    assert_eq!(pointer.listener_count(), 1);

    router.keyup(&pointer);
    assert!(!pointer.intents().contains(Intent::KeyboardDrag));
    assert_eq!(pointer.listener_count(), 0);

    // A blur arriving after the keyup already released is a no-op.
    router.blur(&pointer);
    assert!(pointer.intents().is_empty());
    pointer.dispose();
}

#[test]
fn keyboard_reservation_releases_on_blur() {
    let pointer = Pointer::new(PointerKind::Keyboard, Point::ZERO);
    let router = InputRouter::new();

    reserve_for_keyboard_drag(&pointer);
    router.blur(&pointer);

    assert!(!pointer.intents().contains(Intent::KeyboardDrag));
    assert_eq!(pointer.listener_count(), 0);
    pointer.dispose();
}

#[test]
fn drag_and_keyboard_reservations_coexist() {
    let pointer = Pointer::new(PointerKind::Keyboard, Point::ZERO);
    let router = InputRouter::new();

    reserve_for_drag(&pointer);
    reserve_for_keyboard_drag(&pointer);
    assert_eq!(pointer.listener_count(), 2);

    router.keyup(&pointer);
    assert!(pointer.intents().contains(Intent::Drag));
    assert!(!pointer.intents().contains(Intent::KeyboardDrag));
    assert_eq!(pointer.listener_count(), 1);

    router.pointer_up(&pointer, SURFACE, Point::ZERO, &ElementPath::new());
    assert!(pointer.intents().is_empty());
    assert_eq!(pointer.listener_count(), 0);
    pointer.dispose();
}
