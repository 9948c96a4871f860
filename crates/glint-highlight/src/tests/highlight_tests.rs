//! Hover-driven activation: enter/over/move/exit, groups, tie-breaks,
//! feature gating, and multi-surface membership.

use super::harness::{path, Harness};
use crate::focus::Focus;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn hover_enter_and_exit_toggle_activation() {
    let h = Harness::new();
    let surface = h.surface();
    let node = h.element(&surface, 20);
    let pointer = h.mouse();

    h.move_to(&pointer, &surface, &[10, 20]);
    assert!(node.is_activated());
    assert!(surface.focus().unlocked().unwrap().targets(node.element()));

    h.move_to(&pointer, &surface, &[]);
    assert!(!node.is_activated());
    assert_eq!(surface.focus().unlocked(), None);
}

#[test]
fn feature_flag_gates_activation() {
    let h = Harness::new();
    let surface = h.registry.create_surface();
    let node = h.element(&surface, 2);
    let pointer = h.mouse();

    h.move_to(&pointer, &surface, &[1, 2]);
    assert!(!node.is_activated());

    // Enabling mid-hover recomputes from the focus already in place.
    surface.set_highlights_enabled(true);
    assert!(node.is_activated());

    surface.set_highlights_enabled(false);
    assert!(!node.is_activated());
}

#[test]
fn disabled_surface_never_contributes() {
    let h = Harness::new();
    let dark = h.registry.create_surface();
    let lit = h.surface();
    let node = h.element(&dark, 7);
    node.on_display_added(&lit);

    dark.focus().set_unlocked(Some(Focus::new(dark.id(), path(&[7]))));
    assert!(!node.is_activated());

    lit.focus().set_unlocked(Some(Focus::new(lit.id(), path(&[7]))));
    assert!(node.is_activated());
}

#[test]
fn locked_focus_shadows_unlocked_focus() {
    let h = Harness::new();
    let surface = h.surface();
    let node = h.element(&surface, 3);

    surface
        .focus()
        .set_unlocked(Some(Focus::new(surface.id(), path(&[1, 3]))));
    assert!(node.is_activated());

    // While a lock targets someone else, the unlocked focus is inert.
    surface
        .focus()
        .set_locked(Some(Focus::new(surface.id(), path(&[1, 9]))));
    assert!(!node.is_activated());

    surface.focus().set_locked(None);
    assert!(node.is_activated());
}

#[test]
fn deepest_capable_element_wins_the_hover() {
    let h = Harness::new();
    let surface = h.surface();
    let ancestor = h.element(&surface, 2);
    let descendant = h.element(&surface, 3);
    let pointer = h.mouse();

    h.move_to(&pointer, &surface, &[1, 2, 3]);
    assert!(!ancestor.is_activated());
    assert!(descendant.is_activated());
    assert_eq!(
        surface.focus().unlocked(),
        Some(Focus::new(surface.id(), path(&[1, 2, 3])))
    );
}

#[test]
fn ancestor_reclaims_hover_after_descendant_exit() {
    let h = Harness::new();
    let surface = h.surface();
    let ancestor = h.element(&surface, 2);
    let descendant = h.element(&surface, 3);
    let pointer = h.mouse();

    h.move_to(&pointer, &surface, &[1, 2, 3]);
    h.move_to(&pointer, &surface, &[1, 2]);

    assert!(ancestor.is_activated());
    assert!(!descendant.is_activated());
    assert_eq!(
        surface.focus().unlocked(),
        Some(Focus::new(surface.id(), path(&[1, 2])))
    );
}

#[test]
fn group_claims_hits_on_plain_children() {
    let h = Harness::new();
    let surface = h.surface();
    let group = h.group(&surface, 2);
    let pointer = h.mouse();

    // Element 3 is not highlight-capable; the group answers for it.
    h.move_to(&pointer, &surface, &[1, 2, 3]);
    assert!(group.is_activated());
    assert_eq!(
        surface.focus().unlocked(),
        Some(Focus::new(surface.id(), path(&[1, 2])))
    );
}

#[test]
fn group_defers_to_capable_child() {
    let h = Harness::new();
    let surface = h.surface();
    let group = h.group(&surface, 2);
    let child = h.element(&surface, 3);
    let pointer = h.mouse();

    h.move_to(&pointer, &surface, &[1, 2, 3]);
    assert!(child.is_activated());
    assert!(!group.is_activated());
}

#[test]
fn sibling_switch_under_group_does_not_flicker() {
    let h = Harness::new();
    let surface = h.surface();
    let group = h.group(&surface, 2);
    let pointer = h.mouse();

    h.move_to(&pointer, &surface, &[1, 2, 3]);
    assert!(group.is_activated());

    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    surface.focus().unlocked_signal().subscribe(move |_, _| {
        counter.set(counter.get() + 1);
    });

    // Crossing between two plain children of the group keeps the group's
    // focus without a clear/re-set cycle.
    h.move_to(&pointer, &surface, &[1, 2, 4]);
    assert_eq!(changes.get(), 0);
    assert!(group.is_activated());
}

#[test]
fn any_member_surface_can_activate() {
    let h = Harness::new();
    let first = h.surface();
    let second = h.surface();
    let node = h.element(&first, 5);
    node.on_display_added(&second);
    let pointer = h.mouse();

    h.move_to(&pointer, &second, &[1, 5]);
    assert!(node.is_activated());

    h.move_to(&pointer, &second, &[]);
    assert!(!node.is_activated());
}

#[test]
fn repeated_display_instances_share_one_membership() {
    let h = Harness::new();
    let surface = h.surface();
    let node = h.element(&surface, 4);
    node.on_display_added(&surface);
    assert_eq!(node.surface_count(), 1);

    // First removal drops an instance, not the membership.
    node.on_display_removed(surface.id());
    assert_eq!(node.surface_count(), 1);
    let pointer = h.mouse();
    h.move_to(&pointer, &surface, &[4]);
    assert!(node.is_activated());

    // Last removal unwires the surface entirely.
    node.on_display_removed(surface.id());
    assert_eq!(node.surface_count(), 0);
    assert!(!node.is_activated());
    surface
        .focus()
        .set_unlocked(Some(Focus::new(surface.id(), path(&[4]))));
    assert!(!node.is_activated());
}

#[test]
fn events_for_foreign_surfaces_are_ignored() {
    let h = Harness::new();
    let member = h.surface();
    let foreign = h.surface();
    let node = h.element(&member, 6);
    let pointer = h.mouse();

    h.move_to(&pointer, &foreign, &[1, 6]);
    assert!(!node.is_activated());
    assert_eq!(foreign.focus().unlocked(), None);
}
