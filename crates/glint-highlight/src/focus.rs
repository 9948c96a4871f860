//! Focus values and the per-surface focus store.

use glint_core::{ElementPath, Signal, SurfaceId};

/// A focus value: a surface plus the root-to-leaf path of the focused
/// element on that surface.
///
/// Value type. Cloning yields a path independent of later structural
/// changes, which is what the lock invariant relies on.
#[derive(Clone, Debug, PartialEq)]
pub struct Focus {
    pub surface: SurfaceId,
    pub path: ElementPath,
}

impl Focus {
    pub fn new(surface: SurfaceId, path: ElementPath) -> Self {
        Self { surface, path }
    }

    /// Whether this focus targets `element`, i.e. the path's leaf is it.
    pub fn targets(&self, element: glint_core::ElementId) -> bool {
        self.path.leaf() == Some(element)
    }
}

/// Per-surface holder of the unlocked and locked focus slots.
///
/// State machine: `Unlocked` (locked slot empty) and `Locked`. Locking
/// snapshots the unlocked value; unlocking — whether from up, cancel,
/// interrupt, or an unrelated external actor clearing the slot — always
/// flows through the locked signal's change notification, so every
/// release path converges on the same observers.
#[derive(Default)]
pub struct SurfaceFocusStore {
    unlocked: Signal<Option<Focus>>,
    locked: Signal<Option<Focus>>,
}

impl SurfaceFocusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlocked(&self) -> Option<Focus> {
        self.unlocked.get()
    }

    pub fn locked(&self) -> Option<Focus> {
        self.locked.get()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get().is_some()
    }

    /// Continuous update as pointers move.
    pub fn set_unlocked(&self, focus: Option<Focus>) {
        self.unlocked.set(focus);
    }

    /// `Unlocked → Locked`. Snapshots the current unlocked focus into the
    /// locked slot. Returns false without effect when there is nothing to
    /// lock or when another pointer already holds the lock (the multitouch
    /// guard: a second down is a silent no-op, never an error).
    pub fn lock(&self) -> bool {
        if self.locked.get().is_some() {
            return false;
        }
        let Some(focus) = self.unlocked.get() else {
            return false;
        };
        log::debug!("surface {:?}: focus locked on {:?}", focus.surface, focus.path.leaf());
        self.locked.set(Some(focus));
        true
    }

    /// `Locked → Unlocked`. Safe to call when already unlocked.
    pub fn unlock(&self) {
        self.locked.set(None);
    }

    /// External actors clearing the lock go through the same signal, so
    /// one-shot lock-cleared observers fire exactly as for a clean unlock.
    pub fn set_locked(&self, focus: Option<Focus>) {
        self.locked.set(focus);
    }

    pub fn unlocked_signal(&self) -> &Signal<Option<Focus>> {
        &self.unlocked
    }

    pub fn locked_signal(&self) -> &Signal<Option<Focus>> {
        &self.locked
    }
}
