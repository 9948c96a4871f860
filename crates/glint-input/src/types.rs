//! Pointer kinds, intents, and the event payload delivered to listeners.

use crate::pointer::PointerHandle;
use glint_core::{ElementPath, Point, SurfaceId};

/// The modality behind a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    /// One touch contact; several may be live at once.
    Touch,
    Pen,
    /// Synthesized pointer driving keyboard-initiated drags. Terminates on
    /// key release or focus blur instead of a pointer-up.
    Keyboard,
}

/// Transient behavior tag held by a pointer, signalling upcoming drag-like
/// behavior to other listeners in the dispatch chain.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Drag = 0,
    KeyboardDrag = 1,
}

/// Bitset of [`Intent`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntentSet(u8);

impl IntentSet {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, intent: Intent) -> Self {
        self.insert(intent);
        self
    }

    pub fn insert(&mut self, intent: Intent) {
        self.0 |= 1 << (intent as u8);
    }

    pub fn remove(&mut self, intent: Intent) {
        self.0 &= !(1 << (intent as u8));
    }

    pub fn contains(&self, intent: Intent) -> bool {
        (self.0 & (1 << (intent as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for IntentSet {
    fn default() -> Self {
        Self::NONE
    }
}

/// Event payload handed to listeners.
///
/// Carries the pointer, the surface the event belongs to, the pointer's
/// location, and the precomputed root-to-leaf hit path. For `exit` events
/// the path is the path being exited; for everything else it is the
/// current hit path.
#[derive(Clone)]
pub struct InputEvent {
    pub pointer: PointerHandle,
    pub surface: SurfaceId,
    pub point: Point,
    pub path: ElementPath,
}

impl InputEvent {
    pub fn new(
        pointer: PointerHandle,
        surface: SurfaceId,
        point: Point,
        path: ElementPath,
    ) -> Self {
        Self {
            pointer,
            surface,
            point,
            path,
        }
    }
}
