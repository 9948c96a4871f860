//! Pointer-input routing for Glint.
//!
//! One [`Pointer`] exists per physical input contact. Each pointer carries
//! an ordered listener list and a single optional "attached" listener: the
//! one exclusive consumer of that pointer's input stream. The
//! [`InputRouter`] turns precomputed hit paths into enter/over/move/exit
//! and down/up/cancel dispatch; hit testing itself always happens in the
//! host.
//!
//! Dispatch is synchronous and single-threaded: every handler runs to
//! completion before the next event is processed, and listener lists are
//! iterated over defensive snapshots so handlers may remove themselves
//! mid-dispatch.

pub mod listener;
pub mod pointer;
pub mod reservation;
pub mod router;
pub mod types;

#[cfg(test)]
mod tests;

pub use listener::{InputListener, InputListenerBuilder};
pub use pointer::{Pointer, PointerHandle};
pub use reservation::{reserve_for_drag, reserve_for_keyboard_drag};
pub use router::InputRouter;
pub use types::{InputEvent, Intent, IntentSet, PointerKind};
