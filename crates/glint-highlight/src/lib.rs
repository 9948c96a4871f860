//! Interactive-highlight focus arbitration for Glint.
//!
//! Each surface carries a focus store with two slots: an *unlocked* focus
//! that trails the pointer continuously, and a *locked* focus frozen at
//! press time so a highlight stays put while the pointer drifts during a
//! drag. [`Highlightable`] elements register input listeners with the
//! router, drive the stores from enter/over/move/exit/down events, and
//! expose an observable activation flag.
//!
//! All registration is explicit: hosts create surfaces through the
//! [`SurfaceRegistry`] and wire highlightables to the router at
//! composition time. There are no module-load side effects.

pub mod focus;
pub mod highlightable;
pub mod support;
pub mod surface;

#[cfg(test)]
mod tests;

pub use focus::{Focus, SurfaceFocusStore};
pub use highlightable::Highlightable;
pub use support::HighlightSupport;
pub use surface::{Surface, SurfaceRegistry};
