//! Core building blocks for Glint: identifiers, geometry, root-to-leaf
//! element paths, and the `Signal` observable primitive.
//!
//! Everything here is single-threaded by design. Dispatch in Glint is
//! synchronous and cooperative, so shared state uses `Rc`/`RefCell`/`Cell`
//! rather than locks.

pub mod geometry;
pub mod ids;
pub mod path;
pub mod signal;

pub use geometry::Point;
pub use ids::{ElementId, PointerId, SurfaceId};
pub use path::ElementPath;
pub use signal::{Signal, Subscription};
