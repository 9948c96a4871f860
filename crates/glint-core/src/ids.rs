//! Identifier newtypes for elements, surfaces, and pointers.

/// Identifies one element in a host scene graph.
///
/// Glint never inspects scene structure itself; ids arrive in precomputed
/// hit paths and are only compared and hashed.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Identifies one independently rendered surface (render root).
///
/// Allocated by the surface registry at composition time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Identifies one physical input contact: a mouse, a touch point, a pen,
/// or a synthesized keyboard-drag pointer.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(u64);

impl PointerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}
