//! Physics world seam
//!
//! Everything the game needs from a rigid-body engine goes through
//! [`PhysicsWorld`]: creating rectangular bodies and springs, repositioning
//! static boundaries, stepping, and reading poses back for rendering.
//! The game never touches engine types directly.

pub mod rapier;

pub use rapier::RapierWorld;

use core::fmt;

use glam::Vec2;

/// Opaque handle to a body registered with a [`PhysicsWorld`]
///
/// Handles are issued in registration order and stay valid for the life of
/// the world (bodies are never removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// Registration index of this body
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Opaque handle to a spring constraint registered with a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub(crate) usize);

impl ConstraintHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Whether a body is simulated or held in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}

/// Physical surface/mass properties for a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    /// Mass per square pixel
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Velocity decay applied every step (linear damping)
    pub air_friction: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            density: 0.001,
            friction: 0.1,
            restitution: 0.0,
            air_friction: 0.01,
        }
    }
}

/// Description of an axis-aligned rectangular body before creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    /// Centre in canvas pixels (y down)
    pub center: Vec2,
    /// Full width/height in pixels
    pub size: Vec2,
    pub material: BodyMaterial,
    /// Render fill color (RGBA, 0-1)
    pub fill: [f32; 4],
}

impl BodyDesc {
    /// A simulated rectangle
    pub fn dynamic_rect(center: Vec2, size: Vec2, material: BodyMaterial, fill: [f32; 4]) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            center,
            size,
            material,
            fill,
        }
    }

    /// A fixed rectangle (ground, walls)
    pub fn static_rect(center: Vec2, size: Vec2, fill: [f32; 4]) -> Self {
        Self {
            kind: BodyKind::Static,
            center,
            size,
            material: BodyMaterial::default(),
            fill,
        }
    }
}

/// Second end of a spring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// A point on another body, as an offset from its centre
    Body { body: BodyHandle, offset: Vec2 },
    /// A fixed point in the world (canvas pixels)
    Point(Vec2),
}

/// Spring constraint description
///
/// `stiffness` and `damping` are dimensionless (0-1) and scaled by the
/// engine adapter into its own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringDesc {
    pub body: BodyHandle,
    /// Attachment point on `body`, relative to its centre
    pub offset: Vec2,
    pub anchor: Anchor,
    pub stiffness: f32,
    pub damping: f32,
    pub rest_length: f32,
}

/// Pose and look of one body, read back for rendering and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub handle: BodyHandle,
    pub kind: BodyKind,
    pub center: Vec2,
    pub rotation: f32,
    pub half_extents: Vec2,
    pub fill: [f32; 4],
}

/// Errors from misusing the physics seam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// The handle was not issued by this world
    UnknownBody(BodyHandle),
    /// Only static bodies may be reshaped in place
    NotStatic(BodyHandle),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::UnknownBody(h) => write!(f, "unknown body handle {}", h.0),
            PhysicsError::NotStatic(h) => write!(f, "body {} is not static", h.0),
        }
    }
}

impl std::error::Error for PhysicsError {}

/// The external rigid-body engine, as seen by the game
pub trait PhysicsWorld {
    /// Create and register a rectangular body
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Create and register a spring constraint
    fn add_spring(&mut self, desc: &SpringDesc) -> Result<ConstraintHandle, PhysicsError>;

    /// Move and resize a static body without recreating it
    fn reshape_static(
        &mut self,
        body: BodyHandle,
        center: Vec2,
        size: Vec2,
    ) -> Result<(), PhysicsError>;

    /// Advance the simulation by one fixed step of `dt` seconds
    fn step(&mut self, dt: f32);

    /// Current centre of a body
    fn body_position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Current pose, size and fill of a body
    fn body_snapshot(&self, body: BodyHandle) -> Option<BodySnapshot>;

    /// World-space endpoints of a spring
    fn constraint_endpoints(&self, constraint: ConstraintHandle) -> Option<(Vec2, Vec2)>;

    /// Number of registered bodies
    fn body_count(&self) -> usize;

    /// Number of registered constraints
    fn constraint_count(&self) -> usize;

    /// Snapshots of every registered body, in registration order
    fn snapshots(&self) -> Vec<BodySnapshot> {
        (0..self.body_count())
            .filter_map(|i| self.body_snapshot(BodyHandle(i)))
            .collect()
    }

    /// Endpoints of every registered constraint, in registration order
    fn constraint_segments(&self) -> Vec<(Vec2, Vec2)> {
        (0..self.constraint_count())
            .filter_map(|i| self.constraint_endpoints(ConstraintHandle(i)))
            .collect()
    }
}
