//! Viewport tracking and boundary layout
//!
//! The canvas fills the window below a fixed header. On every resize the
//! derived block size is recomputed and the ground and walls are moved to
//! the new edges; they are reshaped in place, never recreated.

use glam::Vec2;

use crate::colors::BOUNDARY;
use crate::consts::*;
use crate::physics::{BodyDesc, BodyHandle, PhysicsError, PhysicsWorld};
use crate::settings::Variant;

/// Current canvas size and the block size derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    /// Full size of a newly created block
    pub block_size: Vec2,
    variant: Variant,
}

impl ViewportState {
    /// Measure from the window size (the header is subtracted)
    pub fn from_window(window_width: f32, window_height: f32, variant: Variant) -> Self {
        let mut state = Self {
            width: 0.0,
            height: 0.0,
            block_size: Vec2::ZERO,
            variant,
        };
        state.resize(window_width, window_height);
        state
    }

    /// Recompute dimensions and block size for a new window size
    pub fn resize(&mut self, window_width: f32, window_height: f32) {
        self.width = window_width.max(1.0);
        self.height = (window_height - HEADER_HEIGHT).max(1.0);
        self.block_size = match self.variant {
            Variant::Simple => Vec2::splat(simple_block_size(self.width)),
            Variant::Jelly => Vec2::new(JELLY_WIDTH, JELLY_HEIGHT),
        };
    }

    /// y of the ground's top surface
    pub fn ground_top(&self) -> f32 {
        self.height - BOUNDARY_THICKNESS
    }
}

/// Square side that fits `BLOCK_COLUMNS` across 80% of the width
pub fn simple_block_size(width: f32) -> f32 {
    (width * BLOCK_WIDTH_FRACTION / BLOCK_COLUMNS).clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)
}

/// Centre and full size of an axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

/// Where the three boundaries belong for a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryLayout {
    pub ground: Rect,
    pub left_wall: Rect,
    pub right_wall: Rect,
}

impl BoundaryLayout {
    pub fn for_viewport(vp: &ViewportState) -> Self {
        let t = BOUNDARY_THICKNESS;
        let half = t / 2.0;
        Self {
            ground: Rect {
                center: Vec2::new(vp.width / 2.0, vp.height - half),
                size: Vec2::new(vp.width, t),
            },
            left_wall: Rect {
                center: Vec2::new(half, vp.height / 2.0),
                size: Vec2::new(t, vp.height),
            },
            right_wall: Rect {
                center: Vec2::new(vp.width - half, vp.height / 2.0),
                size: Vec2::new(t, vp.height),
            },
        }
    }

    fn rects(&self) -> [Rect; 3] {
        [self.ground, self.left_wall, self.right_wall]
    }
}

/// Static ground and wall bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    pub ground: BodyHandle,
    pub left_wall: BodyHandle,
    pub right_wall: BodyHandle,
}

impl Boundaries {
    /// Create the three static bodies for the current viewport
    pub fn create<W: PhysicsWorld>(world: &mut W, vp: &ViewportState) -> Self {
        let layout = BoundaryLayout::for_viewport(vp);
        let [ground, left_wall, right_wall] = layout
            .rects()
            .map(|r| world.add_body(&BodyDesc::static_rect(r.center, r.size, BOUNDARY)));
        Self {
            ground,
            left_wall,
            right_wall,
        }
    }

    /// Move the existing bodies to match the viewport
    pub fn reposition<W: PhysicsWorld>(
        &self,
        world: &mut W,
        vp: &ViewportState,
    ) -> Result<(), PhysicsError> {
        let layout = BoundaryLayout::for_viewport(vp);
        for (handle, rect) in self.handles().into_iter().zip(layout.rects()) {
            world.reshape_static(handle, rect.center, rect.size)?;
        }
        Ok(())
    }

    pub fn handles(&self) -> [BodyHandle; 3] {
        [self.ground, self.left_wall, self.right_wall]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierWorld;

    #[test]
    fn test_simple_block_size_clamped() {
        assert_eq!(simple_block_size(300.0), 40.0);
        assert_eq!(simple_block_size(750.0), 60.0);
        assert_eq!(simple_block_size(2000.0), 80.0);
    }

    #[test]
    fn test_viewport_subtracts_header() {
        let vp = ViewportState::from_window(800.0, 660.0, Variant::Simple);
        assert_eq!(vp.width, 800.0);
        assert_eq!(vp.height, 600.0);
        assert_eq!(vp.block_size, Vec2::splat(64.0));
        assert_eq!(vp.ground_top(), 580.0);
    }

    #[test]
    fn test_jelly_block_size_is_fixed() {
        let mut vp = ViewportState::from_window(400.0, 500.0, Variant::Jelly);
        assert_eq!(vp.block_size, Vec2::new(JELLY_WIDTH, JELLY_HEIGHT));
        vp.resize(1600.0, 900.0);
        assert_eq!(vp.block_size, Vec2::new(JELLY_WIDTH, JELLY_HEIGHT));
    }

    #[test]
    fn test_degenerate_window_stays_positive() {
        let vp = ViewportState::from_window(0.0, 10.0, Variant::Simple);
        assert_eq!(vp.width, 1.0);
        assert_eq!(vp.height, 1.0);
    }

    #[test]
    fn test_layout_edges() {
        let vp = ViewportState::from_window(800.0, 660.0, Variant::Simple);
        let layout = BoundaryLayout::for_viewport(&vp);
        assert_eq!(layout.ground.center, Vec2::new(400.0, 590.0));
        assert_eq!(layout.ground.size, Vec2::new(800.0, 20.0));
        assert_eq!(layout.left_wall.center.x, 10.0);
        assert_eq!(layout.right_wall.center.x, 790.0);
        assert_eq!(layout.right_wall.size.y, 600.0);
    }

    #[test]
    fn test_reposition_reuses_bodies() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let mut vp = ViewportState::from_window(800.0, 660.0, Variant::Jelly);
        let boundaries = Boundaries::create(&mut world, &vp);
        assert_eq!(world.body_count(), 3);

        vp.resize(390.0, 904.0);
        boundaries.reposition(&mut world, &vp).unwrap();
        assert_eq!(world.body_count(), 3);

        let ground = world.body_snapshot(boundaries.ground).unwrap();
        assert_eq!(ground.center, Vec2::new(195.0, 834.0));
        assert_eq!(ground.half_extents, Vec2::new(195.0, 10.0));
        let right = world.body_snapshot(boundaries.right_wall).unwrap();
        assert_eq!(right.center, Vec2::new(380.0, 422.0));
    }
}
