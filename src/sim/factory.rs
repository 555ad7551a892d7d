//! Block construction
//!
//! Builds the bodies (and, for jelly blocks, the internal springs) of one
//! block and registers them with the physics world.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::block::{Block, JellyBlock, SimpleBlock};
use crate::colors::PALETTE;
use crate::consts::*;
use crate::physics::{Anchor, BodyDesc, BodyMaterial, PhysicsError, PhysicsWorld, SpringDesc};
use crate::settings::Variant;

/// Rigid square blocks
pub const SIMPLE_MATERIAL: BodyMaterial = BodyMaterial {
    density: 0.001,
    friction: 0.8,
    restitution: 0.1,
    air_friction: 0.01,
};

/// Jelly segments: slipperier and a little bouncier
pub const JELLY_MATERIAL: BodyMaterial = BodyMaterial {
    density: 0.001,
    friction: 0.5,
    restitution: 0.2,
    air_friction: 0.02,
};

/// Builds blocks of one variant with seeded random colors
#[derive(Debug, Clone)]
pub struct BlockFactory {
    variant: Variant,
    rng: Pcg32,
}

impl BlockFactory {
    pub fn new(variant: Variant, seed: u64) -> Self {
        Self {
            variant,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Uniformly random palette entry
    pub fn pick_fill(&mut self) -> [f32; 4] {
        PALETTE[self.rng.random_range(0..PALETTE.len())]
    }

    /// Build one block centred at `center`
    ///
    /// `size` is the full block size (square side for simple blocks, total
    /// strip size for jelly). `linked` marks jelly blocks as already part of
    /// the tower.
    pub fn build<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        center: Vec2,
        size: Vec2,
        linked: bool,
    ) -> Result<Block, PhysicsError> {
        let fill = self.pick_fill();
        Ok(match self.variant {
            Variant::Simple => Block::Simple(build_simple(world, center, size.x, fill)),
            Variant::Jelly => Block::Jelly(build_jelly(world, center, size, fill, linked)?),
        })
    }
}

/// One square dynamic body
pub fn build_simple<W: PhysicsWorld>(
    world: &mut W,
    center: Vec2,
    side: f32,
    fill: [f32; 4],
) -> SimpleBlock {
    let body = world.add_body(&BodyDesc::dynamic_rect(
        center,
        Vec2::splat(side),
        SIMPLE_MATERIAL,
        fill,
    ));
    SimpleBlock { body, fill }
}

/// Five equal segments spanning `size`, springs between neighbours and a
/// soft vertical stabilizer per segment
pub fn build_jelly<W: PhysicsWorld>(
    world: &mut W,
    center: Vec2,
    size: Vec2,
    fill: [f32; 4],
    linked: bool,
) -> Result<JellyBlock, PhysicsError> {
    let segment_width = size.x / JELLY_SEGMENTS as f32;
    let segment_size = Vec2::new(segment_width, size.y);
    let left = center.x - size.x / 2.0;

    let segments = std::array::from_fn(|i| {
        let seg_center = Vec2::new(left + segment_width * (i as f32 + 0.5), center.y);
        world.add_body(&BodyDesc::dynamic_rect(
            seg_center,
            segment_size,
            JELLY_MATERIAL,
            fill,
        ))
    });

    let mut constraints = Vec::with_capacity(2 * JELLY_SEGMENTS - 1);
    let half = segment_width / 2.0;

    // Facing edges of neighbours pulled together
    for pair in segments.windows(2) {
        constraints.push(world.add_spring(&SpringDesc {
            body: pair[0],
            offset: Vec2::new(half, 0.0),
            anchor: Anchor::Body {
                body: pair[1],
                offset: Vec2::new(-half, 0.0),
            },
            stiffness: SEGMENT_STIFFNESS,
            damping: SEGMENT_DAMPING,
            rest_length: 0.0,
        })?);
    }

    for (i, &segment) in segments.iter().enumerate() {
        let seg_center = Vec2::new(left + segment_width * (i as f32 + 0.5), center.y);
        constraints.push(world.add_spring(&SpringDesc {
            body: segment,
            offset: Vec2::ZERO,
            anchor: Anchor::Point(seg_center - Vec2::new(0.0, size.y)),
            stiffness: STABILIZER_STIFFNESS,
            damping: STABILIZER_DAMPING,
            rest_length: size.y,
        })?);
    }

    Ok(JellyBlock {
        segments,
        constraints,
        fill,
        height: size.y,
        is_linked: linked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierWorld;

    fn jelly_size() -> Vec2 {
        Vec2::new(JELLY_WIDTH, JELLY_HEIGHT)
    }

    #[test]
    fn test_simple_block_is_one_square() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let block = build_simple(&mut world, Vec2::new(120.0, 50.0), 64.0, PALETTE[0]);

        assert_eq!(world.body_count(), 1);
        let snap = world.body_snapshot(block.body).unwrap();
        assert_eq!(snap.center, Vec2::new(120.0, 50.0));
        assert_eq!(snap.half_extents, Vec2::splat(32.0));
        assert_eq!(snap.fill, PALETTE[0]);
    }

    #[test]
    fn test_jelly_block_segments_span_width() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let block =
            build_jelly(&mut world, Vec2::new(200.0, 50.0), jelly_size(), PALETTE[2], false)
                .unwrap();

        assert_eq!(world.body_count(), JELLY_SEGMENTS);
        // 4 neighbour springs + 5 stabilizers
        assert_eq!(block.constraints.len(), 9);
        assert_eq!(world.constraint_count(), 9);
        assert!(!block.is_linked);

        let xs: Vec<f32> = block
            .segments
            .iter()
            .map(|&s| world.body_position(s).unwrap().x)
            .collect();
        assert_eq!(xs, vec![160.0, 180.0, 200.0, 220.0, 240.0]);

        for &s in &block.segments {
            let snap = world.body_snapshot(s).unwrap();
            assert_eq!(snap.half_extents, Vec2::new(10.0, 15.0));
            assert_eq!(snap.fill, PALETTE[2]);
        }
    }

    #[test]
    fn test_jelly_neighbour_springs_start_relaxed() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let block =
            build_jelly(&mut world, Vec2::new(0.0, 0.0), jelly_size(), PALETTE[1], true).unwrap();

        for &c in &block.constraints[..JELLY_SEGMENTS - 1] {
            let (a, b) = world.constraint_endpoints(c).unwrap();
            assert!((a - b).length() < 1e-3, "edges should touch: {a} vs {b}");
        }
        // Stabilizers hang from one block height above each segment
        for (&c, &s) in block.constraints[JELLY_SEGMENTS - 1..]
            .iter()
            .zip(block.segments.iter())
        {
            let (a, b) = world.constraint_endpoints(c).unwrap();
            assert_eq!(a, world.body_position(s).unwrap());
            assert!((a.y - b.y - JELLY_HEIGHT).abs() < 1e-3);
        }
    }

    #[test]
    fn test_factory_colors_come_from_palette() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let mut factory = BlockFactory::new(Variant::Simple, 7);

        for i in 0..32 {
            let block = factory
                .build(&mut world, Vec2::new(i as f32 * 50.0, 0.0), Vec2::splat(40.0), false)
                .unwrap();
            assert!(PALETTE.contains(&block.fill()));
        }
        assert_eq!(world.body_count(), 32);
    }

    #[test]
    fn test_factory_is_deterministic_per_seed() {
        let mut a = BlockFactory::new(Variant::Jelly, 42);
        let mut b = BlockFactory::new(Variant::Jelly, 42);
        for _ in 0..16 {
            assert_eq!(a.pick_fill(), b.pick_fill());
        }
    }
}
