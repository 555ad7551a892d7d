//! Property tests over the public session API

use glam::Vec2;
use proptest::prelude::*;

use jelly_tower::consts::{BOUNDARY_THICKNESS, HEADER_HEIGHT, JELLY_SEGMENTS};
use jelly_tower::physics::PhysicsWorld;
use jelly_tower::sim::{GameSession, TapEvent};
use jelly_tower::{Settings, Variant};

const EPS: f32 = 1e-3;

fn arb_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![Just(Variant::Simple), Just(Variant::Jelly)]
}

fn arb_window() -> impl Strategy<Value = (f32, f32)> {
    (200.0..2000.0_f32, 200.0..1400.0_f32)
}

fn session(variant: Variant, seed: u64) -> GameSession {
    GameSession::new(Settings::for_variant(variant), seed, 800.0, 660.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn create_block_adds_one_block(
        variant in arb_variant(),
        seed in any::<u64>(),
        x in 60.0..740.0_f32,
        y in 0.0..400.0_f32,
    ) {
        let mut s = session(variant, seed);
        let count = s.block_count();
        let bodies = s.world().body_count();

        s.create_block(Vec2::new(x, y), 0.0).unwrap();

        prop_assert_eq!(s.block_count(), count + 1);
        let per_block = match variant {
            Variant::Simple => 1,
            Variant::Jelly => JELLY_SEGMENTS,
        };
        prop_assert_eq!(s.world().body_count(), bodies + per_block);
    }

    #[test]
    fn boundaries_track_latest_resize(
        variant in arb_variant(),
        sizes in prop::collection::vec(arb_window(), 1..6),
    ) {
        let mut s = session(variant, 1);
        for &(w, h) in &sizes {
            s.handle_resize(w, h).unwrap();
        }

        let (w, h) = *sizes.last().unwrap();
        let height = h - HEADER_HEIGHT;
        let half = BOUNDARY_THICKNESS / 2.0;
        let b = s.boundaries();
        let ground = s.world().body_position(b.ground).unwrap();
        let left = s.world().body_position(b.left_wall).unwrap();
        let right = s.world().body_position(b.right_wall).unwrap();

        prop_assert!((ground - Vec2::new(w / 2.0, height - half)).length() < EPS);
        prop_assert!((left.x - half).abs() < EPS);
        prop_assert!((right.x - (w - half)).abs() < EPS);

        let ground_snap = s.world().body_snapshot(b.ground).unwrap();
        prop_assert!((ground_snap.half_extents.x - w / 2.0).abs() < EPS);
    }

    #[test]
    fn taps_within_cooldown_drop_once(
        variant in arb_variant(),
        gap in 0.0..1.0_f64,
        x1 in 60.0..740.0_f32,
        x2 in 60.0..740.0_f32,
    ) {
        let mut s = session(variant, 7);
        let start = s.block_count();
        let cooldown = variant.cooldown_ms();

        let first = s.handle_tap(&TapEvent::Pointer { pos: Vec2::new(x1, 0.0) }, 1000.0).unwrap();
        let second = s
            .handle_tap(&TapEvent::Pointer { pos: Vec2::new(x2, 0.0) }, 1000.0 + gap * (cooldown - 1.0))
            .unwrap();

        prop_assert!(first.is_some());
        prop_assert!(second.is_none());
        prop_assert_eq!(s.block_count(), start + 1);

        let third = s
            .handle_tap(&TapEvent::Pointer { pos: Vec2::new(x2, 0.0) }, 1000.0 + cooldown)
            .unwrap();
        prop_assert!(third.is_some());
    }
}
