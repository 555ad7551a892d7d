//! Scene tessellation: physics world → triangle list

use super::shapes;
use super::vertex::Vertex;
use crate::colors::CONSTRAINT;
use crate::physics::PhysicsWorld;

/// Width of drawn constraint lines (pixels)
const CONSTRAINT_WIDTH: f32 = 1.5;

/// Every body as a filled quad, optionally overlaid with constraint lines
pub fn build_scene<W: PhysicsWorld>(world: &W, show_constraints: bool) -> Vec<Vertex> {
    let snapshots = world.snapshots();
    let mut vertices = Vec::with_capacity(snapshots.len() * 6);

    for body in &snapshots {
        shapes::rotated_rect(
            body.center,
            body.half_extents,
            body.rotation,
            body.fill,
            &mut vertices,
        );
    }

    if show_constraints {
        for (a, b) in world.constraint_segments() {
            shapes::line(a, b, CONSTRAINT_WIDTH, CONSTRAINT, &mut vertices);
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::JELLY_SEGMENTS;
    use crate::physics::RapierWorld;
    use crate::settings::{Settings, Variant};
    use crate::sim::GameSession;
    use glam::Vec2;

    #[test]
    fn test_scene_has_quad_per_body() {
        let mut s = GameSession::with_world(
            RapierWorld::new(Vec2::ZERO),
            Settings::for_variant(Variant::Simple),
            1,
            800.0,
            660.0,
        );
        s.init().unwrap();

        let vertices = build_scene(s.world(), true);
        assert_eq!(vertices.len(), s.world().body_count() * 6);

        // Empty world draws nothing
        assert!(build_scene(&RapierWorld::new(Vec2::ZERO), true).is_empty());
    }

    #[test]
    fn test_constraints_drawn_on_request() {
        let mut s = GameSession::new(Settings::for_variant(Variant::Jelly), 1, 800.0, 660.0);
        s.create_block(Vec2::new(400.0, 100.0), 0.0).unwrap();

        let bodies = s.world().body_count();
        let constraints = s.world().constraint_count();
        assert_eq!(build_scene(s.world(), false).len(), bodies * 6);
        // Neighbour springs have zero length and are skipped
        let visible_constraints = constraints - (JELLY_SEGMENTS - 1);
        assert_eq!(
            build_scene(s.world(), true).len(),
            (bodies + visible_constraints) * 6
        );
    }
}
