//! Rapier2D adapter for [`PhysicsWorld`]
//!
//! Canvas pixels are used directly as world units with y pointing down, so
//! gravity is a positive y acceleration.

use glam::Vec2;
use rapier2d::prelude::*;

use super::{
    Anchor, BodyDesc, BodyHandle, BodyKind, BodySnapshot, ConstraintHandle, PhysicsError,
    PhysicsWorld, SpringDesc,
};
use crate::consts::{AIR_FRICTION_RATE, LENGTH_UNIT, SPRING_DAMPING_SCALE, SPRING_STIFFNESS_SCALE};

fn to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn to_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn from_point(p: &nalgebra::Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Per-step velocity fraction lost to air → Rapier linear damping (1/s)
fn linear_damping(air_friction: f32) -> f32 {
    -(1.0 - air_friction.clamp(0.0, 0.99)).ln() * AIR_FRICTION_RATE
}

/// Engine handles plus render data for one registered body
#[derive(Debug, Clone, Copy)]
struct BodyEntry {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    kind: BodyKind,
    fill: [f32; 4],
}

/// Rapier-backed physics world
pub struct RapierWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Collider-less fixed body at the origin; point springs attach here
    world_anchor: RigidBodyHandle,
    entries: Vec<BodyEntry>,
    joints: Vec<ImpulseJointHandle>,
}

impl RapierWorld {
    /// Create an empty world with the given gravity (pixels/s², y down)
    pub fn new(gravity: Vec2) -> Self {
        let mut rigid_bodies = RigidBodySet::new();
        let world_anchor = rigid_bodies.insert(RigidBodyBuilder::fixed().build());

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.length_unit = LENGTH_UNIT;

        Self {
            gravity: to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies,
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            world_anchor,
            entries: Vec::new(),
            joints: Vec::new(),
        }
    }

    fn entry(&self, handle: BodyHandle) -> Result<&BodyEntry, PhysicsError> {
        self.entries
            .get(handle.0)
            .ok_or(PhysicsError::UnknownBody(handle))
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let rb = builder
            .translation(to_na(desc.center))
            .linear_damping(linear_damping(desc.material.air_friction))
            .build();
        let body = self.rigid_bodies.insert(rb);

        let half = desc.size * 0.5;
        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .density(desc.material.density)
            .friction(desc.material.friction)
            .restitution(desc.material.restitution)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);

        let handle = BodyHandle(self.entries.len());
        self.entries.push(BodyEntry {
            body,
            collider,
            kind: desc.kind,
            fill: desc.fill,
        });
        handle
    }

    fn add_spring(&mut self, desc: &SpringDesc) -> Result<ConstraintHandle, PhysicsError> {
        let body1 = self.entry(desc.body)?.body;
        let (body2, local_anchor2) = match desc.anchor {
            Anchor::Body { body, offset } => (self.entry(body)?.body, offset),
            Anchor::Point(point) => (self.world_anchor, point),
        };

        let joint = SpringJointBuilder::new(
            desc.rest_length,
            desc.stiffness * SPRING_STIFFNESS_SCALE,
            desc.damping * SPRING_DAMPING_SCALE,
        )
        .local_anchor1(to_point(desc.offset))
        .local_anchor2(to_point(local_anchor2))
        .build();
        let joint = self.impulse_joints.insert(body1, body2, joint, true);

        let handle = ConstraintHandle(self.joints.len());
        self.joints.push(joint);
        Ok(handle)
    }

    fn reshape_static(
        &mut self,
        handle: BodyHandle,
        center: Vec2,
        size: Vec2,
    ) -> Result<(), PhysicsError> {
        let entry = *self.entry(handle)?;
        if entry.kind != BodyKind::Static {
            return Err(PhysicsError::NotStatic(handle));
        }

        let rb = self
            .rigid_bodies
            .get_mut(entry.body)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        rb.set_translation(to_na(center), true);

        let collider = self
            .colliders
            .get_mut(entry.collider)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        let half = size * 0.5;
        collider.set_shape(SharedShape::cuboid(half.x, half.y));
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn body_position(&self, handle: BodyHandle) -> Option<Vec2> {
        let entry = self.entries.get(handle.0)?;
        let rb = self.rigid_bodies.get(entry.body)?;
        let t = rb.translation();
        Some(Vec2::new(t.x, t.y))
    }

    fn body_snapshot(&self, handle: BodyHandle) -> Option<BodySnapshot> {
        let entry = self.entries.get(handle.0)?;
        let rb = self.rigid_bodies.get(entry.body)?;
        let cuboid = self.colliders.get(entry.collider)?.shape().as_cuboid()?;
        let t = rb.translation();

        Some(BodySnapshot {
            handle,
            kind: entry.kind,
            center: Vec2::new(t.x, t.y),
            rotation: rb.rotation().angle(),
            half_extents: Vec2::new(cuboid.half_extents.x, cuboid.half_extents.y),
            fill: entry.fill,
        })
    }

    fn constraint_endpoints(&self, handle: ConstraintHandle) -> Option<(Vec2, Vec2)> {
        let joint = self.impulse_joints.get(*self.joints.get(handle.0)?)?;
        let rb1 = self.rigid_bodies.get(joint.body1)?;
        let rb2 = self.rigid_bodies.get(joint.body2)?;
        let a = rb1.position() * joint.data.local_anchor1();
        let b = rb2.position() * joint.data.local_anchor2();
        Some((from_point(&a), from_point(&b)))
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }

    fn constraint_count(&self) -> usize {
        self.joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::BodyMaterial;

    const DT: f32 = 1.0 / 60.0;

    fn box_desc(center: Vec2) -> BodyDesc {
        BodyDesc::dynamic_rect(
            center,
            Vec2::splat(40.0),
            BodyMaterial::default(),
            [1.0; 4],
        )
    }

    #[test]
    fn test_add_body_registers_in_order() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let a = world.add_body(&box_desc(Vec2::new(10.0, 20.0)));
        let b = world.add_body(&box_desc(Vec2::new(30.0, 40.0)));

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(world.body_count(), 2);
        assert_eq!(world.body_position(b), Some(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn test_air_friction_scaled_to_per_second_damping() {
        assert_eq!(linear_damping(0.0), 0.0);
        // 1% per step at 60 Hz
        assert!((linear_damping(0.01) - 0.603).abs() < 1e-3);

        let mut world = RapierWorld::new(Vec2::ZERO);
        let mut desc = box_desc(Vec2::ZERO);
        desc.material.air_friction = 0.02;
        let handle = world.add_body(&desc);

        let rb = &world.rigid_bodies[world.entries[handle.index()].body];
        assert!((rb.linear_damping() - 1.212).abs() < 1e-2);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut world = RapierWorld::new(Vec2::new(0.0, 980.0));
        let body = world.add_body(&box_desc(Vec2::new(100.0, 100.0)));

        for _ in 0..10 {
            world.step(DT);
        }

        let pos = world.body_position(body).unwrap();
        assert!(pos.y > 100.0, "body should fall, got y={}", pos.y);
    }

    #[test]
    fn test_reshape_static_moves_and_resizes() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let ground = world.add_body(&BodyDesc::static_rect(
            Vec2::new(50.0, 90.0),
            Vec2::new(100.0, 20.0),
            [0.5; 4],
        ));

        world
            .reshape_static(ground, Vec2::new(200.0, 390.0), Vec2::new(400.0, 20.0))
            .unwrap();

        let snap = world.body_snapshot(ground).unwrap();
        assert_eq!(snap.center, Vec2::new(200.0, 390.0));
        assert_eq!(snap.half_extents, Vec2::new(200.0, 10.0));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_reshape_rejects_dynamic_body() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let body = world.add_body(&box_desc(Vec2::ZERO));

        let err = world
            .reshape_static(body, Vec2::ONE, Vec2::ONE)
            .unwrap_err();
        assert_eq!(err, PhysicsError::NotStatic(body));
    }

    #[test]
    fn test_spring_to_unknown_body_fails() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let body = world.add_body(&box_desc(Vec2::ZERO));

        let result = world.add_spring(&SpringDesc {
            body,
            offset: Vec2::ZERO,
            anchor: Anchor::Body {
                body: BodyHandle(7),
                offset: Vec2::ZERO,
            },
            stiffness: 0.5,
            damping: 0.1,
            rest_length: 0.0,
        });
        assert_eq!(result, Err(PhysicsError::UnknownBody(BodyHandle(7))));
        assert_eq!(world.constraint_count(), 0);
    }

    #[test]
    fn test_point_spring_endpoints() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let body = world.add_body(&box_desc(Vec2::new(100.0, 100.0)));

        let spring = world
            .add_spring(&SpringDesc {
                body,
                offset: Vec2::new(5.0, 0.0),
                anchor: Anchor::Point(Vec2::new(100.0, 50.0)),
                stiffness: 0.1,
                damping: 0.1,
                rest_length: 50.0,
            })
            .unwrap();

        let (a, b) = world.constraint_endpoints(spring).unwrap();
        assert!((a - Vec2::new(105.0, 100.0)).length() < 1e-3);
        assert!((b - Vec2::new(100.0, 50.0)).length() < 1e-3);
        assert_eq!(world.constraint_segments().len(), 1);
    }
}
