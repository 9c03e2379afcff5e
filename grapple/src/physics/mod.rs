pub mod util;

use std::collections::HashMap;

use cgmath::Vector3;
use rapier3d::prelude::*;

use crate::{
    input_context::HandSlot,
    pose::Pose,
    rope::RopeMesh,
    services::{
        CollisionLayers, MeshSubmission, ObjectLifecycle, ObjectRef, PrefabKind, RayHit,
        RigidBodyService, SpatialQuery,
    },
};

use self::util::{
    isometry_to_pose, npoint_to_cgvec, nvec_to_cgmath, pose_to_isometry, vec_to_npoint,
    vec_to_nvec,
};

const GRAVITY: f32 = -9.81;

/// Density given to movable crates
const MOVABLE_DENSITY: f32 = 1.0;

fn interaction_groups(layers: CollisionLayers) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(layers.bits()), Group::ALL)
}

fn query_groups(layers: CollisionLayers) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(layers.bits()))
}

/// Rigid-body world the grapple runs against outside of tests. Every object
/// it hands out is an `ObjectRef`; colliders carry that id in their user data
/// so ray hits can be mapped back.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    next_id: u64,
    bodies: HashMap<ObjectRef, RigidBodyHandle>,
    colliders: HashMap<ObjectRef, ColliderHandle>,
    ropes: HashMap<HandSlot, RopeMesh>,
}

impl PhysicsWorld {
    pub fn new() -> PhysicsWorld {
        PhysicsWorld {
            gravity: vector![0.0, GRAVITY, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            next_id: 1,
            bodies: HashMap::new(),
            colliders: HashMap::new(),
            ropes: HashMap::new(),
        }
    }

    fn next_ref(&mut self) -> ObjectRef {
        let object = ObjectRef(self.next_id);
        self.next_id += 1;
        object
    }

    fn create_body(&mut self, object: ObjectRef, body: RigidBody) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(body);
        self.bodies.insert(object, handle);
        handle
    }

    fn attach_collider(
        &mut self,
        object: ObjectRef,
        handle: RigidBodyHandle,
        shape: SharedShape,
        density: f32,
        layers: CollisionLayers,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::new(shape)
            .density(density)
            .collision_groups(interaction_groups(layers))
            .user_data(object.0 as u128)
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.colliders.insert(object, collider_handle);
        self.refresh_queries();
        collider_handle
    }

    fn add_box(
        &mut self,
        body: RigidBodyBuilder,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        density: f32,
        layers: CollisionLayers,
    ) -> ObjectRef {
        let object = self.next_ref();
        let handle = self.create_body(object, body.translation(vec_to_nvec(center)).build());
        self.attach_collider(
            object,
            handle,
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            density,
            layers,
        );
        object
    }

    /// Immovable level geometry the player can swing from
    pub fn add_static_box(&mut self, center: Vector3<f32>, half_extents: Vector3<f32>) -> ObjectRef {
        let object = self.add_box(
            RigidBodyBuilder::fixed(),
            center,
            half_extents,
            0.0,
            CollisionLayers::WORLD,
        );
        engine::physics_log!(DEBUG, "static box {:?} at {:?}", object, center);
        object
    }

    /// Dynamic crate the grapple can reel in
    pub fn add_movable_box(&mut self, center: Vector3<f32>, half_extents: Vector3<f32>) -> ObjectRef {
        let object = self.add_box(
            RigidBodyBuilder::dynamic(),
            center,
            half_extents,
            MOVABLE_DENSITY,
            CollisionLayers::MOVABLE,
        );
        engine::physics_log!(DEBUG, "movable box {:?} at {:?}", object, center);
        object
    }

    /// A wide static slab whose top face sits at `height`
    pub fn add_floor(&mut self, height: f32) -> ObjectRef {
        self.add_static_box(
            cgmath::vec3(0.0, height - 0.5, 0.0),
            cgmath::vec3(500.0, 0.5, 500.0),
        )
    }

    pub fn object_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, object: ObjectRef) -> bool {
        self.bodies.contains_key(&object)
    }

    pub fn pose_of(&self, object: ObjectRef) -> Option<Pose> {
        let handle = self.bodies.get(&object)?;
        self.rigid_body_set
            .get(*handle)
            .map(|body| isometry_to_pose(body.position()))
    }

    pub fn is_collider_enabled(&self, object: ObjectRef) -> bool {
        self.colliders
            .get(&object)
            .and_then(|handle| self.collider_set.get(*handle))
            .map(|collider| collider.is_enabled())
            .unwrap_or(false)
    }

    pub fn linear_velocity(&self, object: ObjectRef) -> Option<Vector3<f32>> {
        let handle = self.bodies.get(&object)?;
        self.rigid_body_set
            .get(*handle)
            .map(|body| nvec_to_cgmath(*body.linvel()))
    }

    /// Latest rope submitted for `hand`
    pub fn rope(&self, hand: HandSlot) -> Option<&RopeMesh> {
        self.ropes.get(&hand)
    }

    /// Advance the rigid bodies by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn refresh_queries(&mut self) {
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
    }

    fn body_mut(&mut self, object: ObjectRef) -> Option<&mut RigidBody> {
        let handle = self.bodies.get(&object)?;
        self.rigid_body_set.get_mut(*handle)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        PhysicsWorld::new()
    }
}

impl SpatialQuery for PhysicsWorld {
    fn raycast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit> {
        let ray = Ray::new(vec_to_npoint(origin), vec_to_nvec(direction));
        let enabled_only = |_handle: ColliderHandle, collider: &Collider| collider.is_enabled();
        let filter = QueryFilter::new()
            .groups(query_groups(layers))
            .exclude_sensors()
            .predicate(&enabled_only);

        let (handle, intersection) = self.query_pipeline.cast_ray_and_get_normal(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        let collider = self.collider_set.get(handle)?;
        let memberships = collider.collision_groups().memberships.bits();
        Some(RayHit {
            point: npoint_to_cgvec(ray.point_at(intersection.time_of_impact)),
            normal: nvec_to_cgmath(intersection.normal),
            distance: intersection.time_of_impact,
            object: Some(ObjectRef(collider.user_data as u64)),
            movable: memberships & CollisionLayers::MOVABLE.bits() != 0,
        })
    }
}

impl ObjectLifecycle for PhysicsWorld {
    /// Hooks are kinematic and collider-less: they find what they hit by ray
    /// cast, and must not shove the bodies they fly past.
    fn spawn(&mut self, kind: PrefabKind, pose: Pose) -> ObjectRef {
        let object = self.next_ref();
        let body = match kind {
            PrefabKind::GrappleHook => RigidBodyBuilder::kinematic_position_based()
                .position(pose_to_isometry(&pose))
                .build(),
        };
        self.create_body(object, body);
        engine::physics_log!(TRACE, "spawned {:?} as {:?}", kind, object);
        object
    }

    fn destroy(&mut self, object: ObjectRef) {
        let Some(handle) = self.bodies.remove(&object) else {
            return;
        };
        self.colliders.remove(&object);
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.refresh_queries();
        engine::physics_log!(TRACE, "destroyed {:?}", object);
    }

    fn set_pose(&mut self, object: ObjectRef, pose: Pose) {
        if let Some(body) = self.body_mut(object) {
            body.set_position(pose_to_isometry(&pose), true);
        }
    }
}

impl RigidBodyService for PhysicsWorld {
    fn apply_impulse(&mut self, object: ObjectRef, impulse: Vector3<f32>) {
        if let Some(body) = self.body_mut(object) {
            body.apply_impulse(vec_to_nvec(impulse), true);
        }
    }

    fn set_collider_enabled(&mut self, object: ObjectRef, enabled: bool) {
        let Some(handle) = self.colliders.get(&object).copied() else {
            return;
        };
        let Some(collider) = self.collider_set.get_mut(handle) else {
            return;
        };
        collider.set_enabled(enabled);
        let parent = collider.parent();

        // Mass from the disabled period lingers until the next step
        if let Some(body) = parent.and_then(|parent| self.rigid_body_set.get_mut(parent)) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }
        self.refresh_queries();
    }

    fn body_position(&self, object: ObjectRef) -> Option<Vector3<f32>> {
        let handle = self.bodies.get(&object)?;
        self.rigid_body_set
            .get(*handle)
            .map(|body| nvec_to_cgmath(*body.translation()))
    }

    fn set_body_pose(&mut self, object: ObjectRef, pose: Pose) {
        if let Some(body) = self.body_mut(object) {
            body.set_position(pose_to_isometry(&pose), true);
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_angvel(vector![0.0, 0.0, 0.0], true);
        }
        self.refresh_queries();
    }
}

impl MeshSubmission for PhysicsWorld {
    fn submit_rope(&mut self, hand: HandSlot, mesh: &RopeMesh) {
        engine::render_log!(TRACE, "{:?} rope: {} vertices", hand, mesh.vertices().len());
        self.ropes.insert(hand, mesh.clone());
    }
}
