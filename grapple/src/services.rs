use bitflags::bitflags;
use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::{input_context::HandSlot, pose::Pose, rope::RopeMesh};

bitflags! {
    /// Collision layers a collider belongs to, and that a query can be masked against
    pub struct CollisionLayers: u32 {
        const WORLD = 0b0001;
        const MOVABLE = 0b0010;
        const HOOK = 0b0100;
        const PLAYER = 0b1000;
    }
}

impl CollisionLayers {
    /// What the reticle and flying hooks can latch onto
    pub fn grapple_targets() -> CollisionLayers {
        CollisionLayers::WORLD | CollisionLayers::MOVABLE
    }

    /// What the player stands on and slides against
    pub fn environment() -> CollisionLayers {
        CollisionLayers::WORLD | CollisionLayers::MOVABLE
    }
}

/// Opaque reference to an object owned by the world: a spawned hook or a
/// collidable body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefabKind {
    GrappleHook,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub distance: f32,
    pub object: Option<ObjectRef>,
    /// The hit object can be reeled in rather than swung from
    pub movable: bool,
}

pub trait SpatialQuery {
    /// Closest hit along `direction` (unit length) within `max_distance`,
    /// ignoring sensors, disabled colliders and layers outside `layers`.
    fn raycast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit>;
}

pub trait ObjectLifecycle {
    fn spawn(&mut self, kind: PrefabKind, pose: Pose) -> ObjectRef;

    fn destroy(&mut self, object: ObjectRef);

    /// Move a spawned object to where the simulation says it is
    fn set_pose(&mut self, object: ObjectRef, pose: Pose);
}

pub trait RigidBodyService {
    fn apply_impulse(&mut self, object: ObjectRef, impulse: Vector3<f32>);

    fn set_collider_enabled(&mut self, object: ObjectRef, enabled: bool);

    fn body_position(&self, object: ObjectRef) -> Option<Vector3<f32>>;

    /// Override the transform of a body, cancelling its velocity
    fn set_body_pose(&mut self, object: ObjectRef, pose: Pose);
}

pub trait MeshSubmission {
    /// Hand the current rope buffer for `hand` to the renderer. An empty mesh
    /// means the rope is hidden.
    fn submit_rope(&mut self, hand: HandSlot, mesh: &RopeMesh);
}

/// Everything the grapple core needs from the outside world
pub trait GrappleWorld: SpatialQuery + ObjectLifecycle + RigidBodyService + MeshSubmission {}

impl<T> GrappleWorld for T where T: SpatialQuery + ObjectLifecycle + RigidBodyService + MeshSubmission {}
