// In-memory world for unit tests: axis-aligned boxes for ray queries, and a
// record of every call the grapple core makes on its collaborators.

use std::collections::HashMap;

use cgmath::{Vector3, vec3};

use crate::{
    input_context::HandSlot,
    pose::Pose,
    rope::RopeMesh,
    services::{
        CollisionLayers, MeshSubmission, ObjectLifecycle, ObjectRef, PrefabKind, RayHit,
        RigidBodyService, SpatialQuery,
    },
};

struct FakeBox {
    object: ObjectRef,
    center: Vector3<f32>,
    half_extents: Vector3<f32>,
    layers: CollisionLayers,
    enabled: bool,
}

pub struct FakeWorld {
    boxes: Vec<FakeBox>,
    poses: HashMap<ObjectRef, Pose>,
    next_id: u64,
    pub spawned: Vec<(ObjectRef, Pose)>,
    pub destroyed: Vec<ObjectRef>,
    pub impulses: Vec<(ObjectRef, Vector3<f32>)>,
    pub ropes: Vec<(HandSlot, RopeMesh)>,
}

impl FakeWorld {
    pub fn new() -> Self {
        FakeWorld {
            boxes: Vec::new(),
            poses: HashMap::new(),
            next_id: 1,
            spawned: Vec::new(),
            destroyed: Vec::new(),
            impulses: Vec::new(),
            ropes: Vec::new(),
        }
    }

    fn next_ref(&mut self) -> ObjectRef {
        let object = ObjectRef(self.next_id);
        self.next_id += 1;
        object
    }

    fn add_box(
        &mut self,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        layers: CollisionLayers,
    ) -> ObjectRef {
        let object = self.next_ref();
        self.boxes.push(FakeBox {
            object,
            center,
            half_extents,
            layers,
            enabled: true,
        });
        self.poses.insert(object, Pose::from_position(center));
        object
    }

    pub fn add_static_box(&mut self, center: Vector3<f32>, half_extents: Vector3<f32>) -> ObjectRef {
        self.add_box(center, half_extents, CollisionLayers::WORLD)
    }

    pub fn add_movable_box(&mut self, center: Vector3<f32>, half_extents: Vector3<f32>) -> ObjectRef {
        self.add_box(center, half_extents, CollisionLayers::MOVABLE)
    }

    /// A wide slab whose top face sits at `height`
    pub fn add_floor(&mut self, height: f32) -> ObjectRef {
        self.add_static_box(vec3(0.0, height - 0.5, 0.0), vec3(500.0, 0.5, 500.0))
    }

    pub fn pose_of(&self, object: ObjectRef) -> Option<Pose> {
        self.poses.get(&object).copied()
    }

    pub fn collider_enabled(&self, object: ObjectRef) -> bool {
        self.boxes
            .iter()
            .find(|b| b.object == object)
            .map(|b| b.enabled)
            .unwrap_or(false)
    }

    pub fn last_rope(&self, hand: HandSlot) -> Option<&RopeMesh> {
        self.ropes
            .iter()
            .rev()
            .find(|(slot, _)| *slot == hand)
            .map(|(_, mesh)| mesh)
    }
}

impl SpatialQuery for FakeWorld {
    fn raycast(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit> {
        self.boxes
            .iter()
            .filter(|b| b.enabled && b.layers.intersects(layers))
            .filter_map(|b| {
                ray_box(origin, direction, b.center, b.half_extents)
                    .filter(|(t, _)| *t <= max_distance)
                    .map(|(t, normal)| RayHit {
                        point: origin + direction * t,
                        normal,
                        distance: t,
                        object: Some(b.object),
                        movable: b.layers.contains(CollisionLayers::MOVABLE),
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Slab test. Returns entry distance and the normal of the entered face; rays
/// starting inside a box do not hit it.
fn ray_box(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    center: Vector3<f32>,
    half_extents: Vector3<f32>,
) -> Option<(f32, Vector3<f32>)> {
    let min = center - half_extents;
    let max = center + half_extents;
    let o = [origin.x, origin.y, origin.z];
    let d = [direction.x, direction.y, direction.z];
    let lo = [min.x, min.y, min.z];
    let hi = [max.x, max.y, max.z];

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;
    let mut enter_sign = 0.0;

    for axis in 0..3 {
        if d[axis].abs() < 1e-8 {
            if o[axis] < lo[axis] || o[axis] > hi[axis] {
                return None;
            }
            continue;
        }

        let t1 = (lo[axis] - o[axis]) / d[axis];
        let t2 = (hi[axis] - o[axis]) / d[axis];
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        if near > t_enter {
            t_enter = near;
            enter_axis = axis;
            enter_sign = -d[axis].signum();
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_enter < 0.0 {
        return None;
    }

    let mut normal = [0.0; 3];
    normal[enter_axis] = enter_sign;
    Some((t_enter, vec3(normal[0], normal[1], normal[2])))
}

impl ObjectLifecycle for FakeWorld {
    fn spawn(&mut self, _kind: PrefabKind, pose: Pose) -> ObjectRef {
        let object = self.next_ref();
        self.poses.insert(object, pose);
        self.spawned.push((object, pose));
        object
    }

    fn destroy(&mut self, object: ObjectRef) {
        self.poses.remove(&object);
        self.destroyed.push(object);
    }

    fn set_pose(&mut self, object: ObjectRef, pose: Pose) {
        self.poses.insert(object, pose);
    }
}

impl RigidBodyService for FakeWorld {
    fn apply_impulse(&mut self, object: ObjectRef, impulse: Vector3<f32>) {
        self.impulses.push((object, impulse));
    }

    fn set_collider_enabled(&mut self, object: ObjectRef, enabled: bool) {
        if let Some(b) = self.boxes.iter_mut().find(|b| b.object == object) {
            b.enabled = enabled;
        }
    }

    fn body_position(&self, object: ObjectRef) -> Option<Vector3<f32>> {
        self.poses.get(&object).map(|pose| pose.position)
    }

    fn set_body_pose(&mut self, object: ObjectRef, pose: Pose) {
        self.poses.insert(object, pose);
        if let Some(b) = self.boxes.iter_mut().find(|b| b.object == object) {
            b.center = pose.position;
        }
    }
}

impl MeshSubmission for FakeWorld {
    fn submit_rope(&mut self, hand: HandSlot, mesh: &RopeMesh) {
        self.ropes.push((hand, mesh.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_nearest_face() {
        let mut world = FakeWorld::new();
        let near = world.add_static_box(vec3(0.0, 0.0, -5.0), vec3(1.0, 1.0, 1.0));
        world.add_static_box(vec3(0.0, 0.0, -9.0), vec3(1.0, 1.0, 1.0));

        let hit = world
            .raycast(
                vec3(0.0, 0.0, 0.0),
                vec3(0.0, 0.0, -1.0),
                20.0,
                CollisionLayers::WORLD,
            )
            .unwrap();
        assert_eq!(hit.object, Some(near));
        assert_eq!(hit.distance, 4.0);
        assert_eq!(hit.normal, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_ray_respects_mask_and_range() {
        let mut world = FakeWorld::new();
        world.add_movable_box(vec3(0.0, 0.0, -5.0), vec3(1.0, 1.0, 1.0));

        let down = vec3(0.0, 0.0, -1.0);
        assert!(world.raycast(vec3(0.0, 0.0, 0.0), down, 20.0, CollisionLayers::WORLD).is_none());
        assert!(world.raycast(vec3(0.0, 0.0, 0.0), down, 3.0, CollisionLayers::MOVABLE).is_none());
        assert!(world.raycast(vec3(0.0, 0.0, 0.0), down, 4.0, CollisionLayers::MOVABLE).unwrap().movable);
    }

    #[test]
    fn test_floor_normal_points_up() {
        let mut world = FakeWorld::new();
        world.add_floor(0.0);

        let hit = world
            .raycast(
                vec3(3.0, 1.0, 2.0),
                vec3(0.0, -1.0, 0.0),
                1.5,
                CollisionLayers::environment(),
            )
            .unwrap();
        assert_eq!(hit.point.y, 0.0);
        assert_eq!(hit.normal, vec3(0.0, 1.0, 0.0));
    }
}
