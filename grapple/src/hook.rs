use cgmath::{InnerSpace, Vector3, vec3};

use crate::{
    input_context::HandSlot,
    pose::Pose,
    services::{CollisionLayers, ObjectLifecycle, ObjectRef, PrefabKind, SpatialQuery},
    util::move_towards,
};

/// Hits on surfaces facing further down than this count as ceiling hits
const CEILING_NORMAL_Y: f32 = -0.5;

/// Extra drop applied to the anchor when a hook lands on a ceiling, so the
/// player hangs below it rather than being pulled into it.
pub const CEILING_ROOF_OFFSET: f32 = 0.1;

/// What a flying hook reports when it meets something
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HookEvent {
    SurfaceHit {
        point: Vector3<f32>,
        normal: Vector3<f32>,
        roof: f32,
    },
    MovableHit {
        object: ObjectRef,
        point: Vector3<f32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HookAnchor {
    Surface {
        point: Vector3<f32>,
        normal: Vector3<f32>,
    },
    Movable {
        object: ObjectRef,
    },
}

/// One fired projectile. Owned by exactly one hand and destroyed with it.
#[derive(Debug)]
pub struct HookActor {
    owner: HandSlot,
    handle: ObjectRef,
    spawn_pose: Pose,
    impulse: f32,
    pose: Pose,
    velocity: Vector3<f32>,
    anchor: Option<HookAnchor>,
}

impl HookActor {
    /// Spawn a hook at `pose` travelling along its forward axis. Hooks have
    /// unit mass, so the impulse is also the launch speed.
    pub fn spawn<W: ObjectLifecycle + ?Sized>(
        world: &mut W,
        owner: HandSlot,
        pose: Pose,
        impulse: f32,
    ) -> HookActor {
        let handle = world.spawn(PrefabKind::GrappleHook, pose);
        HookActor {
            owner,
            handle,
            spawn_pose: pose,
            impulse,
            pose,
            velocity: pose.forward() * impulse,
            anchor: None,
        }
    }

    pub fn owner(&self) -> HandSlot {
        self.owner
    }

    pub fn handle(&self) -> ObjectRef {
        self.handle
    }

    pub fn spawn_pose(&self) -> Pose {
        self.spawn_pose
    }

    pub fn impulse(&self) -> f32 {
        self.impulse
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn position(&self) -> Vector3<f32> {
        self.pose.position
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    pub fn anchor(&self) -> Option<HookAnchor> {
        self.anchor
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    /// Fly for `dt` seconds. The swept segment is raycast so fast hooks
    /// cannot tunnel through thin walls. Anchored hooks stay put.
    pub fn advance<W: SpatialQuery + ObjectLifecycle + ?Sized>(
        &mut self,
        dt: f32,
        world: &mut W,
    ) -> Option<HookEvent> {
        if self.anchor.is_some() {
            return None;
        }

        let step = self.velocity * dt;
        let distance = step.magnitude();
        if distance <= f32::EPSILON {
            return None;
        }

        let direction = step / distance;
        let maybe_hit = world.raycast(
            self.pose.position,
            direction,
            distance,
            CollisionLayers::grapple_targets(),
        );

        let event = match maybe_hit {
            Some(hit) => {
                self.pose.position = hit.point;
                self.velocity = vec3(0.0, 0.0, 0.0);

                match hit.object {
                    Some(object) if hit.movable => {
                        self.anchor = Some(HookAnchor::Movable { object });
                        Some(HookEvent::MovableHit {
                            object,
                            point: hit.point,
                        })
                    }
                    _ => {
                        self.anchor = Some(HookAnchor::Surface {
                            point: hit.point,
                            normal: hit.normal,
                        });
                        Some(HookEvent::SurfaceHit {
                            point: hit.point,
                            normal: hit.normal,
                            roof: roof_offset_for(hit.normal),
                        })
                    }
                }
            }
            None => {
                self.pose.position += step;
                None
            }
        };

        world.set_pose(self.handle, self.pose);
        event
    }

    /// Place the hook somewhere else without changing its flight state
    pub fn snap_to<W: ObjectLifecycle + ?Sized>(&mut self, world: &mut W, position: Vector3<f32>) {
        self.pose.position = position;
        world.set_pose(self.handle, self.pose);
    }

    /// Reel the hook toward `target` by at most `max_delta`
    pub fn reel_towards<W: ObjectLifecycle + ?Sized>(
        &mut self,
        world: &mut W,
        target: Vector3<f32>,
        max_delta: f32,
    ) {
        self.pose.position = move_towards(self.pose.position, target, max_delta);
        world.set_pose(self.handle, self.pose);
    }

    pub fn destroy<W: ObjectLifecycle + ?Sized>(self, world: &mut W) {
        world.destroy(self.handle);
    }
}

fn roof_offset_for(normal: Vector3<f32>) -> f32 {
    if normal.y < CEILING_NORMAL_Y {
        CEILING_ROOF_OFFSET
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWorld;

    fn forward_hook(world: &mut FakeWorld) -> HookActor {
        HookActor::spawn(
            world,
            HandSlot::Right,
            Pose::from_position(vec3(0.0, 1.0, 0.0)),
            20.0,
        )
    }

    #[test]
    fn test_spawn_launches_along_forward() {
        let mut world = FakeWorld::new();
        let hook = forward_hook(&mut world);

        assert_eq!(world.spawned.len(), 1);
        assert_eq!(world.spawned[0].1.position, vec3(0.0, 1.0, 0.0));
        assert_eq!(hook.velocity(), vec3(0.0, 0.0, -20.0));
        assert_eq!(hook.impulse(), 20.0);
        assert!(!hook.is_anchored());
    }

    #[test]
    fn test_flies_until_it_meets_a_wall() {
        let mut world = FakeWorld::new();
        world.add_static_box(vec3(0.0, 1.0, -10.5), vec3(5.0, 5.0, 0.5));
        let mut hook = forward_hook(&mut world);

        // 20 units/s for 0.25s covers 5 units: nothing yet
        assert_eq!(hook.advance(0.25, &mut world), None);
        assert!((hook.position().z + 5.0).abs() < 1e-4);

        let event = hook.advance(0.25, &mut world);
        match event {
            Some(HookEvent::SurfaceHit { point, normal, roof }) => {
                assert!((point.z + 10.0).abs() < 1e-4);
                assert_eq!(normal, vec3(0.0, 0.0, 1.0));
                assert_eq!(roof, 0.0);
            }
            other => panic!("expected surface hit, got {:?}", other),
        }
        assert!(hook.is_anchored());
        assert_eq!(world.pose_of(hook.handle()).unwrap().position, hook.position());

        // Anchored hooks do not move
        assert_eq!(hook.advance(1.0, &mut world), None);
        assert!((hook.position().z + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_ceiling_hit_reports_roof_offset() {
        let mut world = FakeWorld::new();
        world.add_static_box(vec3(0.0, 6.0, 0.0), vec3(5.0, 0.5, 5.0));
        let up = cgmath::Quaternion::from_arc(crate::pose::FORWARD, crate::pose::UP, None);
        let mut hook = HookActor::spawn(
            &mut world,
            HandSlot::Left,
            Pose::new(vec3(0.0, 1.0, 0.0), up),
            20.0,
        );

        match hook.advance(1.0, &mut world) {
            Some(HookEvent::SurfaceHit { roof, normal, .. }) => {
                assert_eq!(normal, vec3(0.0, -1.0, 0.0));
                assert_eq!(roof, CEILING_ROOF_OFFSET);
            }
            other => panic!("expected ceiling hit, got {:?}", other),
        }
    }

    #[test]
    fn test_movable_hit_anchors_to_object() {
        let mut world = FakeWorld::new();
        let crate_ref = world.add_movable_box(vec3(0.0, 1.0, -3.0), vec3(0.5, 0.5, 0.5));
        let mut hook = forward_hook(&mut world);

        let event = hook.advance(0.5, &mut world);
        assert!(matches!(
            event,
            Some(HookEvent::MovableHit { object, .. }) if object == crate_ref
        ));
        assert_eq!(
            hook.anchor(),
            Some(HookAnchor::Movable { object: crate_ref })
        );
    }

    #[test]
    fn test_destroy_releases_handle() {
        let mut world = FakeWorld::new();
        let hook = forward_hook(&mut world);
        let handle = hook.handle();

        hook.destroy(&mut world);
        assert_eq!(world.destroyed, vec![handle]);
    }
}
