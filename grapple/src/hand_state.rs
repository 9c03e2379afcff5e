use cgmath::{InnerSpace, Vector3, vec3};
use serde::Serialize;

use crate::{
    config::GrappleConfig,
    hook::{HookActor, HookEvent},
    input_context::{Hand, HandSlot},
    pose::Pose,
    rope::RopeMesh,
    services::{MeshSubmission, ObjectLifecycle, ObjectRef, RigidBodyService, SpatialQuery},
    util::normalize_or_zero,
};

/// Hooks closer to the player than this let go
pub const MIN_ROPE_LENGTH: f32 = 0.1;

/// How far short of the anchor surface the player is pulled
pub const ANCHOR_STANDOFF: f32 = 0.25;

/// Height above the feet that release momentum is aimed from
pub const CHEST_HEIGHT: f32 = 0.5;

/// Per-frame displacement seeded into slide momentum while swinging
pub const SLIDE_SEED_SPEED: f32 = 0.75;

/// Impulse given to a pulled object when it is let go
pub const PULL_RELEASE_IMPULSE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GrapplePhase {
    /// No hook out
    Idle,
    /// Hook is out but not holding anything
    Aiming,
    /// Hook is anchored to a fixed surface and the player is being pulled
    Hooked,
    /// Hook is reeling a movable object toward the hand
    Pulling,
}

/// Grapple state for one hand
#[derive(Debug)]
pub struct HandGrappleState {
    slot: HandSlot,
    grip_engaged: bool,
    held: bool,
    hooked: bool,
    pulling: bool,
    hook: Option<HookActor>,
    grabbed: Option<ObjectRef>,
    slide_momentum: Vector3<f32>,
    rope: RopeMesh,
}

impl HandGrappleState {
    pub fn new(slot: HandSlot) -> Self {
        HandGrappleState {
            slot,
            grip_engaged: false,
            held: false,
            hooked: false,
            pulling: false,
            hook: None,
            grabbed: None,
            slide_momentum: vec3(0.0, 0.0, 0.0),
            rope: RopeMesh::new(),
        }
    }

    pub fn slot(&self) -> HandSlot {
        self.slot
    }

    pub fn phase(&self) -> GrapplePhase {
        if self.hooked {
            GrapplePhase::Hooked
        } else if self.pulling {
            GrapplePhase::Pulling
        } else if self.hook.is_some() {
            GrapplePhase::Aiming
        } else {
            GrapplePhase::Idle
        }
    }

    pub fn is_grip_engaged(&self) -> bool {
        self.grip_engaged
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_hooked(&self) -> bool {
        self.hooked
    }

    pub fn is_pulling(&self) -> bool {
        self.pulling
    }

    pub fn hook(&self) -> Option<&HookActor> {
        self.hook.as_ref()
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    pub fn grabbed(&self) -> Option<ObjectRef> {
        self.grabbed
    }

    pub fn slide_momentum(&self) -> Vector3<f32> {
        self.slide_momentum
    }

    pub(crate) fn slide_momentum_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.slide_momentum
    }

    pub fn rope(&self) -> &RopeMesh {
        &self.rope
    }

    /// Read the trigger. Crossing the sensitivity fires once; staying above it
    /// does nothing until the trigger drops back to or below it. Returns true
    /// when a hook was launched.
    pub fn fire<W>(&mut self, hand: &Hand, config: &GrappleConfig, world: &mut W) -> bool
    where
        W: ObjectLifecycle + RigidBodyService + MeshSubmission + ?Sized,
    {
        let value = hand.trigger_value;

        if value > config.trigger_sensitivity && !self.grip_engaged && !self.held {
            if self.hook.is_some() {
                self.clear_hook(hand, world);
            }

            self.grip_engaged = true;
            self.held = true;
            self.hook = Some(HookActor::spawn(
                world,
                self.slot,
                hand.pose(),
                config.fire_speed,
            ));
            engine::grapple_log!(DEBUG, "{:?} hand fired at {:?}", self.slot, hand.position);
            return true;
        }

        if value <= config.trigger_sensitivity {
            self.grip_engaged = false;
            self.held = false;
        }

        false
    }

    pub fn advance_hook<W>(&mut self, dt: f32, world: &mut W) -> Option<HookEvent>
    where
        W: SpatialQuery + ObjectLifecycle + ?Sized,
    {
        self.hook.as_mut()?.advance(dt, world)
    }

    /// The hook bit into a fixed surface. The hook snaps to the reticle (the
    /// point the player was aiming at) when one is showing, and the returned
    /// anchor sits just in front of it, dropped by `roof`.
    pub fn on_surface_hit<W>(
        &mut self,
        hit_point: Vector3<f32>,
        roof: f32,
        reticle: Option<Vector3<f32>>,
        player_position: Vector3<f32>,
        world: &mut W,
    ) -> Option<Vector3<f32>>
    where
        W: ObjectLifecycle + ?Sized,
    {
        let hook = self.hook.as_mut()?;
        self.hooked = true;

        let standoff = normalize_or_zero(player_position - hook.position()) * ANCHOR_STANDOFF;
        let aim_point = reticle.unwrap_or(hit_point);
        let anchor = aim_point + standoff - vec3(0.0, roof, 0.0);
        hook.snap_to(world, aim_point);

        engine::grapple_log!(DEBUG, "{:?} hand hooked, anchor {:?}", self.slot, anchor);
        Some(anchor)
    }

    /// The hook caught a movable object: start reeling it in
    pub fn on_movable_hit<W>(&mut self, object: ObjectRef, world: &mut W)
    where
        W: RigidBodyService + ?Sized,
    {
        if self.hook.is_none() {
            return;
        }

        self.pulling = true;
        self.grabbed = Some(object);
        world.set_collider_enabled(object, false);
        engine::grapple_log!(DEBUG, "{:?} hand pulling {:?}", self.slot, object);
    }

    /// Another hand took over the fixed anchor. The hook stays where it is.
    pub fn clear_hooked_flag(&mut self) {
        if self.hooked {
            engine::grapple_log!(DEBUG, "{:?} hand unhooked by other hand", self.slot);
        }
        self.hooked = false;
    }

    /// Another hand started pulling. Let go of our object without throwing it.
    pub fn drop_pull<W>(&mut self, world: &mut W)
    where
        W: RigidBodyService + ?Sized,
    {
        if !self.pulling {
            return;
        }

        self.pulling = false;
        if let Some(object) = self.grabbed.take() {
            world.set_collider_enabled(object, true);
        }
    }

    /// Per-frame work while a hook is out: seed release momentum, let go when
    /// the trigger is released or the rope is out of bounds, and reel pulled
    /// objects in.
    pub fn update_tether<W>(
        &mut self,
        hand: &Hand,
        player_position: Vector3<f32>,
        config: &GrappleConfig,
        dt: f32,
        world: &mut W,
    ) where
        W: ObjectLifecycle + RigidBodyService + MeshSubmission + ?Sized,
    {
        let hook_position = match &self.hook {
            Some(hook) => hook.position(),
            None => return,
        };

        if self.hooked {
            let chest = player_position + vec3(0.0, CHEST_HEIGHT, 0.0);
            self.slide_momentum = normalize_or_zero(hook_position - chest) * SLIDE_SEED_SPEED;
        }

        if !self.grip_engaged {
            self.clear_hook(hand, world);
            return;
        }

        let rope_length = (hook_position - player_position).magnitude();
        if rope_length > config.grapple_length || rope_length < MIN_ROPE_LENGTH {
            engine::grapple_log!(DEBUG, "{:?} rope out of bounds ({})", self.slot, rope_length);
            self.clear_hook(hand, world);
            // Trigger is still squeezed: keep the debounce so this squeeze cannot fire again
            self.held = true;
            return;
        }

        if self.pulling {
            if let Some(hook) = self.hook.as_mut() {
                hook.reel_towards(world, hand.position, config.fire_speed * dt);
                if let Some(object) = self.grabbed {
                    world.set_body_pose(object, Pose::new(hook.position(), hand.rotation));
                    world.set_collider_enabled(object, false);
                }
            }
        }
    }

    /// Rebuild and submit the rope while the trigger is held
    pub fn refresh_rope<W>(&mut self, hand: &Hand, thickness: f32, world: &mut W)
    where
        W: MeshSubmission + ?Sized,
    {
        if !self.grip_engaged {
            return;
        }

        if let Some(hook) = &self.hook {
            self.rope.build_frame(&hand.pose(), &hook.pose(), thickness);
            world.submit_rope(self.slot, &self.rope);
        }
    }

    /// Let go: destroy the hook, hide the rope and reset every flag. A pulled
    /// object gets its collider back and a nudge toward the hand. Safe to call
    /// on a hand that has nothing out.
    pub fn clear_hook<W>(&mut self, hand: &Hand, world: &mut W)
    where
        W: ObjectLifecycle + RigidBodyService + MeshSubmission + ?Sized,
    {
        if self.pulling {
            if let Some(object) = self.grabbed {
                world.set_collider_enabled(object, true);
                if let Some(object_position) = world.body_position(object) {
                    let throw = normalize_or_zero(hand.position - object_position);
                    world.apply_impulse(object, throw * PULL_RELEASE_IMPULSE);
                }
            }
        }

        if let Some(hook) = self.hook.take() {
            hook.destroy(world);
            engine::grapple_log!(DEBUG, "{:?} hand released", self.slot);
        }

        if !self.rope.is_empty() {
            self.rope.clear();
            world.submit_rope(self.slot, &self.rope);
        }

        self.grip_engaged = false;
        self.held = false;
        self.hooked = false;
        self.pulling = false;
        self.grabbed = None;
    }
}
