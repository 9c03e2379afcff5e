use cgmath::{Vector3, vec3};

use crate::{
    services::{CollisionLayers, SpatialQuery},
    util::{move_towards, normalize_or_zero, strip_normal_axes},
};

/// Ground probe starts this far above the feet
pub const GROUND_PROBE_HEIGHT: f32 = 0.35;
pub const GROUND_PROBE_RANGE: f32 = 1.5;
/// Feet rest this far above the ground point
pub const GROUND_CLEARANCE: f32 = 0.05;
/// Fastest fall, in units per fixed tick
pub const TERMINAL_FALL_SPEED: f32 = 3.0;
/// Below this height the player is put back at the respawn anchor
pub const RESPAWN_FLOOR_Y: f32 = -20.0;

/// Slide momentum is probed from this height, so it catches walls rather than the floor
pub const SLIDE_PROBE_HEIGHT: f32 = 1.0;
pub const SLIDE_PROBE_RANGE: f32 = 0.8;

const DOWN: Vector3<f32> = vec3(0.0, -1.0, 0.0);

/// Owns the player position. Every subsystem moves the player through
/// `apply_displacement`.
#[derive(Clone, Debug)]
pub struct PlayerMotion {
    position: Vector3<f32>,
    respawn_anchor: Vector3<f32>,
    fall_velocity: f32,
    gravity_strength: f32,
    gravity_enabled: bool,
    grounded: bool,
}

impl PlayerMotion {
    pub fn new(start: Vector3<f32>, gravity_strength: f32) -> Self {
        PlayerMotion {
            position: start,
            respawn_anchor: start,
            fall_velocity: 0.0,
            gravity_strength,
            gravity_enabled: true,
            grounded: false,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn respawn_anchor(&self) -> Vector3<f32> {
        self.respawn_anchor
    }

    pub fn fall_velocity(&self) -> f32 {
        self.fall_velocity
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn apply_displacement(&mut self, displacement: Vector3<f32>) {
        self.position += displacement;
    }

    /// Place the player directly, e.g. when the host moves the rig
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        if enabled != self.gravity_enabled {
            engine::motion_log!(DEBUG, "gravity {}", if enabled { "on" } else { "off" });
        }
        self.gravity_enabled = enabled;
    }

    /// Step toward `target` by at most `max_step`
    pub fn pull_towards(&mut self, target: Vector3<f32>, max_step: f32) {
        let next = move_towards(self.position, target, max_step);
        self.apply_displacement(next - self.position);
    }

    /// Spend one frame of release momentum. Surfaces ahead strip the momentum
    /// along their normal so the player slides along them, then the momentum
    /// decays by `tug_step` and what is left moves the player.
    pub fn slide<W>(&mut self, momentum: &mut Vector3<f32>, tug_step: f32, world: &W) -> Vector3<f32>
    where
        W: SpatialQuery + ?Sized,
    {
        let zero = vec3(0.0, 0.0, 0.0);
        if *momentum == zero {
            return zero;
        }

        let origin = self.position + vec3(0.0, SLIDE_PROBE_HEIGHT, 0.0);
        if let Some(hit) = world.raycast(
            origin,
            normalize_or_zero(*momentum),
            SLIDE_PROBE_RANGE,
            CollisionLayers::environment(),
        ) {
            *momentum = strip_normal_axes(*momentum, hit.normal);
        }

        *momentum = move_towards(*momentum, zero, tug_step);
        self.apply_displacement(*momentum);
        *momentum
    }

    /// Fixed-rate gravity. Standing on something eases the feet down onto it
    /// half the gap per tick; otherwise fall speed builds toward terminal.
    pub fn fixed_update<W>(&mut self, dt: f32, world: &W)
    where
        W: SpatialQuery + ?Sized,
    {
        if !self.gravity_enabled {
            return;
        }

        match self.probe_ground(world) {
            Some(ground_y) => {
                self.fall_velocity = 0.0;
                self.grounded = true;

                let rest_y = ground_y + GROUND_CLEARANCE;
                let gap = self.position.y - rest_y;
                if gap > GROUND_CLEARANCE {
                    self.apply_displacement(vec3(0.0, -gap / 2.0, 0.0));
                }
            }
            None => {
                self.grounded = false;
                self.fall_velocity =
                    (self.fall_velocity - dt * self.gravity_strength).max(-TERMINAL_FALL_SPEED);
                self.apply_displacement(vec3(0.0, self.fall_velocity, 0.0));

                if self.probe_ground(world).is_some() {
                    self.fall_velocity = 0.0;
                }
            }
        }
    }

    fn probe_ground<W>(&self, world: &W) -> Option<f32>
    where
        W: SpatialQuery + ?Sized,
    {
        let origin = self.position + vec3(0.0, GROUND_PROBE_HEIGHT, 0.0);
        world
            .raycast(
                origin,
                DOWN,
                GROUND_PROBE_RANGE,
                CollisionLayers::environment(),
            )
            .map(|hit| hit.point.y)
    }

    /// Put the player back at the respawn anchor after falling out of the
    /// world. Returns true when that happened.
    pub fn enforce_bounds(&mut self) -> bool {
        if self.position.y >= RESPAWN_FLOOR_Y {
            return false;
        }

        engine::motion_log!(
            INFO,
            "player fell out of bounds at {:?}, respawning at {:?}",
            self.position,
            self.respawn_anchor
        );
        self.position = self.respawn_anchor;
        self.fall_velocity = 0.0;
        true
    }
}
