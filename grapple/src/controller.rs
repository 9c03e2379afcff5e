use cgmath::Vector3;
use serde::Serialize;

use crate::{
    config::GrappleConfig,
    error::GrappleError,
    hand_state::{GrapplePhase, HandGrappleState},
    hook::HookEvent,
    input_context::{HandSlot, InputContext},
    player_motion::PlayerMotion,
    reticle::Reticle,
    services::GrappleWorld,
    time::Time,
};

/// Per-frame summary, for debugging and headless runs
#[derive(Clone, Debug, Serialize)]
pub struct GrappleSnapshot {
    pub frame: u64,
    pub player_position: Vector3<f32>,
    pub fall_velocity: f32,
    pub gravity_enabled: bool,
    pub grounded: bool,
    pub last_hit: Option<Vector3<f32>>,
    pub hands: Vec<HandSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HandSnapshot {
    pub slot: HandSlot,
    pub phase: GrapplePhase,
    pub hook_position: Option<Vector3<f32>>,
    pub reticle: Option<Vector3<f32>>,
    pub rope_vertices: usize,
    pub slide_momentum: Vector3<f32>,
}

/// Owns both hands and the player body, and settles what the two hands do to
/// each other: only one hand can swing from a surface, and only one can be
/// reeling an object in.
pub struct GrappleController {
    config: GrappleConfig,
    hands: [HandGrappleState; 2],
    reticles: [Reticle; 2],
    motion: PlayerMotion,
    last_hit: Option<Vector3<f32>>,
    frame: u64,
}

impl GrappleController {
    pub fn new(config: GrappleConfig, player_start: Vector3<f32>) -> Result<Self, GrappleError> {
        let config = match config.validated() {
            Ok(config) => config,
            Err(err) => {
                engine::grapple_log!(ERROR, "rejecting grapple config: {}", err);
                return Err(err);
            }
        };

        engine::grapple_log!(INFO, "grapple ready, player at {:?}", player_start);
        Ok(GrappleController {
            motion: PlayerMotion::new(player_start, config.gravity_strength),
            config,
            hands: [
                HandGrappleState::new(HandSlot::Right),
                HandGrappleState::new(HandSlot::Left),
            ],
            reticles: [Reticle::new(), Reticle::new()],
            last_hit: None,
            frame: 0,
        })
    }

    pub fn config(&self) -> &GrappleConfig {
        &self.config
    }

    pub fn hand(&self, slot: HandSlot) -> &HandGrappleState {
        &self.hands[slot.index()]
    }

    pub fn reticle(&self, slot: HandSlot) -> &Reticle {
        &self.reticles[slot.index()]
    }

    pub fn motion(&self) -> &PlayerMotion {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut PlayerMotion {
        &mut self.motion
    }

    pub fn player_position(&self) -> Vector3<f32> {
        self.motion.position()
    }

    pub fn last_hit(&self) -> Option<Vector3<f32>> {
        self.last_hit
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// One frame. Hands are always handled right (slot 0) then left.
    pub fn update<W>(&mut self, input: &InputContext, time: &Time, world: &mut W)
    where
        W: GrappleWorld + ?Sized,
    {
        let dt = time.delta_secs();
        engine::input_log!(
            TRACE,
            "frame {} triggers right={:.2} left={:.2}",
            self.frame,
            input.right_hand.trigger_value,
            input.left_hand.trigger_value
        );

        for slot in HandSlot::ALL {
            self.hands[slot.index()].fire(input.hand(slot), &self.config, world);
        }

        for slot in HandSlot::ALL {
            let i = slot.index();
            if self.hands[i].is_pulling() {
                self.reticles[i].hide();
            } else if !self.hands[i].is_grip_engaged() {
                self.reticles[i].aim(input.hand(slot), self.config.grapple_length, &*world);
            }
        }

        for slot in HandSlot::ALL {
            match self.hands[slot.index()].advance_hook(dt, world) {
                Some(HookEvent::SurfaceHit { point, roof, .. }) => {
                    self.on_surface_hit(slot, point, roof, world)
                }
                Some(HookEvent::MovableHit { object, .. }) => {
                    self.hands[slot.other().index()].drop_pull(world);
                    self.hands[slot.index()].on_movable_hit(object, world);
                    self.reticles[slot.index()].hide();
                }
                None => (),
            }
        }

        let player_position = self.motion.position();
        for slot in HandSlot::ALL {
            let hand = input.hand(slot);
            let state = &mut self.hands[slot.index()];
            state.update_tether(hand, player_position, &self.config, dt, world);
            state.refresh_rope(hand, self.config.rope_thickness, world);
        }

        let right_hooked = self.hands[HandSlot::Right.index()].is_hooked();
        let left_hooked = self.hands[HandSlot::Left.index()].is_hooked();
        self.motion.set_gravity_enabled(!(right_hooked || left_hooked));

        if right_hooked ^ left_hooked {
            if let Some(target) = self.last_hit {
                self.motion.pull_towards(target, self.config.pull_speed * dt);
            }
        }

        let tug_step = self.config.tug_speed() * dt;
        for state in self.hands.iter_mut() {
            if !state.has_hook() {
                self.motion.slide(state.slide_momentum_mut(), tug_step, &*world);
            }
        }

        self.motion.enforce_bounds();
        self.frame += 1;
    }

    /// Gravity and ground contact, at the fixed rate
    pub fn fixed_update<W>(&mut self, dt: f32, world: &W)
    where
        W: GrappleWorld + ?Sized,
    {
        self.motion.fixed_update(dt, world);
    }

    fn on_surface_hit<W>(&mut self, slot: HandSlot, point: Vector3<f32>, roof: f32, world: &mut W)
    where
        W: GrappleWorld + ?Sized,
    {
        self.clear_other_hooked(slot);

        let reticle = self.reticles[slot.index()].visible_position();
        let player_position = self.motion.position();
        if let Some(anchor) =
            self.hands[slot.index()].on_surface_hit(point, roof, reticle, player_position, world)
        {
            self.last_hit = Some(anchor);
        }
    }

    fn clear_other_hooked(&mut self, slot: HandSlot) {
        self.hands[slot.other().index()].clear_hooked_flag();
    }

    pub fn snapshot(&self) -> GrappleSnapshot {
        let hands = HandSlot::ALL
            .iter()
            .map(|slot| {
                let state = &self.hands[slot.index()];
                HandSnapshot {
                    slot: *slot,
                    phase: state.phase(),
                    hook_position: state.hook().map(|hook| hook.position()),
                    reticle: self.reticles[slot.index()].visible_position(),
                    rope_vertices: state.rope().vertices().len(),
                    slide_momentum: state.slide_momentum(),
                }
            })
            .collect();

        GrappleSnapshot {
            frame: self.frame,
            player_position: self.motion.position(),
            fall_velocity: self.motion.fall_velocity(),
            gravity_enabled: self.motion.gravity_enabled(),
            grounded: self.motion.is_grounded(),
            last_hit: self.last_hit,
            hands,
        }
    }
}
