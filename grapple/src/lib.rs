// Dual-hand grappling hook
//
// Each tracked hand can fire a tethered hook, anchor it to a surface (and be
// pulled toward it) or to a movable object (and reel it in). Collision, object
// spawning and rendering are reached through the traits in `services`; the
// rapier-backed `physics::PhysicsWorld` implements all of them.

pub mod config;
pub mod controller;
pub mod error;
pub mod hand_state;
pub mod hook;
pub mod input_context;
pub mod physics;
pub mod player_motion;
pub mod pose;
pub mod reticle;
pub mod rope;
pub mod services;
pub mod time;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GrappleConfig;
pub use controller::{GrappleController, GrappleSnapshot};
pub use error::GrappleError;
pub use hand_state::{GrapplePhase, HandGrappleState};
pub use input_context::{Hand, HandSlot, InputContext};
pub use pose::Pose;
pub use time::{FixedStepper, Time};
