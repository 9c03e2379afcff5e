use cgmath::{Quaternion, Vector3, vec3};

use crate::{
    input_context::Hand,
    pose::{Pose, look_rotation},
    services::{CollisionLayers, SpatialQuery},
};

/// Aim marker for one hand. Sits on the surface the hand points at and faces
/// back out of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reticle {
    visible: bool,
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
}

impl Reticle {
    pub fn new() -> Self {
        Reticle {
            visible: false,
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }

    /// Cast along the hand's forward axis. A hit shows the reticle there; a
    /// miss hides it and leaves the last position in place.
    pub fn aim<W>(&mut self, hand: &Hand, max_distance: f32, world: &W) -> bool
    where
        W: SpatialQuery + ?Sized,
    {
        let pose = hand.pose();
        match world.raycast(
            pose.position,
            pose.forward(),
            max_distance,
            CollisionLayers::grapple_targets(),
        ) {
            Some(hit) => {
                self.visible = true;
                self.position = hit.point;
                self.rotation = look_rotation(-hit.normal);
            }
            None => self.visible = false,
        }
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Where the reticle is, if it is showing
    pub fn visible_position(&self) -> Option<Vector3<f32>> {
        self.visible.then_some(self.position)
    }
}

impl Default for Reticle {
    fn default() -> Self {
        Reticle::new()
    }
}
