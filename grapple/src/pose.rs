use cgmath::{InnerSpace, Quaternion, Vector3, vec3};
use serde::{Deserialize, Serialize};

pub const FORWARD: Vector3<f32> = vec3(0.0, 0.0, -1.0);
pub const UP: Vector3<f32> = vec3(0.0, 1.0, 0.0);
pub const RIGHT: Vector3<f32> = vec3(1.0, 0.0, 0.0);

/// Position and orientation in world space. Forward is -Z, up is +Y.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Pose { position, rotation }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Pose::new(position, Quaternion::new(1.0, 0.0, 0.0, 0.0))
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * FORWARD
    }

    pub fn up(&self) -> Vector3<f32> {
        self.rotation * UP
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation * RIGHT
    }
}

/// Rotation that turns `FORWARD` to face `direction`
pub fn look_rotation(direction: Vector3<f32>) -> Quaternion<f32> {
    if direction.magnitude2() <= f32::EPSILON {
        return Quaternion::new(1.0, 0.0, 0.0, 0.0);
    }
    Quaternion::from_arc(FORWARD, direction.normalize(), Some(UP))
}
