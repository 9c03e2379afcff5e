use cgmath::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// The two tracked controller slots. Slot order is also processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSlot {
    Right = 0,
    Left = 1,
}

impl HandSlot {
    pub const ALL: [HandSlot; 2] = [HandSlot::Right, HandSlot::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn other(self) -> HandSlot {
        match self {
            HandSlot::Right => HandSlot::Left,
            HandSlot::Left => HandSlot::Right,
        }
    }
}

/// One frame of tracking and trigger data for a hand
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub trigger_value: f32,
}

impl Hand {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            trigger_value: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputContext {
    pub right_hand: Hand,
    pub left_hand: Hand,
}

impl InputContext {
    pub fn hand(&self, slot: HandSlot) -> &Hand {
        match slot {
            HandSlot::Right => &self.right_hand,
            HandSlot::Left => &self.left_hand,
        }
    }
}
