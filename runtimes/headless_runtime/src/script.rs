// Keyframed controller input for headless runs. Each keyframe holds until the
// next one; hand offsets are relative to the player's feet so the hands follow
// the body as it is pulled around.

use std::path::Path;

use anyhow::Context;
use cgmath::{Deg, Quaternion, Rotation3, Vector3, vec3};
use grapple::{Hand, InputContext};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptHand {
    pub offset: [f32; 3],
    /// Turn about +Y; positive turns forward toward -X
    pub yaw_degrees: f32,
    /// Tilt about +X; positive aims up
    pub pitch_degrees: f32,
    pub trigger: f32,
}

impl Default for ScriptHand {
    fn default() -> Self {
        ScriptHand {
            offset: [0.0, 1.5, 0.0],
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            trigger: 0.0,
        }
    }
}

impl ScriptHand {
    fn to_hand(self, player_position: Vector3<f32>) -> Hand {
        let [x, y, z] = self.offset;
        Hand {
            position: player_position + vec3(x, y, z),
            rotation: Quaternion::from_angle_y(Deg(self.yaw_degrees))
                * Quaternion::from_angle_x(Deg(self.pitch_degrees)),
            trigger_value: self.trigger,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u64,
    #[serde(default)]
    pub right_hand: ScriptHand,
    #[serde(default)]
    pub left_hand: ScriptHand,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub keyframes: Vec<Keyframe>,
}

impl InputScript {
    pub fn load(path: &Path) -> anyhow::Result<InputScript> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        InputScript::from_json_str(&json)
            .with_context(|| format!("parsing input script {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<InputScript> {
        let mut script: InputScript = serde_json::from_str(json)?;
        script.keyframes.sort_by_key(|keyframe| keyframe.frame);
        Ok(script)
    }

    /// Swing at the wall with the right hand, let go, then turn around and
    /// reel in the crate behind the start with the left.
    pub fn demo() -> InputScript {
        let idle = ScriptHand::default();
        let wall = ScriptHand {
            offset: [0.3, 1.5, 0.0],
            ..ScriptHand::default()
        };
        let crate_aim = ScriptHand {
            offset: [-0.3, 1.2, 0.0],
            yaw_degrees: 180.0,
            ..ScriptHand::default()
        };

        InputScript {
            keyframes: vec![
                Keyframe {
                    frame: 0,
                    right_hand: wall,
                    left_hand: idle,
                },
                Keyframe {
                    frame: 10,
                    right_hand: ScriptHand { trigger: 1.0, ..wall },
                    left_hand: idle,
                },
                Keyframe {
                    frame: 140,
                    right_hand: wall,
                    left_hand: crate_aim,
                },
                Keyframe {
                    frame: 260,
                    right_hand: idle,
                    left_hand: ScriptHand { trigger: 1.0, ..crate_aim },
                },
                Keyframe {
                    frame: 320,
                    right_hand: idle,
                    left_hand: crate_aim,
                },
            ],
        }
    }

    /// Input for `frame`: the latest keyframe at or before it, or idle hands
    /// before the first one.
    pub fn input_at(&self, frame: u64, player_position: Vector3<f32>) -> InputContext {
        let keyframe = self
            .keyframes
            .iter()
            .take_while(|keyframe| keyframe.frame <= frame)
            .last();

        match keyframe {
            Some(keyframe) => InputContext {
                right_hand: keyframe.right_hand.to_hand(player_position),
                left_hand: keyframe.left_hand.to_hand(player_position),
            },
            None => InputContext {
                right_hand: ScriptHand::default().to_hand(player_position),
                left_hand: ScriptHand::default().to_hand(player_position),
            },
        }
    }
}
