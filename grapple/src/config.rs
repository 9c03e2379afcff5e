use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GrappleError;

/// Tuning values read once at startup and held constant for the session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrappleConfig {
    /// Forward impulse given to a freshly fired hook, also the reel-in speed of pulled objects
    pub fire_speed: f32,
    /// Speed the player is pulled toward a hooked anchor
    pub pull_speed: f32,
    /// Trigger value that must be exceeded to fire, in [0, 1]
    pub trigger_sensitivity: f32,
    /// Maximum rope length before the hook lets go
    pub grapple_length: f32,
    /// Half-width of the rope ribbon
    pub rope_thickness: f32,
    /// Downward acceleration applied per fixed tick while falling
    pub gravity_strength: f32,
}

impl Default for GrappleConfig {
    fn default() -> Self {
        GrappleConfig {
            fire_speed: 20.0,
            pull_speed: 8.0,
            trigger_sensitivity: 0.5,
            grapple_length: 30.0,
            rope_thickness: 0.02,
            gravity_strength: 0.5,
        }
    }
}

impl GrappleConfig {
    pub fn from_json_str(json: &str) -> Result<Self, GrappleError> {
        let config: GrappleConfig =
            serde_json::from_str(json).map_err(|e| GrappleError::parse("grapple config", e))?;
        config.validated()
    }

    pub fn load(path: &Path) -> Result<Self, GrappleError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GrappleError::io(format!("read {}", path.display()), e))?;
        Self::from_json_str(&json)
    }

    /// Check every value and return the config with its sensitivity clamped to [0, 1]
    pub fn validated(mut self) -> Result<Self, GrappleError> {
        self.validate()?;
        self.trigger_sensitivity = self.trigger_sensitivity.clamp(0.0, 1.0);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), GrappleError> {
        require_positive("fire_speed", self.fire_speed)?;
        require_positive("pull_speed", self.pull_speed)?;
        require_positive("grapple_length", self.grapple_length)?;
        require_non_negative("rope_thickness", self.rope_thickness)?;
        require_non_negative("gravity_strength", self.gravity_strength)?;

        if !self.trigger_sensitivity.is_finite() {
            return Err(GrappleError::config(
                "trigger_sensitivity",
                format!("must be finite, got {}", self.trigger_sensitivity),
            ));
        }

        if self.grapple_length <= crate::hand_state::MIN_ROPE_LENGTH {
            return Err(GrappleError::config(
                "grapple_length",
                format!(
                    "must exceed the minimum rope length {}, got {}",
                    crate::hand_state::MIN_ROPE_LENGTH,
                    self.grapple_length
                ),
            ));
        }

        Ok(())
    }

    /// Rate at which release momentum bleeds off
    pub fn tug_speed(&self) -> f32 {
        self.pull_speed / 6.0
    }
}

fn require_positive(field: &str, value: f32) -> Result<(), GrappleError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GrappleError::config(
            field,
            format!("must be a positive number, got {}", value),
        ))
    }
}

fn require_non_negative(field: &str, value: f32) -> Result<(), GrappleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GrappleError::config(
            field,
            format!("must be zero or positive, got {}", value),
        ))
    }
}
