//! Simulation configuration
//!
//! Fixed for the duration of a run. Loaded from JSON (missing fields take
//! the defaults) and validated before the first step.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::HexagonState;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === Ball dynamics ===
    /// Downward acceleration (units/time², acts along -y)
    pub gravity: f32,
    /// Linear drag per unit time, in [0, 1)
    pub drag_coefficient: f32,
    /// Normal-velocity restitution against the walls, in (0, 1]
    pub restitution: f32,

    // === Hexagon ===
    /// Signed spin (radians/time, positive is counter-clockwise)
    pub angular_velocity: f32,
    /// Distance from center to each vertex
    pub circumradius: f32,
    /// Fixed rotation center
    pub center: Vec2,

    // === Ball ===
    pub ball_radius: f32,
    /// Launch velocity when a world is created from this config
    pub initial_velocity: Vec2,

    // === Stepping ===
    /// Fixed step size used by the frame clock
    pub time_step: f32,
    /// Collision passes per step before the ball is clamped inside
    pub max_resolution_passes: u32,
    /// Wall-frame normal speed below which contacts do not bounce
    pub resting_velocity_threshold: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag_coefficient: DRAG_COEFFICIENT,
            restitution: RESTITUTION,

            angular_velocity: HEXAGON_ANGULAR_VELOCITY,
            circumradius: HEXAGON_RADIUS,
            center: Vec2::ZERO,

            ball_radius: BALL_RADIUS,
            initial_velocity: Vec2::ZERO,

            time_step: SIM_DT,
            max_resolution_passes: MAX_RESOLUTION_PASSES,
            resting_velocity_threshold: RESTING_VELOCITY_THRESHOLD,
        }
    }
}

impl SimulationConfig {
    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("gravity", self.gravity),
            ("drag_coefficient", self.drag_coefficient),
            ("restitution", self.restitution),
            ("angular_velocity", self.angular_velocity),
            ("circumradius", self.circumradius),
            ("ball_radius", self.ball_radius),
            ("time_step", self.time_step),
            ("resting_velocity_threshold", self.resting_velocity_threshold),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(SimError::invalid(field, format!("must be finite, got {value}")));
            }
        }
        if !self.center.is_finite() {
            return Err(SimError::invalid("center", "must be finite"));
        }
        if !self.initial_velocity.is_finite() {
            return Err(SimError::invalid("initial_velocity", "must be finite"));
        }

        if self.time_step <= 0.0 {
            return Err(SimError::invalid(
                "time_step",
                format!("must be positive, got {}", self.time_step),
            ));
        }
        if self.circumradius <= 0.0 {
            return Err(SimError::invalid(
                "circumradius",
                format!("must be positive, got {}", self.circumradius),
            ));
        }
        if self.ball_radius <= 0.0 {
            return Err(SimError::invalid(
                "ball_radius",
                format!("must be positive, got {}", self.ball_radius),
            ));
        }
        if self.ball_radius >= self.circumradius {
            return Err(SimError::invalid(
                "ball_radius",
                format!(
                    "must be smaller than circumradius {}, got {}",
                    self.circumradius, self.ball_radius
                ),
            ));
        }
        if !(self.restitution > 0.0 && self.restitution <= 1.0) {
            return Err(SimError::invalid(
                "restitution",
                format!("must be in (0, 1], got {}", self.restitution),
            ));
        }
        if !(0.0..1.0).contains(&self.drag_coefficient) {
            return Err(SimError::invalid(
                "drag_coefficient",
                format!("must be in [0, 1), got {}", self.drag_coefficient),
            ));
        }
        if self.drag_coefficient * self.time_step >= 1.0 {
            return Err(SimError::invalid(
                "drag_coefficient",
                "drag over one time_step would reverse the velocity",
            ));
        }
        if self.max_resolution_passes < 1 {
            return Err(SimError::invalid("max_resolution_passes", "must be at least 1"));
        }
        if self.resting_velocity_threshold < 0.0 {
            return Err(SimError::invalid(
                "resting_velocity_threshold",
                format!("must be non-negative, got {}", self.resting_velocity_threshold),
            ));
        }

        // Numerical degeneracy: collapsed edges or no room for the ball
        let hexagon = HexagonState::from_config(self);
        if hexagon.walls().iter().any(|wall| wall.length() <= MIN_SEGMENT_LENGTH) {
            return Err(SimError::invalid(
                "circumradius",
                format!("{} produces zero-length walls", self.circumradius),
            ));
        }
        if self.ball_radius >= hexagon.apothem() {
            return Err(SimError::invalid(
                "ball_radius",
                format!(
                    "{} does not fit between opposite walls (apothem {})",
                    self.ball_radius,
                    hexagon.apothem()
                ),
            ));
        }

        Ok(())
    }

    /// Gravity as an acceleration vector (y-up world)
    #[inline]
    pub fn gravity_vector(&self) -> Vec2 {
        Vec2::new(0.0, -self.gravity)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
