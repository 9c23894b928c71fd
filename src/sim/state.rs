//! Simulation state
//!
//! Everything a presentation layer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hexagon::HexagonState;
use crate::settings::SimulationConfig;

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed for the run
    pub radius: f32,
}

impl BallState {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Complete simulation state threaded through successive steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub hexagon: HexagonState,
    pub ball: BallState,
    /// Steps taken since the world was created
    pub time_ticks: u64,
}

impl World {
    /// Ball at the hexagon center with the configured launch velocity
    pub fn new(config: &SimulationConfig) -> Self {
        let hexagon = HexagonState::from_config(config);
        Self {
            hexagon,
            ball: BallState::new(hexagon.center, config.initial_velocity, config.ball_radius),
            time_ticks: 0,
        }
    }

    /// Smallest wall clearance (negative means the ball overlaps a wall)
    pub fn min_clearance(&self) -> f32 {
        self.hexagon
            .walls()
            .iter()
            .map(|wall| wall.clearance(self.ball.position, self.ball.radius))
            .fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_starts_at_center() {
        let config = SimulationConfig {
            center: Vec2::new(400.0, 300.0),
            initial_velocity: Vec2::new(180.0, -120.0),
            ..Default::default()
        };
        let world = World::new(&config);
        assert_eq!(world.ball.position, config.center);
        assert_eq!(world.ball.velocity, config.initial_velocity);
        assert_eq!(world.ball.radius, config.ball_radius);
        assert_eq!(world.hexagon.rotation_angle, 0.0);
        assert_eq!(world.time_ticks, 0);
    }

    #[test]
    fn test_min_clearance_at_center() {
        let world = World::new(&SimulationConfig::default());
        let expected = world.hexagon.apothem() - world.ball.radius;
        assert!((world.min_clearance() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_world_serializes() {
        let world = World::new(&SimulationConfig::default());
        let json = serde_json::to_string(&world).expect("serialize");
        let back: World = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, world);
    }
}
