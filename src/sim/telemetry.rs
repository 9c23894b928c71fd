//! Run statistics for a display layer
//!
//! Pure bookkeeping over step outcomes; never feeds back into physics.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use super::tick::StepOutcome;

/// Speeds kept for the rolling average
pub const RECENT_SPEEDS: usize = 10;
/// Steps between speed history samples
pub const HISTORY_INTERVAL: u64 = 10;
/// Maximum speed history samples
pub const HISTORY_LENGTH: usize = 30;
/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Telemetry {
    /// Contacts resolved since the run started
    pub collisions: u64,
    /// Steps whose ball had to be clamped inside
    pub clamps: u64,
    pub max_speed: f32,
    steps: u64,
    recent_speeds: VecDeque<f32>,
    speed_history: VecDeque<f32>,
    /// Ball positions, newest first
    trail: VecDeque<Vec2>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one step
    pub fn record(&mut self, outcome: &StepOutcome) {
        let ball = &outcome.world.ball;
        let speed = ball.speed();

        self.steps += 1;
        self.collisions += outcome.contacts.len() as u64;
        if outcome.clamped {
            self.clamps += 1;
        }
        self.max_speed = self.max_speed.max(speed);

        self.recent_speeds.push_back(speed);
        if self.recent_speeds.len() > RECENT_SPEEDS {
            self.recent_speeds.pop_front();
        }

        if self.steps % HISTORY_INTERVAL == 0 {
            self.speed_history.push_back(speed);
            if self.speed_history.len() > HISTORY_LENGTH {
                self.speed_history.pop_front();
            }
        }

        self.trail.push_front(ball.position);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_back();
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Rolling average over the last few steps
    pub fn average_speed(&self) -> f32 {
        if self.recent_speeds.is_empty() {
            return 0.0;
        }
        self.recent_speeds.iter().sum::<f32>() / self.recent_speeds.len() as f32
    }

    pub fn history_average(&self) -> Option<f32> {
        if self.speed_history.is_empty() {
            return None;
        }
        Some(self.speed_history.iter().sum::<f32>() / self.speed_history.len() as f32)
    }

    pub fn history_min(&self) -> Option<f32> {
        self.speed_history.iter().copied().reduce(f32::min)
    }

    /// Speed change per unit time between the last two history samples
    pub fn acceleration(&self, dt: f32) -> Option<f32> {
        let n = self.speed_history.len();
        if n < 2 {
            return None;
        }
        let delta = self.speed_history[n - 1] - self.speed_history[n - 2];
        Some(delta / (HISTORY_INTERVAL as f32 * dt))
    }

    pub fn speed_history(&self) -> impl Iterator<Item = f32> + '_ {
        self.speed_history.iter().copied()
    }

    pub fn trail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.trail.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimulationConfig;
    use crate::sim::state::World;

    fn outcome_with_speed(speed: f32, step: u64) -> StepOutcome {
        let mut world = World::new(&SimulationConfig::default());
        world.ball.velocity = Vec2::new(speed, 0.0);
        world.ball.position = Vec2::new(step as f32, 0.0);
        StepOutcome {
            world,
            contacts: Vec::new(),
            clamped: false,
        }
    }

    #[test]
    fn test_rolling_average_window() {
        let mut telemetry = Telemetry::new();
        for i in 0..15 {
            telemetry.record(&outcome_with_speed(i as f32, i));
        }
        // Last ten speeds are 5..=14
        assert!((telemetry.average_speed() - 9.5).abs() < 1e-4);
        assert_eq!(telemetry.max_speed, 14.0);
        assert_eq!(telemetry.steps(), 15);
    }

    #[test]
    fn test_history_sampling_and_acceleration() {
        let mut telemetry = Telemetry::new();
        for i in 1..=20u64 {
            telemetry.record(&outcome_with_speed(i as f32 * 2.0, i));
        }
        let history: Vec<f32> = telemetry.speed_history().collect();
        assert_eq!(history, vec![20.0, 40.0]);
        assert_eq!(telemetry.history_min(), Some(20.0));
        assert_eq!(telemetry.history_average(), Some(30.0));
        // 20 units over 10 steps of 0.1
        assert!((telemetry.acceleration(0.1).unwrap() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_history_and_trail_are_bounded() {
        let mut telemetry = Telemetry::new();
        for i in 1..=1000u64 {
            telemetry.record(&outcome_with_speed(1.0, i));
        }
        assert_eq!(telemetry.speed_history().count(), HISTORY_LENGTH);
        assert_eq!(telemetry.trail().count(), TRAIL_LENGTH);
        assert_eq!(telemetry.trail().next(), Some(Vec2::new(1000.0, 0.0)));
    }

    #[test]
    fn test_counts_collisions_from_real_steps() {
        let config = SimulationConfig::default();
        let mut world = World::new(&config);
        let mut telemetry = Telemetry::new();
        let mut expected = 0;
        for _ in 0..300 {
            let outcome = crate::sim::advance(&world, &config, config.time_step).unwrap();
            expected += outcome.contacts.len() as u64;
            telemetry.record(&outcome);
            world = outcome.world;
        }
        assert!(expected > 0);
        assert_eq!(telemetry.collisions, expected);
        assert!(telemetry.acceleration(config.time_step).is_some());
    }
}
