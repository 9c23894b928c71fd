//! Ball kinematics
//!
//! Semi-implicit Euler with linear drag: the velocity is updated first and
//! the new velocity moves the ball, which keeps repeated bounces stable.

use super::state::BallState;
use crate::error::{Result, SimError};
use crate::settings::SimulationConfig;

/// Advance the ball one step under gravity and drag, ignoring walls
///
/// Returns the candidate state for collision resolution; the input is left
/// untouched.
pub fn integrate(ball: &BallState, config: &SimulationConfig, dt: f32) -> Result<BallState> {
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(SimError::invalid("dt", format!("must be positive and finite, got {dt}")));
    }

    let velocity =
        ball.velocity * (1.0 - config.drag_coefficient * dt) + config.gravity_vector() * dt;
    let position = ball.position + velocity * dt;

    Ok(BallState {
        position,
        velocity,
        radius: ball.radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn config(gravity: f32, drag: f32) -> SimulationConfig {
        SimulationConfig {
            gravity,
            drag_coefficient: drag,
            ..Default::default()
        }
    }

    #[test]
    fn test_free_fall_uses_updated_velocity() {
        let ball = BallState::new(Vec2::ZERO, Vec2::ZERO, 10.0);
        let next = integrate(&ball, &config(500.0, 0.0), 0.1).unwrap();
        assert!((next.velocity.y + 50.0).abs() < 1e-4);
        // Position moves with the new velocity, not the old one
        assert!((next.position.y + 5.0).abs() < 1e-4);
        assert_eq!(next.position.x, 0.0);
    }

    #[test]
    fn test_drag_scales_velocity() {
        let ball = BallState::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10.0);
        let next = integrate(&ball, &config(0.0, 0.5), 0.1).unwrap();
        assert!((next.velocity.x - 95.0).abs() < 1e-4);
        assert!((next.position.x - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_input_untouched() {
        let ball = BallState::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 10.0);
        let copy = ball;
        let _ = integrate(&ball, &SimulationConfig::default(), 1.0 / 60.0).unwrap();
        assert_eq!(ball, copy);
    }

    #[test]
    fn test_rejects_bad_dt() {
        let ball = BallState::new(Vec2::ZERO, Vec2::ZERO, 10.0);
        for dt in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let err = integrate(&ball, &SimulationConfig::default(), dt).unwrap_err();
            assert!(err.is_configuration());
        }
    }
}
