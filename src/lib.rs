//! Hexabounce - a ball bouncing inside a spinning hexagon
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, integration, collisions, stepping)
//! - `settings`: Run configuration with validation and JSON load/save
//! - `error`: Error taxonomy shared by configuration and stepping
//!
//! Drawing, input and frame timing belong to the caller: each frame it calls
//! [`sim::step`] (or [`sim::advance`]) and reads back the ball and the
//! hexagon's rotation angle.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::SimulationConfig;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Number of hexagon walls
    pub const SIDES: usize = 6;
    /// Angle of vertex 0 relative to the rotation angle (flat-topped hexagon)
    pub const VERTEX_ANGLE_OFFSET: f32 = std::f32::consts::FRAC_PI_6;
    /// Angle between consecutive vertices
    pub const VERTEX_ANGLE_STEP: f32 = std::f32::consts::FRAC_PI_3;

    /// Default fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the fixed-step clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default hexagon circumradius
    pub const HEXAGON_RADIUS: f32 = 300.0;
    /// Default hexagon spin (radians per second, counter-clockwise)
    pub const HEXAGON_ANGULAR_VELOCITY: f32 = 1.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 500.0;
    /// Linear air drag per second (0.999 per frame at 60 Hz)
    pub const DRAG_COEFFICIENT: f32 = 0.06;
    /// Bounciness against the walls
    pub const RESTITUTION: f32 = 0.8;

    /// Collision resolution passes before the ball is clamped inside
    pub const MAX_RESOLUTION_PASSES: u32 = 4;
    /// Wall-frame normal speed below which a contact is treated as resting
    pub const RESTING_VELOCITY_THRESHOLD: f32 = 1.0;
    /// Penetration smaller than this counts as touching (f32 round-off)
    pub const PENETRATION_TOLERANCE: f32 = 1e-4;
    /// Segments shorter than this are treated as a single point
    pub const MIN_SEGMENT_LENGTH: f32 = 1e-4;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// 2D cross product of a scalar angular velocity with a radius vector (ω × r)
#[inline]
pub fn perp_scaled(omega: f32, r: Vec2) -> Vec2 {
    Vec2::new(-omega * r.y, omega * r.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        let tiny = wrap_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }
}
