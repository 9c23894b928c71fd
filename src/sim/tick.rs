//! Simulation step
//!
//! Advances the world by one time step: rotate the hexagon, derive the walls
//! at the new angle, integrate the ball, resolve collisions, commit.

use super::collision::{ContactEvent, resolve};
use super::integrator::integrate;
use super::state::World;
use crate::error::Result;
use crate::settings::SimulationConfig;

/// Result of one step, with the contacts resolved along the way
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub world: World,
    pub contacts: Vec<ContactEvent>,
    /// Whether the ball had to be clamped inside after the pass budget ran out
    pub clamped: bool,
}

impl StepOutcome {
    /// Whether the ball touched a wall this step
    pub fn collided(&self) -> bool {
        !self.contacts.is_empty()
    }
}

/// Advance the world by `dt`, reporting contacts
///
/// Fails only when `dt` is not a positive finite number.
pub fn advance(world: &World, config: &SimulationConfig, dt: f32) -> Result<StepOutcome> {
    // Walls must be evaluated at the same angle as the wall velocities
    let hexagon = world.hexagon.rotated(dt);
    let walls = hexagon.walls();

    let candidate = integrate(&world.ball, config, dt)?;
    let resolution = resolve(&candidate, &walls, &hexagon, config, dt);

    Ok(StepOutcome {
        world: World {
            hexagon,
            ball: resolution.ball,
            time_ticks: world.time_ticks + 1,
        },
        contacts: resolution.contacts,
        clamped: resolution.clamped,
    })
}

/// Advance the world by `dt`
pub fn step(world: &World, config: &SimulationConfig, dt: f32) -> Result<World> {
    Ok(advance(world, config, dt)?.world)
}
