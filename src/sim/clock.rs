//! Fixed timestep clock
//!
//! Turns variable frame durations into a whole number of fixed simulation
//! steps, carrying the remainder to the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Clock running fixed steps of `step` seconds; the step must be positive
    pub fn new(step: f32) -> Result<Self> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(SimError::invalid("time_step", format!("must be positive, got {}", step)));
        }
        Ok(Self {
            step,
            accumulator: 0.0,
        })
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's duration; returns how many fixed steps to run
    ///
    /// Long frames are clamped and at most `MAX_SUBSTEPS` steps run per
    /// frame to prevent a spiral of death. Leftover time beyond the cap is
    /// dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !(frame_dt > 0.0) {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.step {
            log::debug!("Frame clock behind by {:.4}s, dropping", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Fraction of a step left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
