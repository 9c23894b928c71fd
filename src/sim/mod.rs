//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Geometry derived from the raw rotation angle only
//! - Bounded work per step (fixed collision pass budget)
//! - No rendering, input or platform dependencies

pub mod clock;
pub mod collision;
pub mod hexagon;
pub mod integrator;
pub mod state;
pub mod telemetry;
pub mod tick;

pub use clock::FixedTimestep;
pub use collision::{
    Contact, ContactEvent, ContactFeature, ContactResponse, Resolution, closest_point_on_segment,
    detect_contacts, reflect_in_wall_frame, resolve, wall_velocity_at,
};
pub use hexagon::{HexagonState, WallSegment, vertices_at, walls_at};
pub use integrator::integrate;
pub use state::{BallState, World};
pub use telemetry::Telemetry;
pub use tick::{StepOutcome, advance, step};
