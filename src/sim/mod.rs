//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Seeded RNG only, passed explicitly
//! - Stable iteration order (body list order)
//! - No rendering, audio, or platform dependencies

pub mod boundary;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boundary::{apply_boundary, handle_out_of_bounds};
pub use collision::{collides, one_dimensional_collision, resolve, rotate_body_axis};
pub use spawn::Spawner;
pub use state::{
    Body, BodySnapshot, RngState, SimEvent, SimPhase, SimSnapshot, Simulation, pair_mut,
};
pub use tick::{effective_dt, handle_collisions, integrate, tick};

use crate::error::SimResult;
use crate::settings::SimConfig;

/// Create and populate a simulation with default settings
pub fn initialize(body_count: u32) -> SimResult<Simulation> {
    Simulation::initialize(body_count, SimConfig::default())
}
