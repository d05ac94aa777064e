//! Rigidbody Sim - elastic collisions between circles on a bounded plane
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, boundary, spawning, tick)
//! - `settings`: Data-driven simulation configuration
//! - `error`: Error and result types

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::SimConfig;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Simulation configuration constants
pub mod consts {
    /// Bodies spawned at startup
    pub const BODY_COUNT: u32 = 20;
    /// Physics sub-steps per external tick
    pub const RESOLUTION: u32 = 10;

    /// Plane extends to ±BOUNDARY_EXTENT on both axes
    pub const BOUNDARY_EXTENT: f32 = 1.0;

    /// Frames slower than this (seconds) are treated as a stall and skipped
    pub const STALL_THRESHOLD: f64 = 0.1;

    /// Gap kept between a freshly spawned body and the boundary
    pub const SPAWN_MARGIN: f32 = 0.01;
    /// Area-to-radius scale: radius = sqrt(mass / π) * RADIUS_SCALE
    pub const RADIUS_SCALE: f32 = 0.01;
    /// Spawned mass range [MASS_MIN, MASS_MAX)
    pub const MASS_MIN: f64 = 1.0;
    pub const MASS_MAX: f64 = 255.0;
    /// Spawned velocity components are drawn from [0, MAX_SPEED) (pixels/s)
    pub const MAX_SPEED: f32 = 600.0;
    /// Candidates tried per body before placement gives up
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Default window the plane is mapped onto
    pub const DEFAULT_WIDTH_PX: f32 = 1600.0;
    pub const DEFAULT_HEIGHT_PX: f32 = 900.0;

    /// Default RNG seed
    pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;
}

/// Mapping between pixel distances (velocity units) and plane distances
///
/// The plane spans 2 units on each axis, stretched over the window, so one
/// pixel is `2 / width` plane units horizontally and `2 / height` vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneScale {
    pub width_px: f32,
    pub height_px: f32,
}

impl Default for PlaneScale {
    fn default() -> Self {
        Self {
            width_px: consts::DEFAULT_WIDTH_PX,
            height_px: consts::DEFAULT_HEIGHT_PX,
        }
    }
}

impl PlaneScale {
    /// Square plane (one pixel maps to the same distance on both axes)
    pub fn square(size_px: f32) -> Self {
        Self {
            width_px: size_px,
            height_px: size_px,
        }
    }

    /// Convert a pixel-space distance vector to plane units
    #[inline]
    pub fn px_to_plane(&self, d: Vec2) -> Vec2 {
        Vec2::new(d.x * 2.0 / self.width_px, d.y * 2.0 / self.height_px)
    }

    /// Width over height; scales `radius_x` into `radius_y` for round circles
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width_px / self.height_px
    }
}

/// Rotate the coordinate axes by `theta` and express `v` in the new frame
///
/// A vector pointing along angle `theta` ends up on the positive x-axis.
/// `rotate_axis(rotate_axis(v, theta), -theta)` returns `v`.
#[inline]
pub fn rotate_axis(v: Vec2, theta: f32) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    Vec2::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos)
}

/// Angle of the line from `to` to `from`, in [-π, π]
///
/// Coincident points have no direction; they fall back to 0.
#[inline]
pub fn collision_angle(from: Vec2, to: Vec2) -> f32 {
    let delta = from - to;
    if delta == Vec2::ZERO {
        return 0.0;
    }
    delta.y.atan2(delta.x)
}
