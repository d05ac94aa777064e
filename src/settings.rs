//! Simulation configuration
//!
//! Loaded from / saved to JSON. Missing fields fall back to the defaults in
//! [`crate::consts`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::PlaneScale;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Bodies spawned during population
    pub body_count: u32,
    /// Physics sub-steps per tick (R)
    pub resolution: u32,
    /// Frame deltas above this (seconds) are clamped to zero
    pub stall_threshold: f64,

    // === Spawning ===
    /// Gap between a spawned body and the boundary (plane units)
    pub spawn_margin: f32,
    /// radius = sqrt(mass / π) * radius_scale
    pub radius_scale: f32,
    /// Mass range [mass_min, mass_max)
    pub mass_min: f64,
    pub mass_max: f64,
    /// Velocity components drawn from [0, max_speed) (pixels/s)
    pub max_speed: f32,
    /// Candidates tried per body before giving up
    pub max_placement_attempts: u32,
    /// RNG seed for reproducible runs
    pub seed: u64,

    /// Window the plane is stretched over
    pub plane: PlaneScale,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            body_count: BODY_COUNT,
            resolution: RESOLUTION,
            stall_threshold: STALL_THRESHOLD,

            spawn_margin: SPAWN_MARGIN,
            radius_scale: RADIUS_SCALE,
            mass_min: MASS_MIN,
            mass_max: MASS_MAX,
            max_speed: MAX_SPEED,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            seed: DEFAULT_SEED,

            plane: PlaneScale::default(),
        }
    }
}

impl SimConfig {
    /// Default config with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Largest radius a spawned body can have
    pub fn max_radius(&self) -> f32 {
        (self.mass_max / std::f64::consts::PI).sqrt() as f32 * self.radius_scale
    }

    /// Reject configs that cannot produce a valid simulation
    pub fn validate(&self) -> SimResult<()> {
        if self.resolution == 0 {
            return Err(SimError::InvalidConfig("resolution must be at least 1".into()));
        }
        if !(self.stall_threshold >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "stall_threshold {} must be >= 0",
                self.stall_threshold
            )));
        }
        if !(self.mass_min > 0.0) || !(self.mass_max > self.mass_min) || !self.mass_max.is_finite()
        {
            return Err(SimError::InvalidConfig(format!(
                "mass range [{}, {}) must be positive and non-empty",
                self.mass_min, self.mass_max
            )));
        }
        if !(self.radius_scale > 0.0) {
            return Err(SimError::InvalidConfig("radius_scale must be > 0".into()));
        }
        if !(self.spawn_margin >= 0.0) {
            return Err(SimError::InvalidConfig("spawn_margin must be >= 0".into()));
        }
        if !(self.max_speed > 0.0) {
            return Err(SimError::InvalidConfig("max_speed must be > 0".into()));
        }
        if self.max_placement_attempts == 0 {
            return Err(SimError::InvalidConfig(
                "max_placement_attempts must be at least 1".into(),
            ));
        }
        if !(self.plane.width_px > 0.0) || !(self.plane.height_px > 0.0) {
            return Err(SimError::InvalidConfig("plane size must be positive".into()));
        }

        // Largest body must still fit inside the boundary on both axes
        let radius_x = self.max_radius();
        let radius_y = radius_x * self.plane.aspect();
        let limit = BOUNDARY_EXTENT - self.spawn_margin;
        if radius_x >= limit || radius_y >= limit {
            return Err(SimError::InvalidConfig(format!(
                "largest body (radius {radius_x:.3} x {radius_y:.3}) does not fit the plane"
            )));
        }

        Ok(())
    }

    /// Parse a config from JSON
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config to a file
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
