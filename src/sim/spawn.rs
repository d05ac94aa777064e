//! Random placement of new bodies
//!
//! Candidates are drawn until one overlaps no existing body, up to a fixed
//! number of attempts. The RNG is passed in so runs are reproducible.

use glam::Vec2;
use rand::Rng;

use super::collision::collides;
use super::state::Body;
use crate::consts::BOUNDARY_EXTENT;
use crate::error::{SimError, SimResult};
use crate::settings::SimConfig;
use crate::PlaneScale;

/// Generates non-overlapping bodies
#[derive(Debug, Clone)]
pub struct Spawner {
    pub mass_min: f64,
    pub mass_max: f64,
    pub radius_scale: f32,
    pub spawn_margin: f32,
    pub max_speed: f32,
    pub max_attempts: u32,
    pub plane: PlaneScale,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl Spawner {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            mass_min: config.mass_min,
            mass_max: config.mass_max,
            radius_scale: config.radius_scale,
            spawn_margin: config.spawn_margin,
            max_speed: config.max_speed,
            max_attempts: config.max_placement_attempts,
            plane: config.plane,
        }
    }

    /// Radius for a body of the given mass (area proportional to mass)
    #[inline]
    pub fn radius_for_mass(&self, mass: f64) -> f32 {
        (mass / std::f64::consts::PI).sqrt() as f32 * self.radius_scale
    }

    /// Draw one candidate body, ignoring overlap
    pub fn candidate<R: Rng + ?Sized>(&self, rng: &mut R, id: u32) -> SimResult<Body> {
        if !(self.mass_min > 0.0 && self.mass_min < self.mass_max) {
            return Err(SimError::InvalidConfig(format!(
                "mass range [{}, {}) is empty",
                self.mass_min, self.mass_max
            )));
        }
        let mass = rng.random_range(self.mass_min..self.mass_max);
        let radius_x = self.radius_for_mass(mass);
        let radius_y = radius_x * self.plane.aspect();

        let pos = Vec2::new(
            self.coordinate(rng, radius_x)?,
            self.coordinate(rng, radius_y)?,
        );
        let vel = Vec2::new(
            rng.random_range(0.0..self.max_speed),
            rng.random_range(0.0..self.max_speed),
        );

        Body::new(id, pos, radius_x, radius_y, vel, mass)
    }

    /// Uniform coordinate keeping the body `margin` away from both edges
    fn coordinate<R: Rng + ?Sized>(&self, rng: &mut R, radius: f32) -> SimResult<f32> {
        let lo = -BOUNDARY_EXTENT + radius + self.spawn_margin;
        let hi = BOUNDARY_EXTENT - radius - self.spawn_margin;
        if !(lo < hi) {
            return Err(SimError::InvalidConfig(format!(
                "body of radius {radius:.3} does not fit the plane"
            )));
        }
        Ok(rng.random_range(lo..hi))
    }

    /// Spawn a body that overlaps none of `existing`
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        existing: &[Body],
        rng: &mut R,
        id: u32,
    ) -> SimResult<Body> {
        for attempt in 1..=self.max_attempts {
            let body = self.candidate(rng, id)?;
            if existing.iter().all(|other| !collides(other, &body)) {
                if attempt > 1 {
                    log::debug!("Body {} placed after {} attempts", id, attempt);
                }
                return Ok(body);
            }
        }

        Err(SimError::PlacementExhausted {
            attempts: self.max_attempts,
            placed: existing.len(),
            requested: existing.len() as u32 + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_candidate_ranges() {
        let spawner = Spawner::default();
        let mut rng = Pcg32::seed_from_u64(1);

        for id in 0..500 {
            let body = spawner.candidate(&mut rng, id).unwrap();
            assert!(body.mass() >= 1.0 && body.mass() < 255.0);
            assert!((body.radius_x - spawner.radius_for_mass(body.mass())).abs() < 1e-6);
            assert!(body.pos.x - body.radius_x >= -1.0 + spawner.spawn_margin - 1e-6);
            assert!(body.pos.x + body.radius_x <= 1.0 - spawner.spawn_margin + 1e-6);
            assert!(body.pos.y - body.radius_y >= -1.0 + spawner.spawn_margin - 1e-6);
            assert!(body.pos.y + body.radius_y <= 1.0 - spawner.spawn_margin + 1e-6);
            assert!(body.vel.x >= 0.0 && body.vel.x < 600.0);
            assert!(body.vel.y >= 0.0 && body.vel.y < 600.0);
        }
    }

    #[test]
    fn test_radius_for_mass() {
        let spawner = Spawner::default();
        let r = spawner.radius_for_mass(std::f64::consts::PI);
        assert!((r - 0.01).abs() < 1e-7);
    }

    #[test]
    fn test_spawn_avoids_existing() {
        let spawner = Spawner::default();
        let mut rng = Pcg32::seed_from_u64(77);
        let mut bodies = Vec::new();
        for id in 0..40 {
            let body = spawner.spawn(&bodies, &mut rng, id).unwrap();
            assert!(bodies.iter().all(|b| !collides(b, &body)));
            bodies.push(body);
        }
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let spawner = Spawner::default();
        let mut rng1 = Pcg32::seed_from_u64(2024);
        let mut rng2 = Pcg32::seed_from_u64(2024);
        let a = spawner.spawn(&[], &mut rng1, 1).unwrap();
        let b = spawner.spawn(&[], &mut rng2, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_placement_exhausted() {
        // A single body covering the whole plane leaves no room
        let blocker = Body::circle(1, Vec2::ZERO, 3.0, Vec2::ZERO, 1.0).unwrap();
        let spawner = Spawner {
            max_attempts: 25,
            ..Spawner::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let result = spawner.spawn(std::slice::from_ref(&blocker), &mut rng, 2);
        assert!(matches!(
            result,
            Err(SimError::PlacementExhausted { attempts: 25, placed: 1, .. })
        ));
    }

    #[test]
    fn test_oversized_body_is_config_error() {
        let spawner = Spawner {
            radius_scale: 1.0,
            ..Spawner::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        assert!(matches!(
            spawner.spawn(&[], &mut rng, 1),
            Err(SimError::InvalidConfig(_))
        ));
    }
}
