//! Simulation state and core body types
//!
//! The `Simulation` exclusively owns its bodies; only the tick, collision,
//! and boundary passes mutate them.

use glam::{DVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::Spawner;
use crate::error::{SimError, SimResult};
use crate::settings::SimConfig;

/// Lifecycle of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Created, no bodies yet
    Uninitialized,
    /// Spawner is placing bodies
    Populating,
    /// Accepting ticks
    Running,
    /// Stopped; no further mutation
    Terminated,
}

/// Signals for external collaborators (audio, UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Two bodies collided and were resolved. `initiator` is the body that
    /// comes first in list order.
    Collision { initiator: u32, other: u32 },
}

/// A circular rigid body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    /// Center in plane units ([-1, 1] per axis)
    pub pos: Vec2,
    /// Horizontal radius (plane units); collision distance uses this one
    pub radius_x: f32,
    /// Vertical radius (plane units)
    pub radius_y: f32,
    /// Velocity in pixels per second
    pub vel: Vec2,
    /// Orientation of the circle's local axis (radians)
    pub axis_angle: f32,
    mass: f64,
}

impl Body {
    /// Create a body; fails on non-positive or non-finite mass
    pub fn new(
        id: u32,
        pos: Vec2,
        radius_x: f32,
        radius_y: f32,
        vel: Vec2,
        mass: f64,
    ) -> SimResult<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimError::InvalidBody { mass });
        }
        Ok(Self {
            id,
            pos,
            radius_x,
            radius_y,
            vel,
            axis_angle: 0.0,
            mass,
        })
    }

    /// Uniform circle (radius_x == radius_y)
    pub fn circle(id: u32, pos: Vec2, radius: f32, vel: Vec2, mass: f64) -> SimResult<Self> {
        Self::new(id, pos, radius, radius, vel, mass)
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// (radius_x, radius_y)
    #[inline]
    pub fn radius(&self) -> (f32, f32) {
        (self.radius_x, self.radius_y)
    }

    /// Fails with `InvalidBody` if the mass is unusable (e.g. after deserializing)
    pub fn check_mass(&self) -> SimResult<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SimError::InvalidBody { mass: self.mass });
        }
        Ok(())
    }

    /// Momentum in pixel units
    pub fn momentum(&self) -> DVec2 {
        self.vel.as_dvec2() * self.mass
    }

    /// Kinetic energy in pixel units
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.as_dvec2().length_squared()
    }
}

/// Borrow two distinct bodies mutably at once
///
/// Returns `None` if `i == j` or either index is out of bounds. The pair is
/// returned in the order asked for.
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> Option<(&mut Body, &mut Body)> {
    if i == j || i >= bodies.len() || j >= bodies.len() {
        return None;
    }
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        Some((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        Some((&mut tail[0], &mut head[j]))
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Per-body view handed to renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: u32,
    pub pos: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
    pub vel: Vec2,
    pub mass: f64,
    pub axis_angle: f32,
}

/// Whole-simulation view handed to renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub phase: SimPhase,
    pub time_ticks: u64,
    pub bodies: Vec<BodySnapshot>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub config: SimConfig,
    /// Seed for reproducible population
    pub rng_state: RngState,
    /// Current lifecycle phase
    pub phase: SimPhase,
    /// Ticks advanced while Running
    pub time_ticks: u64,
    /// Bodies in stable list order (pair scan order)
    pub(crate) bodies: Vec<Body>,
    /// Pending signals for external collaborators
    pub(crate) events: Vec<SimEvent>,
    /// Next body ID
    next_id: u32,
}

impl Simulation {
    /// Create an empty, uninitialized simulation
    pub fn new(config: SimConfig) -> Self {
        let rng_state = RngState::new(config.seed);
        Self {
            config,
            rng_state,
            phase: SimPhase::Uninitialized,
            time_ticks: 0,
            bodies: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Create and populate a simulation with `body_count` bodies
    pub fn initialize(body_count: u32, config: SimConfig) -> SimResult<Self> {
        let config = SimConfig { body_count, ..config };
        config.validate()?;
        let mut sim = Self::new(config);
        sim.populate()?;
        Ok(sim)
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn `config.body_count` non-overlapping bodies and start running
    ///
    /// On `PlacementExhausted` the simulation stays in `Populating` with the
    /// bodies placed so far.
    pub fn populate(&mut self) -> SimResult<()> {
        if self.phase != SimPhase::Uninitialized {
            return Err(SimError::InvalidPhase {
                expected: SimPhase::Uninitialized,
                actual: self.phase,
            });
        }
        self.config.validate()?;
        self.phase = SimPhase::Populating;

        let spawner = Spawner::from_config(&self.config);
        let mut rng = self.rng_state.to_rng();
        let requested = self.config.body_count;
        self.bodies.reserve(requested as usize);

        for _ in 0..requested {
            let id = self.next_body_id();
            match spawner.spawn(&self.bodies, &mut rng, id) {
                Ok(body) => self.bodies.push(body),
                Err(SimError::PlacementExhausted { attempts, .. }) => {
                    log::warn!(
                        "Placement exhausted: {} of {} bodies placed",
                        self.bodies.len(),
                        requested
                    );
                    return Err(SimError::PlacementExhausted {
                        attempts,
                        placed: self.bodies.len(),
                        requested,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        self.phase = SimPhase::Running;
        log::info!(
            "Simulation populated: {} bodies (seed {})",
            self.bodies.len(),
            self.rng_state.seed
        );
        Ok(())
    }

    /// Add a hand-built body (only before running)
    pub fn add_body(&mut self, mut body: Body) -> SimResult<u32> {
        match self.phase {
            SimPhase::Uninitialized | SimPhase::Populating => {}
            actual => {
                return Err(SimError::InvalidPhase {
                    expected: SimPhase::Uninitialized,
                    actual,
                });
            }
        }
        body.check_mass()?;
        body.id = self.next_body_id();
        let id = body.id;
        self.bodies.push(body);
        Ok(id)
    }

    /// Begin accepting ticks with whatever bodies have been added
    pub fn start(&mut self) -> SimResult<()> {
        match self.phase {
            SimPhase::Uninitialized | SimPhase::Populating => {
                self.phase = SimPhase::Running;
                log::info!("Simulation running with {} bodies", self.bodies.len());
                Ok(())
            }
            actual => Err(SimError::InvalidPhase {
                expected: SimPhase::Populating,
                actual,
            }),
        }
    }

    /// External stop signal
    pub fn stop(&mut self) {
        if self.phase != SimPhase::Terminated {
            log::info!("Simulation terminated after {} ticks", self.time_ticks);
            self.phase = SimPhase::Terminated;
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn body_by_id(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sum of mass-weighted velocities
    pub fn total_momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Sum of kinetic energies
    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Renderer-facing copy of the current state
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            phase: self.phase,
            time_ticks: self.time_ticks,
            bodies: self
                .bodies
                .iter()
                .map(|b| BodySnapshot {
                    id: b.id,
                    pos: b.pos,
                    radius_x: b.radius_x,
                    radius_y: b.radius_y,
                    vel: b.vel,
                    mass: b.mass,
                    axis_angle: b.axis_angle,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: u32, x: f32) -> Body {
        Body::circle(id, Vec2::new(x, 0.0), 0.05, Vec2::ZERO, 1.0).unwrap()
    }

    #[test]
    fn test_body_rejects_bad_mass() {
        assert!(matches!(
            Body::circle(1, Vec2::ZERO, 0.1, Vec2::ZERO, 0.0),
            Err(SimError::InvalidBody { .. })
        ));
        assert!(Body::circle(1, Vec2::ZERO, 0.1, Vec2::ZERO, -3.0).is_err());
        assert!(Body::circle(1, Vec2::ZERO, 0.1, Vec2::ZERO, f64::NAN).is_err());
        assert!(Body::circle(1, Vec2::ZERO, 0.1, Vec2::ZERO, 2.5).is_ok());
    }

    #[test]
    fn test_pair_mut() {
        let mut bodies = vec![body(1, 0.0), body(2, 0.5), body(3, -0.5)];

        let (a, b) = pair_mut(&mut bodies, 0, 2).unwrap();
        assert_eq!((a.id, b.id), (1, 3));
        a.vel.x = 1.0;
        b.vel.x = -1.0;

        let (a, b) = pair_mut(&mut bodies, 2, 1).unwrap();
        assert_eq!((a.id, b.id), (3, 2));

        assert!(pair_mut(&mut bodies, 1, 1).is_none());
        assert!(pair_mut(&mut bodies, 0, 3).is_none());
        assert_eq!(bodies[0].vel.x, 1.0);
        assert_eq!(bodies[2].vel.x, -1.0);
    }

    #[test]
    fn test_lifecycle() {
        let mut sim = Simulation::new(SimConfig::with_seed(3));
        assert_eq!(sim.phase, SimPhase::Uninitialized);

        sim.populate().unwrap();
        assert_eq!(sim.phase, SimPhase::Running);
        assert_eq!(sim.bodies().len(), 20);

        assert!(matches!(
            sim.populate(),
            Err(SimError::InvalidPhase { .. })
        ));

        sim.stop();
        assert_eq!(sim.phase, SimPhase::Terminated);
        assert!(sim.start().is_err());
    }

    #[test]
    fn test_placement_exhausted_keeps_partial_population() {
        let mut sim = Simulation::new(SimConfig {
            body_count: 500,
            max_placement_attempts: 3,
            ..SimConfig::with_seed(17)
        });

        let placed = match sim.populate() {
            Err(SimError::PlacementExhausted {
                attempts,
                placed,
                requested,
            }) => {
                assert_eq!(attempts, 3);
                assert_eq!(requested, 500);
                placed
            }
            other => panic!("expected PlacementExhausted, got {other:?}"),
        };

        assert_eq!(sim.phase, SimPhase::Populating);
        assert_eq!(sim.bodies().len(), placed);
        assert!(placed > 0 && placed < 500);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_initialize_overrides_count() {
        let sim = Simulation::initialize(7, SimConfig::with_seed(11)).unwrap();
        assert_eq!(sim.bodies().len(), 7);
        assert_eq!(sim.config.body_count, 7);
        assert!(sim.is_running());
    }

    #[test]
    fn test_ids_are_unique() {
        let sim = Simulation::initialize(20, SimConfig::with_seed(5)).unwrap();
        let mut ids: Vec<u32> = sim.bodies().iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert!(sim.body_by_id(ids[0]).is_some());
    }

    #[test]
    fn test_add_body_then_start() {
        let mut sim = Simulation::new(SimConfig::default());
        let id = sim.add_body(body(0, 0.2)).unwrap();
        assert_eq!(id, 1);
        sim.start().unwrap();
        assert!(sim.add_body(body(0, -0.2)).is_err());
    }

    #[test]
    fn test_conservation_diagnostics() {
        let mut sim = Simulation::new(SimConfig::default());
        let a = Body::circle(0, Vec2::new(-0.5, 0.0), 0.05, Vec2::new(10.0, 0.0), 2.0).unwrap();
        let b = Body::circle(0, Vec2::new(0.5, 0.0), 0.05, Vec2::new(0.0, -4.0), 3.0).unwrap();
        sim.add_body(a).unwrap();
        sim.add_body(b).unwrap();

        let p = sim.total_momentum();
        assert!((p.x - 20.0).abs() < 1e-9);
        assert!((p.y + 12.0).abs() < 1e-9);
        assert!((sim.total_kinetic_energy() - (100.0 + 24.0)).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_serializes() {
        let sim = Simulation::initialize(3, SimConfig::with_seed(9)).unwrap();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.bodies.len(), 3);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"Running\""));
    }
}
