//! Simulation tick
//!
//! Each external tick runs `resolution` sub-steps. A sub-step is a boundary
//! pass, a pairwise collision pass in list order, then one integration step
//! for every body.

use super::boundary::handle_out_of_bounds;
use super::collision::{collides, resolve};
use super::state::{Body, SimEvent, SimPhase, Simulation, pair_mut};
use crate::PlaneScale;
use crate::error::SimResult;

/// Clamp an externally measured frame time
///
/// Frames longer than `stall_threshold` (window drag, debugger pause) would
/// teleport bodies through each other, so they advance nothing.
pub fn effective_dt(delta_time: f64, stall_threshold: f64) -> f64 {
    if !delta_time.is_finite() || delta_time <= 0.0 {
        return 0.0;
    }
    if delta_time > stall_threshold {
        log::warn!("Stalled frame ({:.3}s) skipped", delta_time);
        return 0.0;
    }
    delta_time
}

/// Move a body by one sub-step: `velocity * dt / resolution`
#[inline]
pub fn integrate(body: &mut Body, dt: f64, resolution: u32, plane: &PlaneScale) {
    let step = (dt / resolution.max(1) as f64) as f32;
    body.pos += plane.px_to_plane(body.vel * step);
}

/// Pairwise collision pass over all i < j in list order
///
/// A resolved pair is immediately integrated `resolution` times so it
/// separates before later pairs are checked. Returns the number of pairs
/// resolved. `reported` holds pairs already signalled this tick.
pub fn handle_collisions(
    bodies: &mut [Body],
    dt: f64,
    resolution: u32,
    plane: &PlaneScale,
    events: &mut Vec<SimEvent>,
    reported: &mut Vec<(u32, u32)>,
) -> SimResult<usize> {
    let mut resolved = 0;
    let n = bodies.len();

    for i in 0..n.saturating_sub(1) {
        for j in (i + 1)..n {
            let Some((a, b)) = pair_mut(bodies, i, j) else {
                continue;
            };
            if !collides(a, b) {
                continue;
            }

            resolve(a, b)?;

            for _ in 0..resolution {
                integrate(a, dt, resolution, plane);
                integrate(b, dt, resolution, plane);
            }

            resolved += 1;
            let pair = (a.id, b.id);
            if !reported.contains(&pair) {
                reported.push(pair);
                log::debug!("Collision: body {} hit body {}", a.id, b.id);
                events.push(SimEvent::Collision {
                    initiator: a.id,
                    other: b.id,
                });
            }
        }
    }

    Ok(resolved)
}

/// Advance the simulation by one external frame
///
/// Does nothing unless the simulation is `Running`.
pub fn tick(sim: &mut Simulation, delta_time: f64) -> SimResult<()> {
    if sim.phase != SimPhase::Running {
        log::trace!("Tick ignored in {:?}", sim.phase);
        return Ok(());
    }

    let dt = effective_dt(delta_time, sim.config.stall_threshold);
    let resolution = sim.config.resolution.max(1);
    let plane = sim.config.plane;
    let mut reported = Vec::new();

    for _ in 0..resolution {
        handle_out_of_bounds(&mut sim.bodies);

        handle_collisions(
            &mut sim.bodies,
            dt,
            resolution,
            &plane,
            &mut sim.events,
            &mut reported,
        )?;

        for body in sim.bodies.iter_mut() {
            integrate(body, dt, resolution, &plane);
        }
    }

    sim.time_ticks += 1;
    Ok(())
}

impl Simulation {
    /// Advance one external frame; see [`tick`]
    pub fn tick(&mut self, delta_time: f64) -> SimResult<()> {
        tick(self, delta_time)
    }
}
