//! Collision detection and response between circular bodies
//!
//! Response reduces the 2D collision to 1D: rotate both bodies so the line
//! of centers lies on the x-axis, exchange x-velocities with the elastic
//! formula, then rotate back.

use super::state::Body;
use crate::error::SimResult;
use crate::{collision_angle, rotate_axis};

/// Whether two bodies overlap
///
/// Uses `radius_x` as the effective radius. Touching circles (distance ==
/// sum of radii) do not collide.
#[inline]
pub fn collides(a: &Body, b: &Body) -> bool {
    let reach = a.radius_x + b.radius_x;
    (a.pos - b.pos).length_squared() < reach * reach
}

/// Rotate a body's local axis and its velocity by `theta`
pub fn rotate_body_axis(body: &mut Body, theta: f32) {
    body.axis_angle += theta;
    body.vel = rotate_axis(body.vel, theta);
}

/// Perfectly elastic collision along the x-axis
///
/// Returns the final x-velocities `(v1f, v2f)`. Order of the two bodies does
/// not matter for conservation.
#[inline]
pub fn one_dimensional_collision(m1: f64, v1i: f64, m2: f64, v2i: f64) -> (f64, f64) {
    let total = m1 + m2;
    let v2f = (2.0 * m1 / total) * v1i + ((m2 - m1) / total) * v2i;
    let v1f = v2f + v2i - v1i;
    (v1f, v2f)
}

/// Resolve a collision between two bodies, assuming they overlap
///
/// Only velocities (and axis orientation) change; positions are left for
/// the following integration steps to separate.
pub fn resolve(a: &mut Body, b: &mut Body) -> SimResult<()> {
    a.check_mass()?;
    b.check_mass()?;

    let theta = collision_angle(a.pos, b.pos);

    rotate_body_axis(a, theta);
    rotate_body_axis(b, theta);

    let (v1f, v2f) =
        one_dimensional_collision(a.mass(), a.vel.x as f64, b.mass(), b.vel.x as f64);
    a.vel.x = v1f as f32;
    b.vel.x = v2f as f32;

    rotate_body_axis(a, -theta);
    rotate_body_axis(b, -theta);

    Ok(())
}
