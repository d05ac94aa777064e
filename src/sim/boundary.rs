//! Reflection off the plane boundary
//!
//! Velocity-only: a body that has crossed the edge while moving outward has
//! that velocity component flipped. Position is never clamped, so a body may
//! overlap the edge for a step before it turns around.

use super::state::Body;
use crate::consts::BOUNDARY_EXTENT;

/// Reflect one body off the boundary. Returns true if any component flipped.
pub fn apply_boundary(body: &mut Body) -> bool {
    let mut reflected = false;

    if (body.pos.x + body.radius_x > BOUNDARY_EXTENT && body.vel.x > 0.0)
        || (body.pos.x - body.radius_x < -BOUNDARY_EXTENT && body.vel.x < 0.0)
    {
        body.vel.x = -body.vel.x;
        reflected = true;
    }

    if (body.pos.y + body.radius_y > BOUNDARY_EXTENT && body.vel.y > 0.0)
        || (body.pos.y - body.radius_y < -BOUNDARY_EXTENT && body.vel.y < 0.0)
    {
        body.vel.y = -body.vel.y;
        reflected = true;
    }

    reflected
}

/// Boundary pass over every body
pub fn handle_out_of_bounds(bodies: &mut [Body]) {
    for body in bodies.iter_mut() {
        if apply_boundary(body) {
            log::trace!("Body {} reflected off boundary", body.id);
        }
    }
}
