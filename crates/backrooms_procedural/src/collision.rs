//! Circle-versus-box collision resolution on the XZ plane.
//!
//! The observer is a circle of `player_radius`. Each pass pushes it out of
//! every overlapping collider. Deep overlaps with the centre inside a box
//! are resolved along the axis of least penetration, shallow ones radially
//! from the closest point on the box.

use crate::geometry::CollisionBox;

/// Relaxation passes over the collider list.
pub const RESOLVE_ITERATIONS: usize = 3;

/// Pushes `target` out of all `colliders`.
///
/// Returns `target` unchanged when nothing overlaps.
#[must_use]
pub fn resolve_collisions(
    target: (f32, f32),
    player_radius: f32,
    colliders: &[CollisionBox],
) -> (f32, f32) {
    let (mut x, mut z) = target;
    let radius_sq = player_radius * player_radius;

    for _ in 0..RESOLVE_ITERATIONS {
        for collider in colliders {
            let (min_x, min_z) = collider.min();
            let (max_x, max_z) = collider.max();

            let diff_x = x - x.clamp(min_x, max_x);
            let diff_z = z - z.clamp(min_z, max_z);
            let dist_sq = diff_x * diff_x + diff_z * diff_z;

            if dist_sq >= radius_sq {
                continue;
            }

            if dist_sq == 0.0 {
                let overlap_x = collider.half_x + player_radius - (x - collider.x).abs();
                let overlap_z = collider.half_z + player_radius - (z - collider.z).abs();
                if overlap_x < overlap_z {
                    x += away(overlap_x, x - collider.x);
                } else {
                    z += away(overlap_z, z - collider.z);
                }
                continue;
            }

            let dist = dist_sq.sqrt();
            let push = player_radius - dist;
            x += diff_x / dist * push;
            z += diff_z / dist * push;
        }
    }

    (x, z)
}

/// `depth` signed to point along `offset`; a zero offset pushes positive.
#[inline]
fn away(depth: f32, offset: f32) -> f32 {
    if offset >= 0.0 { depth } else { -depth }
}
