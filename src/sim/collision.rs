//! Collision predicates
//!
//! Plain circle tests on squared Euclidean distance. Distances are measured
//! directly, not across the wrap seam.

use glam::Vec2;

use super::state::{Fragment, Ship};

/// A projectile (treated as a point) hits a fragment when it lies inside the
/// fragment's circle, boundary included.
#[inline]
pub fn projectile_hits_fragment(projectile_pos: Vec2, fragment: &Fragment) -> bool {
    let r = fragment.radius();
    projectile_pos.distance_squared(fragment.pos) <= r * r
}

/// The ship hits a fragment when the two circles touch or overlap.
#[inline]
pub fn ship_hits_fragment(ship: &Ship, fragment: &Fragment) -> bool {
    circles_overlap(ship.pos, ship.radius, fragment.pos, fragment.radius())
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}
