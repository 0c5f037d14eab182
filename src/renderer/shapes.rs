//! Shape generation for 2D primitives
//!
//! World-space outlines for the ship, its exhaust and fragments, plus the
//! extra copies needed where something straddles a wrap seam.

use glam::{Mat2, Vec2};

use crate::sim::{Arena, FRAGMENT_VERTICES, Fragment, Ship};

/// Objects closer than this to an edge are also drawn on the far side
pub const WRAP_MARGIN: f32 = 40.0;

/// Ship hull pointing along +x, nose first
const SHIP_HULL: [Vec2; 4] = [
    Vec2::new(15.0, 0.0),
    Vec2::new(-10.0, -8.0),
    Vec2::new(-6.0, 0.0),
    Vec2::new(-10.0, 8.0),
];

/// Exhaust flame behind the hull
const SHIP_FLAME: [Vec2; 3] = [
    Vec2::new(-10.0, -5.0),
    Vec2::new(-18.0, 0.0),
    Vec2::new(-10.0, 5.0),
];

fn place<const N: usize>(local: &[Vec2; N], center: Vec2, angle: f32) -> [Vec2; N] {
    let rot = Mat2::from_angle(angle);
    local.map(|v| center + rot * v)
}

/// Hull polygon at `center`
pub fn ship_hull(ship: &Ship, center: Vec2) -> [Vec2; 4] {
    place(&SHIP_HULL, center, ship.angle)
}

/// Flame polygon at `center`, only while thrusting
pub fn ship_flame(ship: &Ship, center: Vec2) -> Option<[Vec2; 3]> {
    ship.thrusting.then(|| place(&SHIP_FLAME, center, ship.angle))
}

/// Whether the ship is drawn bright this frame. Blinks every 6 ticks while
/// invulnerable.
pub fn ship_bright(ship: &Ship) -> bool {
    !ship.invulnerable || (ship.invuln_ticks / 6) % 2 == 0
}

/// Fragment outline at `center`, turned by its accumulated rotation
pub fn fragment_outline(fragment: &Fragment, center: Vec2) -> [Vec2; FRAGMENT_VERTICES] {
    place(fragment.outline(), center, fragment.rotation)
}

/// Extra draw positions for an object near the arena edges.
///
/// Returns up to three copies: one per nearby edge and one for the corner
/// when both apply. `pos` itself is not included.
pub fn wrap_ghosts(pos: Vec2, margin: f32, arena: &Arena) -> Vec<Vec2> {
    let dx = if pos.x < margin {
        Some(arena.width)
    } else if pos.x > arena.width - margin {
        Some(-arena.width)
    } else {
        None
    };
    let dy = if pos.y < margin {
        Some(arena.height)
    } else if pos.y > arena.height - margin {
        Some(-arena.height)
    } else {
        None
    };

    let mut ghosts = Vec::with_capacity(3);
    if let Some(dx) = dx {
        ghosts.push(pos + Vec2::new(dx, 0.0));
    }
    if let Some(dy) = dy {
        ghosts.push(pos + Vec2::new(0.0, dy));
    }
    if let (Some(dx), Some(dy)) = (dx, dy) {
        ghosts.push(pos + Vec2::new(dx, dy));
    }
    ghosts
}

/// The position itself followed by its wrap ghosts
pub fn draw_positions(pos: Vec2, arena: &Arena) -> Vec<Vec2> {
    let mut all = vec![pos];
    all.extend(wrap_ghosts(pos, WRAP_MARGIN, arena));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FragmentTier;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_no_ghosts_in_the_middle() {
        let arena = Arena::default();
        assert!(wrap_ghosts(Vec2::new(400.0, 300.0), WRAP_MARGIN, &arena).is_empty());
    }

    #[test]
    fn test_edge_and_corner_ghosts() {
        let arena = Arena::default();
        let left = wrap_ghosts(Vec2::new(10.0, 300.0), WRAP_MARGIN, &arena);
        assert_eq!(left, vec![Vec2::new(810.0, 300.0)]);

        let corner = wrap_ghosts(Vec2::new(790.0, 5.0), WRAP_MARGIN, &arena);
        assert_eq!(
            corner,
            vec![
                Vec2::new(-10.0, 5.0),
                Vec2::new(790.0, 605.0),
                Vec2::new(-10.0, 605.0),
            ]
        );
        assert_eq!(draw_positions(Vec2::new(790.0, 5.0), &arena).len(), 4);
    }

    #[test]
    fn test_ship_hull_follows_heading() {
        let arena = Arena::default();
        let ship = Ship::new(&arena);
        let hull = ship_hull(&ship, ship.pos);
        // Facing up: nose 15 units above the centre
        assert!(hull[0].distance(ship.pos + Vec2::new(0.0, -15.0)) < 1e-4);
        assert!(ship_flame(&ship, ship.pos).is_none());
    }

    #[test]
    fn test_blink() {
        let arena = Arena::default();
        let mut ship = Ship::new(&arena);
        assert!(ship_bright(&ship));
        ship.respawn(&arena);
        ship.invuln_ticks = 120;
        assert!(ship_bright(&ship));
        ship.invuln_ticks = 114;
        assert!(!ship_bright(&ship));
    }

    #[test]
    fn test_fragment_outline_rotates_about_centre() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut frag = Fragment::new(1, Vec2::ZERO, Vec2::ZERO, FragmentTier::Medium, &mut rng);
        let center = Vec2::new(100.0, 100.0);
        let flat = fragment_outline(&frag, center);
        frag.rotation = FRAC_PI_2;
        let turned = fragment_outline(&frag, center);
        for (a, b) in flat.iter().zip(&turned) {
            assert!((a.distance(center) - b.distance(center)).abs() < 1e-3);
        }
        // Vertex 0 lies on +x before turning, +y after
        assert!((turned[0] - center).x.abs() < 1e-3);
        assert!((turned[0] - center).y > 0.0);
    }
}
