//! Toroidal arena geometry
//!
//! Every position in the simulation lives in `[0, width) x [0, height)`.
//! Moving off one edge re-enters from the opposite one.

use glam::Vec2;
use rand::Rng;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::wrap_coord;

/// A rectangular wrap-around playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Bring a position back inside the arena
    #[inline]
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(wrap_coord(pos.x, self.width), wrap_coord(pos.y, self.height))
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        (0.0..self.width).contains(&pos.x) && (0.0..self.height).contains(&pos.y)
    }

    /// Shortest offset from `from` to `to` across the wrap seams
    pub fn shortest_offset(&self, from: Vec2, to: Vec2) -> Vec2 {
        let mut d = to - from;
        if d.x > self.width / 2.0 {
            d.x -= self.width;
        } else if d.x < -self.width / 2.0 {
            d.x += self.width;
        }
        if d.y > self.height / 2.0 {
            d.y -= self.height;
        } else if d.y < -self.height / 2.0 {
            d.y += self.height;
        }
        d
    }

    /// Pick a point on one of the four edges.
    ///
    /// Chooses the x or y edge pair uniformly, then the near or far edge,
    /// then a uniform coordinate along it. The far edge wraps onto 0.
    pub fn random_edge_position<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let pos = if rng.random_bool(0.5) {
            let x = if rng.random_bool(0.5) { 0.0 } else { self.width };
            Vec2::new(x, rng.random::<f32>() * self.height)
        } else {
            let y = if rng.random_bool(0.5) { 0.0 } else { self.height };
            Vec2::new(rng.random::<f32>() * self.width, y)
        };
        self.wrap(pos)
    }
}
