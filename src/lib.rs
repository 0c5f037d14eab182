//! Torus Rocks - an asteroid field on a wrap-around arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `audio`: Procedural tones, fire-and-forget dispatch, heartbeat scheduler
//! - `game`: Fixed-rate driver tying input, simulation and sound together
//! - `renderer`: Read-only presentation helpers (HUD, wrap ghosts, ASCII)
//! - `settings`: Player preferences loaded from JSON

pub mod audio;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 12.0;
    pub const SHIP_START_LIVES: u8 = 3;
    /// Heading change per tick while a turn key is held (radians)
    pub const SHIP_TURN_RATE: f32 = 0.08;
    /// Velocity added per tick of thrust
    pub const SHIP_THRUST: f32 = 0.15;
    /// Velocity multiplier applied every tick
    pub const SHIP_DRAG: f32 = 0.995;
    /// Grace period after a respawn
    pub const SHIP_INVULN_TICKS: u32 = 120;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 6.5;
    pub const PROJECTILE_LIFETIME_TICKS: u32 = 60;
    /// Spawn distance from the ship centre, in ship radii
    pub const PROJECTILE_NOSE_OFFSET: f32 = 1.5;
    pub const FIRE_COOLDOWN_TICKS: u32 = 10;
    /// Ticks between thrust sound pulses while thrusting
    pub const THRUST_SOUND_COOLDOWN_TICKS: u32 = 10;

    /// Fragment radius is this times the tier
    pub const FRAGMENT_RADIUS_PER_TIER: f32 = 15.0;
    pub const FRAGMENT_POINTS_PER_TIER: u32 = 100;
    /// Large fragments in the opening wave
    pub const BASE_WAVE_SIZE: u32 = 4;
    /// Score needed per extra fragment in a wave (and per level)
    pub const SCORE_PER_LEVEL: u32 = 1000;
}

/// Wrap a coordinate into `[0, extent)`
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round tiny negatives up to exactly `extent`
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalize a vector, leaving zero-length (or non-finite) input untouched
#[inline]
pub fn normalize_or_keep(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 && len.is_finite() { v / len } else { v }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(805.0, 800.0), 5.0);
        assert_eq!(wrap_coord(-5.0, 800.0), 795.0);
        assert_eq!(wrap_coord(800.0, 800.0), 0.0);
        assert!(wrap_coord(-1e-9, 800.0) < 800.0);
    }

    #[test]
    fn test_normalize_or_keep() {
        assert_eq!(normalize_or_keep(Vec2::ZERO), Vec2::ZERO);
        let n = normalize_or_keep(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }
}
