//! Demo autopilot
//!
//! Plays the game from a state snapshot so the headless binary has something
//! to show. Turns toward the nearest fragment, shoots when lined up, closes
//! the distance when the target is far away.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;
use crate::{normalize_angle, normalize_or_keep};

/// Within this angle (radians) of the target the gun fires
const AIM_TOLERANCE: f32 = 0.25;
/// Beyond this distance the ship thrusts toward its target
const CHASE_DISTANCE: f32 = 250.0;

/// Held inputs for the next tick
pub fn steer(state: &GameState) -> TickInput {
    let ship = &state.ship;
    let nearest = state
        .fragments
        .iter()
        .map(|f| state.arena.shortest_offset(ship.pos, f.pos))
        .min_by(|a, b| {
            a.length_squared()
                .partial_cmp(&b.length_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(offset) = nearest else {
        return TickInput::default();
    };

    // A fragment exactly on the ship counts as already lined up
    let aim = normalize_or_keep(offset);
    let error = if aim == Vec2::ZERO {
        0.0
    } else {
        normalize_angle(aim.y.atan2(aim.x) - ship.angle)
    };
    TickInput {
        turn_left: error < -AIM_TOLERANCE / 2.0,
        turn_right: error > AIM_TOLERANCE / 2.0,
        thrust: offset.length() > CHASE_DISTANCE && error.abs() < AIM_TOLERANCE,
        fire: error.abs() < AIM_TOLERANCE,
        ..Default::default()
    }
}
