//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one 1/60 s step. All
//! velocities are in arena units per tick.

use super::collision::{projectile_hits_fragment, ship_hits_fragment};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held keys, sampled every tick
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub toggle_pause: bool,
    /// Restart request (one-shot, honoured only after game over)
    pub restart: bool,
}

impl TickInput {
    /// Forget the one-shot commands once a tick has consumed them
    pub fn clear_commands(&mut self) {
        self.toggle_pause = false;
        self.restart = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Handle pause toggle
    if input.toggle_pause {
        match state.phase {
            GamePhase::Running => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Running,
            GamePhase::GameOver => {}
        }
    }

    if input.restart && state.phase == GamePhase::GameOver {
        log::info!("Restarting after game over (final score {})", state.score);
        state.restart();
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    steer_ship(state, input);
    update_fire(state, input);
    advance_projectiles(state);
    advance_fragments(state);
    resolve_projectile_hits(state);

    if resolve_ship_hit(state) {
        return;
    }

    // Field cleared: next wave, and a breather for the ship
    if state.fragments.is_empty() {
        let count = state.next_wave_size();
        state.spawn_wave(count);
        state.ship.respawn(&state.arena);
    }
}

/// Rotation, thrust, drag, movement and the invulnerability countdown
fn steer_ship(state: &mut GameState, input: &TickInput) {
    let ship = &mut state.ship;

    if input.turn_left {
        ship.angle -= SHIP_TURN_RATE;
    }
    if input.turn_right {
        ship.angle += SHIP_TURN_RATE;
    }

    if input.thrust {
        ship.vel += crate::heading_vector(ship.angle) * SHIP_THRUST;
        ship.thrusting = true;
        if state.thrust_sound_cooldown == 0 {
            state.events.push(GameEvent::ThrustPulse);
            state.thrust_sound_cooldown = THRUST_SOUND_COOLDOWN_TICKS;
        }
    } else {
        ship.thrusting = false;
    }
    state.thrust_sound_cooldown = state.thrust_sound_cooldown.saturating_sub(1);

    ship.vel *= SHIP_DRAG;
    ship.pos = state.arena.wrap(ship.pos + ship.vel);

    ship.tick_invulnerability();
}

/// Cooldown runs down first so a shot taken this tick leaves it at the full
/// value; the cadence is one shot per `FIRE_COOLDOWN_TICKS`.
fn update_fire(state: &mut GameState, input: &TickInput) {
    state.fire_cooldown = state.fire_cooldown.saturating_sub(1);
    if input.fire && state.fire_cooldown == 0 {
        state.spawn_projectile();
        state.fire_cooldown = FIRE_COOLDOWN_TICKS;
    }
}

fn advance_projectiles(state: &mut GameState) {
    let arena = state.arena;
    state.projectiles.retain_mut(|p| {
        p.pos = arena.wrap(p.pos + p.vel);
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });
}

fn advance_fragments(state: &mut GameState) {
    let arena = state.arena;
    for fragment in &mut state.fragments {
        fragment.pos = arena.wrap(fragment.pos + fragment.vel);
        fragment.rotation = crate::normalize_angle(fragment.rotation + fragment.spin);
    }
}

/// Each projectile destroys at most one fragment. Pieces split off this tick
/// join the field only after every projectile has been checked.
fn resolve_projectile_hits(state: &mut GameState) {
    let fragments = &mut state.fragments;
    let mut destroyed = Vec::new();

    state.projectiles.retain(|projectile| {
        match fragments
            .iter()
            .position(|f| projectile_hits_fragment(projectile.pos, f))
        {
            Some(idx) => {
                destroyed.push(fragments.remove(idx));
                false
            }
            None => true,
        }
    });

    for fragment in destroyed {
        state.destroy_fragment(fragment);
    }
}

/// Returns true when the collision ended the run
fn resolve_ship_hit(state: &mut GameState) -> bool {
    if state.ship.invulnerable {
        return false;
    }

    let Some(idx) = state
        .fragments
        .iter()
        .position(|f| ship_hits_fragment(&state.ship, f))
    else {
        return false;
    };

    let fragment = state.fragments.remove(idx);
    state.destroy_fragment(fragment);

    state.ship.lives = state.ship.lives.saturating_sub(1);
    state.events.push(GameEvent::ShipDestroyed {
        lives_left: state.ship.lives,
    });

    if state.ship.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.ship.thrusting = false;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over - final score {}", state.score);
        true
    } else {
        log::debug!("Ship destroyed, {} lives left", state.ship.lives);
        state.ship.respawn(&state.arena);
        false
    }
}
