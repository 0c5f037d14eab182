//! Shared ownership of the game state
//!
//! The fixed-rate driver writes through [`SharedGame::write`]; the heartbeat
//! thread and presentation read through snapshots. A whole tick runs under
//! one write lock, so readers only ever observe completed ticks.

use std::sync::{Arc, PoisonError, RwLock};

use super::state::{Fragment, GameState, Projectile, Ship};

/// What the heartbeat needs to pick its tempo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseView {
    pub fragment_count: usize,
    pub paused: bool,
    pub game_over: bool,
}

impl PulseView {
    /// True when the pulse should idle instead of beating
    pub fn is_idle(&self) -> bool {
        self.paused || self.game_over
    }
}

/// Everything a renderer reads, copied out at the end of a tick
#[derive(Debug, Clone)]
pub struct FrameView {
    pub ship: Ship,
    pub projectiles: Vec<Projectile>,
    pub fragments: Vec<Fragment>,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    pub paused: bool,
    pub game_over: bool,
    pub arena: super::Arena,
}

/// Cloneable handle to the single owner of [`GameState`]
#[derive(Debug, Clone)]
pub struct SharedGame {
    inner: Arc<RwLock<GameState>>,
}

impl SharedGame {
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Run `f` with shared access.
    ///
    /// A panic while a writer held the lock leaves the state as it was between
    /// two statements of a tick; it is still structurally valid, so poisoning
    /// is ignored.
    pub fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access
    pub fn write<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn pulse_view(&self) -> PulseView {
        self.read(|s| PulseView {
            fragment_count: s.fragments.len(),
            paused: s.is_paused(),
            game_over: s.is_game_over(),
        })
    }

    pub fn frame_view(&self) -> FrameView {
        self.read(|s| FrameView {
            ship: s.ship.clone(),
            projectiles: s.projectiles.clone(),
            fragments: s.fragments.clone(),
            score: s.score,
            lives: s.lives(),
            level: s.level(),
            paused: s.is_paused(),
            game_over: s.is_game_over(),
            arena: s.arena,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GamePhase, TickInput, tick};
    use std::thread;

    #[test]
    fn test_pulse_view_tracks_phase() {
        let shared = SharedGame::new(GameState::new(1));
        let view = shared.pulse_view();
        assert_eq!(view.fragment_count, 4);
        assert!(!view.is_idle());

        shared.write(|s| s.phase = GamePhase::Paused);
        assert!(shared.pulse_view().paused);
        assert!(shared.pulse_view().is_idle());

        shared.write(|s| s.phase = GamePhase::GameOver);
        assert!(shared.pulse_view().game_over);
    }

    #[test]
    fn test_frame_view_copies_hud_values() {
        let shared = SharedGame::new(GameState::new(2));
        shared.write(|s| s.score = 3400);
        let frame = shared.frame_view();
        assert_eq!(frame.score, 3400);
        assert_eq!(frame.level, 4);
        assert_eq!(frame.lives, 3);
        assert_eq!(frame.fragments.len(), 4);
    }

    #[test]
    fn test_readers_see_whole_ticks() {
        let shared = SharedGame::new(GameState::new(3));
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                let input = TickInput {
                    fire: true,
                    turn_left: true,
                    ..Default::default()
                };
                for _ in 0..2000 {
                    shared.write(|s| tick(s, &input));
                }
            })
        };

        for _ in 0..2000 {
            shared.read(|s| {
                // Invariants that a half-applied tick could break
                for f in &s.fragments {
                    assert!(s.arena.contains(f.pos));
                }
                assert!(s.projectiles.iter().all(|p| p.life > 0));
            });
        }
        assert!(writer.join().is_ok());
    }
}
