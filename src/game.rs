//! Fixed-rate driver
//!
//! Owns the shared state, the latched input and the audio side. Frame time
//! goes in through [`Game::update`]; whole 1/60 s ticks come out. Sound is
//! derived from the events each tick reports, after the state lock is
//! released.

use crate::audio::{AudioManager, Heartbeat, HeartbeatState, SoundEffect};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{FrameView, GameEvent, GameState, SharedGame, TickInput, tick};

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    shared: SharedGame,
    input: TickInput,
    accumulator: f32,
    audio: AudioManager,
    heartbeat: Heartbeat,
    heartbeat_enabled: bool,
}

impl Game {
    pub fn new(seed: u64, audio: AudioManager, settings: &Settings) -> Self {
        audio.apply_settings(settings);
        log::info!("New game with seed {}", seed);
        Self {
            shared: SharedGame::new(GameState::new(seed)),
            input: TickInput::default(),
            accumulator: 0.0,
            audio,
            heartbeat: Heartbeat::new(),
            heartbeat_enabled: settings.heartbeat,
        }
    }

    /// Handle for readers on other threads
    pub fn shared(&self) -> &SharedGame {
        &self.shared
    }

    /// Snapshot for rendering
    pub fn frame(&self) -> FrameView {
        self.shared.frame_view()
    }

    /// Replace the held keys. Latched commands are left alone.
    pub fn set_held(&mut self, held: &TickInput) {
        self.input.turn_left = held.turn_left;
        self.input.turn_right = held.turn_right;
        self.input.thrust = held.thrust;
        self.input.fire = held.fire;
    }

    /// Latch a pause toggle for the next tick
    pub fn press_pause(&mut self) {
        self.input.toggle_pause = true;
    }

    /// Latch a restart request for the next tick
    pub fn press_restart(&mut self) {
        self.input.restart = true;
    }

    /// Run as many ticks as `dt` seconds cover. Returns the number run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick
    pub fn step(&mut self) {
        let input = &self.input;
        let events = self.shared.write(|state| {
            tick(state, input);
            state.events.clone()
        });

        // Clear one-shot inputs after processing
        self.input.clear_commands();

        for event in events {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::ProjectileFired => self.audio.play(SoundEffect::Laser),
            GameEvent::ThrustPulse => self.audio.play(SoundEffect::Thrust),
            GameEvent::FragmentDestroyed { .. } => self.audio.play(SoundEffect::Explosion),
            // Always paired with the fragment it hit, which already exploded
            GameEvent::ShipDestroyed { lives_left } => {
                log::debug!("Ship lost, {} left", lives_left);
            }
            GameEvent::GameOver { score } => {
                log::info!("Final score: {}", score);
            }
            GameEvent::WaveStarted { .. } => {}
            GameEvent::Restarted => {
                self.start_heartbeat();
            }
        }
    }

    /// Start the heartbeat if settings allow it. No-op when already running.
    pub fn start_heartbeat(&mut self) -> bool {
        if !self.heartbeat_enabled {
            return false;
        }
        self.heartbeat
            .start(self.shared.clone(), self.audio.clone())
    }

    pub fn heartbeat_state(&self) -> HeartbeatState {
        self.heartbeat.state()
    }

    /// Stop background work. The game can still be stepped afterwards.
    pub fn shutdown(&mut self) {
        self.heartbeat.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{ChannelEmitter, NullEmitter};
    use crate::sim::GamePhase;
    use std::time::Duration;

    fn quiet_game() -> Game {
        let settings = Settings {
            heartbeat: false,
            ..Default::default()
        };
        Game::new(7, AudioManager::new(Box::new(NullEmitter)), &settings)
    }

    #[test]
    fn test_update_runs_whole_ticks() {
        let mut game = quiet_game();
        assert_eq!(game.update(SIM_DT * 2.5), 2);
        assert_eq!(game.update(SIM_DT), 1);
        assert_eq!(game.shared().read(|s| s.time_ticks), 3);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = quiet_game();
        let ran = game.update(10.0);
        assert!((5..=MAX_SUBSTEPS).contains(&ran), "ran {ran}");
    }

    #[test]
    fn test_pause_latches_until_a_tick() {
        let mut game = quiet_game();
        game.press_pause();
        assert_eq!(game.update(SIM_DT * 0.5), 0);
        assert!(!game.frame().paused);
        assert_eq!(game.update(SIM_DT * 0.6), 1);
        assert!(game.frame().paused);

        // Held keys stay latched but nothing moves
        game.set_held(&TickInput {
            thrust: true,
            fire: true,
            ..Default::default()
        });
        let before = game.shared().read(|s| s.time_ticks);
        game.update(SIM_DT * 5.5);
        assert_eq!(game.shared().read(|s| s.time_ticks), before);
        assert!(game.frame().projectiles.is_empty());

        game.press_pause();
        game.step();
        assert!(!game.frame().paused);
        assert!(game.frame().ship.thrusting);
    }

    #[test]
    fn test_sounds_into_null_output_are_harmless() {
        let mut game = quiet_game();
        assert!(game.audio.is_enabled());
        game.set_held(&TickInput {
            fire: true,
            thrust: true,
            ..Default::default()
        });
        for _ in 0..120 {
            game.step();
        }
        assert_eq!(game.shared().read(|s| s.time_ticks), 120);
        assert!(game.audio.is_enabled());
    }

    #[test]
    fn test_set_held_keeps_commands() {
        let mut game = quiet_game();
        game.press_restart();
        game.set_held(&TickInput::default());
        game.shared().write(|s| s.phase = GamePhase::GameOver);
        game.step();
        assert_eq!(game.shared().read(|s| s.phase), GamePhase::Running);
    }

    #[test]
    fn test_fire_plays_laser() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let audio = AudioManager::new(Box::new(ChannelEmitter::new(tx)));
        let settings = Settings {
            heartbeat: false,
            ..Default::default()
        };
        let mut game = Game::new(3, audio, &settings);
        game.set_held(&TickInput {
            fire: true,
            ..Default::default()
        });
        game.step();
        let tone = rx.recv_timeout(Duration::from_secs(2));
        assert!(matches!(tone, Ok(t) if t.len() == 3969));
    }

    #[test]
    fn test_heartbeat_respects_settings() {
        let mut game = quiet_game();
        assert!(!game.start_heartbeat());
        assert_eq!(game.heartbeat_state(), HeartbeatState::Stopped);

        let mut game = Game::new(1, AudioManager::disabled(), &Settings::default());
        assert!(game.start_heartbeat());
        assert!(!game.start_heartbeat());
        assert_eq!(game.heartbeat_state(), HeartbeatState::Running);
        game.shutdown();
        assert_eq!(game.heartbeat_state(), HeartbeatState::Stopped);
    }
}
