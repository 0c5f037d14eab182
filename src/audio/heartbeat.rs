//! Adaptive heartbeat
//!
//! A background pulse whose tempo follows how many fragments are left. It
//! runs on its own thread, reads the game through [`SharedGame::pulse_view`]
//! and never writes to it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::{AudioManager, SoundEffect};
use crate::sim::SharedGame;

/// Beat interval when the pulse starts (ms)
pub const START_INTERVAL_MS: f32 = 900.0;
/// Fraction of the gap to the target closed each beat
pub const EASE_RATE: f32 = 0.05;
/// Poll period while paused or game over
pub const IDLE_POLL: Duration = Duration::from_millis(150);

/// Target beat interval (ms) for a fragment count. Fewer fragments, faster
/// pulse.
pub fn target_interval_ms(fragment_count: usize) -> f32 {
    match fragment_count {
        0..=1 => 200.0,
        2 => 300.0,
        3..=4 => 450.0,
        5..=7 => 600.0,
        8..=11 => 750.0,
        _ => 900.0,
    }
}

/// One easing step toward `target`
#[inline]
pub fn ease_interval(current_ms: f32, target_ms: f32) -> f32 {
    current_ms + (target_ms - current_ms) * EASE_RATE
}

/// The current beat interval. Moves a little toward the target every beat,
/// never jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    interval_ms: f32,
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            interval_ms: START_INTERVAL_MS,
        }
    }
}

impl Tempo {
    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Ease toward the target for `fragment_count` and return the wait until
    /// the next beat
    pub fn advance(&mut self, fragment_count: usize) -> Duration {
        self.interval_ms = ease_interval(self.interval_ms, target_interval_ms(fragment_count));
        Duration::from_secs_f32(self.interval_ms / 1000.0)
    }
}

/// Lifecycle of the pulse thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatState {
    Stopped,
    Running,
}

/// Owner of the heartbeat thread. At most one pulse runs per instance.
#[derive(Debug, Default)]
pub struct Heartbeat {
    enabled: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HeartbeatState {
        if self.handle.is_some() && self.enabled.load(Ordering::SeqCst) {
            HeartbeatState::Running
        } else {
            HeartbeatState::Stopped
        }
    }

    /// Start pulsing. Returns false (and does nothing) if already running.
    pub fn start(&mut self, game: SharedGame, audio: AudioManager) -> bool {
        if self.state() == HeartbeatState::Running {
            log::debug!("Heartbeat already running");
            return false;
        }
        // A previous thread that was never joined
        self.stop();

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        self.enabled.store(true, Ordering::SeqCst);
        let enabled = Arc::clone(&self.enabled);

        let spawned = thread::Builder::new()
            .name("heartbeat".into())
            .spawn(move || pulse_loop(&game, &audio, &enabled, &stop_rx));

        match spawned {
            Ok(handle) => {
                self.stop_tx = Some(stop_tx);
                self.handle = Some(handle);
                log::info!("Heartbeat started");
                true
            }
            Err(e) => {
                self.enabled.store(false, Ordering::SeqCst);
                log::warn!("Failed to start heartbeat thread: {}", e);
                false
            }
        }
    }

    /// Stop pulsing and wait for the thread. Wakes a sleeping pulse at once.
    pub fn stop(&mut self) {
        self.enabled.store(false, Ordering::SeqCst);
        // Disconnecting the channel ends any recv_timeout in progress
        self.stop_tx = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Heartbeat thread panicked");
            } else {
                log::info!("Heartbeat stopped");
            }
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pulse_loop(game: &SharedGame, audio: &AudioManager, enabled: &AtomicBool, stop: &Receiver<()>) {
    let mut tempo = Tempo::default();

    while enabled.load(Ordering::SeqCst) {
        let view = game.pulse_view();
        let wait = if view.is_idle() {
            IDLE_POLL
        } else {
            let wait = tempo.advance(view.fragment_count);
            audio.play(SoundEffect::Heartbeat);
            wait
        };

        match stop.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
