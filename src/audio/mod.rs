//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//!
//! Requests go onto a bounded queue and a worker thread synthesizes and
//! emits them, so a slow or broken output never holds up a simulation tick.

pub mod emitter;
pub mod heartbeat;
pub mod synth;

pub use emitter::{AudioError, ChannelEmitter, LogEmitter, NullEmitter, ToneEmitter};
pub use heartbeat::{Heartbeat, HeartbeatState, Tempo};
pub use synth::{SAMPLE_RATE, ToneBuffer, noise, square_wave};

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crossbeam_channel::{Sender, TrySendError};
use rand::Rng;

use crate::settings::Settings;

/// Pending requests beyond this are dropped
pub const QUEUE_CAPACITY: usize = 64;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile fired - high blip
    Laser,
    /// Engine pulse
    Thrust,
    /// Fragment or ship destroyed
    Explosion,
    /// Background tension thump
    Heartbeat,
}

impl SoundEffect {
    /// Render the effect at the given gain (1.0 = as designed)
    pub fn synthesize<R: Rng>(self, gain: f32, rng: &mut R) -> ToneBuffer {
        match self {
            SoundEffect::Laser => square_wave(880.0, 90, 0.8 * gain, 0.8),
            SoundEffect::Thrust => square_wave(180.0, 120, 0.5 * gain, 1.0),
            SoundEffect::Explosion => noise(400, 0.9 * gain, 1.2, rng),
            // Low and slow to fade
            SoundEffect::Heartbeat => square_wave(70.0, 120, 0.9 * gain, 1.2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ToneRequest {
    effect: SoundEffect,
    gain: f32,
}

#[derive(Debug, Clone, Copy)]
struct Mix {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Mix {
    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

/// Audio manager for the game.
///
/// Cheap to clone; clones share the queue and the volume settings.
#[derive(Debug, Clone)]
pub struct AudioManager {
    tx: Option<Sender<ToneRequest>>,
    mix: Arc<Mutex<Mix>>,
}

impl AudioManager {
    /// Start a worker that plays through `emitter`
    pub fn new(emitter: Box<dyn ToneEmitter>) -> Self {
        Self::with_capacity(emitter, QUEUE_CAPACITY)
    }

    pub fn with_capacity(mut emitter: Box<dyn ToneEmitter>, capacity: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<ToneRequest>(capacity);
        let spawned = thread::Builder::new()
            .name("audio-out".into())
            .spawn(move || {
                let mut rng = rand::rng();
                // Ends once every sender is gone
                for request in rx {
                    let tone = request.effect.synthesize(request.gain, &mut rng);
                    if let Err(e) = emitter.emit(&tone) {
                        log::debug!("Dropped {:?}: {}", request.effect, e);
                    }
                }
                log::debug!("Audio worker finished");
            });

        let tx = match spawned {
            Ok(_) => Some(tx),
            Err(e) => {
                log::warn!("Failed to start audio worker - audio disabled: {}", e);
                None
            }
        };

        Self {
            tx,
            mix: Arc::new(Mutex::new(Mix {
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            })),
        }
    }

    /// A manager that plays nothing
    pub fn disabled() -> Self {
        Self {
            tx: None,
            mix: Arc::new(Mutex::new(Mix {
                master_volume: 0.0,
                sfx_volume: 0.0,
                muted: true,
            })),
        }
    }

    /// Take volume and mute preferences from settings
    pub fn apply_settings(&self, settings: &Settings) {
        let mut mix = self.lock_mix();
        mix.master_volume = settings.master_volume.clamp(0.0, 1.0);
        mix.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        mix.muted = settings.muted;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&self, vol: f32) {
        self.lock_mix().master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&self, vol: f32) {
        self.lock_mix().sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&self, muted: bool) {
        self.lock_mix().muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        self.lock_mix().effective_volume()
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a sound effect. Never blocks; a full queue or a dead worker
    /// just loses the sound.
    pub fn play(&self, effect: SoundEffect) {
        let gain = self.effective_volume();
        if gain <= 0.0 {
            return;
        }
        let Some(tx) = &self.tx else { return };

        match tx.try_send(ToneRequest { effect, gain }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::trace!("Audio queue full, dropping {:?}", effect),
            Err(TrySendError::Disconnected(_)) => {
                log::trace!("Audio worker gone, dropping {:?}", effect)
            }
        }
    }

    fn lock_mix(&self) -> std::sync::MutexGuard<'_, Mix> {
        self.mix.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
