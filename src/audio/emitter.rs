//! Output boundary for finished tones
//!
//! The game never talks to a sound card directly. Whatever plays the samples
//! implements [`ToneEmitter`]; failures come back as [`AudioError`] and are
//! swallowed by the audio worker.

use crossbeam_channel::{Sender, TrySendError};
use thiserror::Error;

use super::synth::{ToneBuffer, BITS_PER_SAMPLE, CHANNELS};

/// Transient playback failures. None of them are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("no audio output device available")]
    DeviceUnavailable,
    #[error("audio output device busy")]
    DeviceBusy,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Something that can play a [`ToneBuffer`] (44.1 kHz, signed 8-bit, mono)
/// on a best-effort basis.
pub trait ToneEmitter: Send {
    fn emit(&mut self, tone: &ToneBuffer) -> Result<(), AudioError>;
}

/// Discards every tone
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl ToneEmitter for NullEmitter {
    fn emit(&mut self, _tone: &ToneBuffer) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Logs each tone instead of playing it (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmitter;

impl ToneEmitter for LogEmitter {
    fn emit(&mut self, tone: &ToneBuffer) -> Result<(), AudioError> {
        log::debug!(
            "tone: {} samples ({:.0} ms, {}-bit, {} ch, peak {})",
            tone.len(),
            tone.duration().as_secs_f64() * 1000.0,
            BITS_PER_SAMPLE,
            CHANNELS,
            tone.peak()
        );
        Ok(())
    }
}

/// Hands tones to another thread (e.g. a device callback) over a channel.
///
/// A full channel reports [`AudioError::DeviceBusy`]; a dropped receiver
/// reports [`AudioError::DeviceUnavailable`].
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: Sender<ToneBuffer>,
}

impl ChannelEmitter {
    pub fn new(tx: Sender<ToneBuffer>) -> Self {
        Self { tx }
    }
}

impl ToneEmitter for ChannelEmitter {
    fn emit(&mut self, tone: &ToneBuffer) -> Result<(), AudioError> {
        self.tx.try_send(tone.clone()).map_err(|e| match e {
            TrySendError::Full(_) => AudioError::DeviceBusy,
            TrySendError::Disconnected(_) => AudioError::DeviceUnavailable,
        })
    }
}
