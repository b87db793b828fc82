//! Audio output for Chiptone
//!
//! Live playback through the sound card and WAV export.

mod player;
mod wav;

pub use player::{default_device_name, list_output_devices, Player};
pub use wav::{export_wav, WavExporter};

use anyhow::Result;

use crate::synth::AudioBuffer;

/// Something that can play rendered notes
///
/// Buffers are moved in; a new buffer replaces the one playing.
pub trait PlaybackSink {
    fn play(&mut self, buffer: AudioBuffer) -> Result<()>;
    fn stop(&mut self);
}

/// Sink that discards everything, for running without an audio device
#[derive(Debug, Default)]
pub struct NullSink;

impl PlaybackSink for NullSink {
    fn play(&mut self, _buffer: AudioBuffer) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for Box<S> {
    fn play(&mut self, buffer: AudioBuffer) -> Result<()> {
        (**self).play(buffer)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}
