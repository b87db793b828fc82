//! Note rendering
//!
//! Turns a pitch, waveform and effect chain into a finished 16-bit stereo
//! buffer plus a short mono preview for display.

use log::debug;

use super::effects::{Effect, EffectChain};
use super::note::{check_duration, check_positive, Note};
use super::Waveform;
use crate::error::SynthError;

/// Number of mono samples kept for waveform display.
pub const PREVIEW_LEN: usize = 300;

/// Highest sample rate a render accepts.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Interleaved 16-bit stereo PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub const CHANNELS: u16 = 2;

    /// Wrap interleaved stereo samples. A trailing half frame is dropped.
    pub fn from_interleaved(mut samples: Vec<i16>, sample_rate: u32) -> Self {
        samples.truncate(samples.len() / 2 * 2);
        Self {
            samples,
            sample_rate,
        }
    }

    /// A silent buffer of `frames` frames.
    pub fn silence(frames: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0; frames * 2],
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Left/right pair at `index`.
    pub fn frame(&self, index: usize) -> Option<[i16; 2]> {
        let i = index * 2;
        Some([*self.samples.get(i)?, *self.samples.get(i + 1)?])
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

/// Mono prefix of a rendered note, for visualization only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSlice(Vec<i16>);

impl PreviewSlice {
    pub fn as_slice(&self) -> &[i16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a render needs, captured by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub frequency: f64,
    pub waveform: Waveform,
    pub duration: f64,
    /// Clamped to `[0, 1]` before use.
    pub volume: f64,
    pub effects: EffectChain,
}

/// Output of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub buffer: AudioBuffer,
    pub preview: PreviewSlice,
}

/// Render a note.
///
/// Fails with `InvalidParameter` for a non-positive frequency, a duration
/// outside `(0, MAX_DURATION]`, or a sample rate outside `1..=MAX_SAMPLE_RATE`.
///
/// Stages run in order: waveform, distortion, bit-crush, low-pass, volume,
/// preview capture, 16-bit conversion, stereo duplication, delay.
pub fn render(sample_rate: u32, request: &RenderRequest) -> Result<Rendered, SynthError> {
    check_positive("frequency", request.frequency)?;
    check_duration(request.duration)?;
    if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
        return Err(SynthError::invalid("sample_rate", sample_rate as f64));
    }

    let rate = sample_rate as f64;
    let n = (rate * request.duration).round() as usize;
    let volume = if request.volume.is_finite() {
        request.volume.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut wave: Vec<f64> = (0..n)
        .map(|i| request.waveform.sample(request.frequency * (i as f64 / rate)))
        .collect();

    request.effects.apply_mono(&mut wave);

    let mono: Vec<i16> = wave.iter().map(|&s| to_pcm(s * volume)).collect();
    let preview = PreviewSlice(mono[..n.min(PREVIEW_LEN)].to_vec());

    let mut stereo: Vec<i16> = mono.iter().flat_map(|&s| [s, s]).collect();
    request.effects.apply_stereo(&mut stereo, sample_rate);

    debug!(
        "rendered {:.2} Hz {} for {:.2}s ({} frames, effects: {:?})",
        request.frequency,
        request.waveform,
        request.duration,
        n,
        Effect::ALL
            .iter()
            .filter(|&&e| request.effects.is_enabled(e))
            .collect::<Vec<_>>()
    );

    Ok(Rendered {
        buffer: AudioBuffer {
            samples: stereo,
            sample_rate,
        },
        preview,
    })
}

/// Convert a float sample to 16-bit PCM: clamp to `[-1, 1]`, scale by
/// 32767, truncate toward zero.
pub fn to_pcm(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f64) as i16
}

/// Monophonic synthesizer with persistent settings.
///
/// Holds the volume and effect chain between notes, plus display state for
/// the note currently sounding.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    sample_rate: u32,
    volume: f64,
    effects: EffectChain,
    current: Option<Note>,
    preview: PreviewSlice,
}

impl Synthesizer {
    /// Create a new synthesizer
    pub fn new(sample_rate: u32, volume: f64, effects: EffectChain) -> Self {
        Self {
            sample_rate,
            volume: volume.clamp(0.0, 1.0),
            effects,
            current: None,
            preview: PreviewSlice::default(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Set the volume, clamped to `[0, 1]`
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn effects(&self) -> &EffectChain {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectChain {
        &mut self.effects
    }

    /// Flip an effect pedal, returning its new state
    pub fn toggle(&mut self, effect: Effect) -> bool {
        self.effects.toggle(effect)
    }

    /// Render a note with the current settings, without touching display state
    pub fn render_note(&self, note: &Note) -> Result<Rendered, SynthError> {
        let request = RenderRequest {
            frequency: note.frequency(),
            waveform: note.waveform(),
            duration: note.duration(),
            volume: self.volume,
            effects: self.effects,
        };
        render(self.sample_rate, &request)
    }

    /// Render a note and make it the current one
    ///
    /// The returned buffer belongs to the caller; the preview is kept for
    /// display via [`preview`](Self::preview).
    pub fn play_note(&mut self, note: &Note) -> Result<AudioBuffer, SynthError> {
        let Rendered { buffer, preview } = self.render_note(note)?;
        self.current = Some(note.clone());
        self.preview = preview;
        Ok(buffer)
    }

    /// Clear the current note
    pub fn stop(&mut self) {
        self.current = None;
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.current.as_ref()
    }

    pub fn current_frequency(&self) -> Option<f64> {
        self.current.as_ref().map(Note::frequency)
    }

    /// Preview slice of the last rendered note
    pub fn preview(&self) -> &PreviewSlice {
        &self.preview
    }
}
