//! Synthesis engine for generating audio
//!
//! Contains waveforms, effect pedals, and the note renderer.

mod effects;
mod filter;
mod note;
mod oscillator;
mod render;

pub use effects::{BitCrush, Delay, Distortion, Effect, EffectChain, LowPass, MonoEffect, Pedal};
pub use filter::OnePole;
pub use note::{Note, MAX_DURATION};
pub use oscillator::Waveform;
pub use render::{
    render, to_pcm, AudioBuffer, PreviewSlice, RenderRequest, Rendered, Synthesizer,
    MAX_SAMPLE_RATE, PREVIEW_LEN,
};
