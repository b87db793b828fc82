//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::synth::{BitCrush, Delay, Distortion, EffectChain, LowPass, Pedal, Waveform};

/// Main configuration for Chiptone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChiptoneConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Synth settings (volume, note length, starting waveform)
    #[serde(default)]
    pub synth: SynthConfig,

    /// Effect pedals
    #[serde(default)]
    pub effects: EffectsConfig,

    /// Session recording
    #[serde(default)]
    pub recorder: RecorderConfig,
}

impl ChiptoneConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }

        if !(0.0..=1.0).contains(&self.synth.volume) {
            bail!("Volume must be between 0.0 and 1.0");
        }
        if !(self.synth.note_duration > 0.0 && self.synth.note_duration <= 10.0) {
            bail!("Note duration must be greater than 0 and at most 10 seconds");
        }

        let fx = &self.effects;
        if !(0.0..=Distortion::MAX_DRIVE).contains(&fx.distortion.drive) {
            bail!("Distortion drive must be between 0 and {}", Distortion::MAX_DRIVE);
        }
        if !(0.0..=Delay::MAX_TIME).contains(&fx.delay.time) {
            bail!("Delay time must be between 0 and {} seconds", Delay::MAX_TIME);
        }
        if !(fx.low_pass.alpha > 0.0 && fx.low_pass.alpha <= 1.0) {
            bail!("Low-pass alpha must be greater than 0 and at most 1");
        }
        if !(1..=16).contains(&fx.bit_crush.bits) {
            bail!("Bit-crush bits must be between 1 and 16");
        }

        if self.recorder.directory.as_os_str().is_empty() {
            bail!("Recorder directory must not be empty");
        }

        Ok(())
    }

    /// Effect chain described by the `effects` section
    pub fn effect_chain(&self) -> EffectChain {
        let fx = &self.effects;
        EffectChain {
            distortion: Pedal::new(fx.distortion.enabled, Distortion::new(fx.distortion.drive)),
            delay: Pedal::new(fx.delay.enabled, Delay::new(fx.delay.time)),
            low_pass: Pedal::new(fx.low_pass.enabled, LowPass::new(fx.low_pass.alpha)),
            bit_crush: Pedal::new(fx.bit_crush.enabled, BitCrush::new(fx.bit_crush.bits)),
        }
    }
}

/// Audio output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }

/// Synth settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Volume 0.0-1.0 (default: 0.5)
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Length of each rendered note in seconds (default: 1.0)
    #[serde(default = "default_note_duration")]
    pub note_duration: f64,

    /// Waveform selected at startup (default: sine)
    #[serde(default)]
    pub waveform: Waveform,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            note_duration: default_note_duration(),
            waveform: Waveform::default(),
        }
    }
}

fn default_volume() -> f64 { 0.5 }
fn default_note_duration() -> f64 { 1.0 }

/// Effect pedal settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default)]
    pub distortion: DistortionConfig,
    #[serde(default)]
    pub delay: DelayConfig,
    #[serde(default)]
    pub low_pass: LowPassConfig,
    #[serde(default)]
    pub bit_crush: BitCrushConfig,
}

/// Soft-clip distortion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistortionConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Drive amount (default: 2.0)
    #[serde(default = "default_drive")]
    pub drive: f64,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            drive: default_drive(),
        }
    }
}

fn default_drive() -> f64 { Distortion::DEFAULT_DRIVE }

/// Single echo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Delay time in seconds (default: 0.3)
    #[serde(default = "default_delay_time")]
    pub time: f64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_delay_time(),
        }
    }
}

fn default_delay_time() -> f64 { Delay::DEFAULT_TIME }

/// One-pole low-pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowPassConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Smoothing coefficient (default: 0.1)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for LowPassConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha: default_alpha(),
        }
    }
}

fn default_alpha() -> f64 { 0.1 }

/// Bit-depth reduction, on by default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitCrushConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Quantization bits (default: 4)
    #[serde(default = "default_bits")]
    pub bits: u8,
}

impl Default for BitCrushConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            bits: default_bits(),
        }
    }
}

fn default_enabled() -> bool { true }
fn default_bits() -> u8 { BitCrush::DEFAULT_BITS }

/// Session recording settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Directory for saved sessions (default: recordings)
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> PathBuf { PathBuf::from("recordings") }
