//! Effect pedals
//!
//! Each effect owns an independent parameter record; [`EffectChain`] holds one
//! of each plus its on/off state. Parameters are clamped at construction and
//! toggling never touches them.

use std::fmt;

use super::filter::{clamp_alpha, OnePole, DEFAULT_ALPHA};

/// Effect identifiers, in pedal-board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Distortion,
    Delay,
    LowPass,
    BitCrush,
}

impl Effect {
    /// All effects in pedal-board order.
    pub const ALL: [Effect; 4] = [
        Effect::Distortion,
        Effect::Delay,
        Effect::LowPass,
        Effect::BitCrush,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Effect::Distortion => "DISTORTION",
            Effect::Delay => "DELAY",
            Effect::LowPass => "LOW PASS",
            Effect::BitCrush => "BIT CRUSH",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An effect that transforms the mono floating-point signal in place.
pub trait MonoEffect {
    fn apply(&self, samples: &mut [f64]);
}

/// Soft clipping via `tanh(x * drive)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    drive: f64,
}

impl Distortion {
    pub const DEFAULT_DRIVE: f64 = 2.0;
    pub const MAX_DRIVE: f64 = 100.0;

    /// Drive is clamped to `[0, 100]`.
    pub fn new(drive: f64) -> Self {
        let drive = if drive.is_finite() {
            drive.clamp(0.0, Self::MAX_DRIVE)
        } else {
            Self::DEFAULT_DRIVE
        };
        Self { drive }
    }

    pub fn drive(&self) -> f64 {
        self.drive
    }
}

impl Default for Distortion {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DRIVE)
    }
}

impl MonoEffect for Distortion {
    fn apply(&self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = (*sample * self.drive).tanh();
        }
    }
}

/// Amplitude quantization to `2^bits` levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCrush {
    bits: u8,
}

impl BitCrush {
    pub const DEFAULT_BITS: u8 = 4;

    /// Bits are clamped to `[1, 16]`.
    pub fn new(bits: u8) -> Self {
        Self {
            bits: bits.clamp(1, 16),
        }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn levels(&self) -> f64 {
        (1u32 << self.bits) as f64
    }
}

impl Default for BitCrush {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BITS)
    }
}

impl MonoEffect for BitCrush {
    fn apply(&self, samples: &mut [f64]) {
        let levels = self.levels();
        for sample in samples.iter_mut() {
            *sample = (*sample * levels).round() / levels;
        }
    }
}

/// One-pole smoothing, see [`OnePole`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPass {
    alpha: f64,
}

impl LowPass {
    /// Alpha is clamped to `(0, 1]`.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for LowPass {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl MonoEffect for LowPass {
    fn apply(&self, samples: &mut [f64]) {
        OnePole::new(self.alpha).process_buffer(samples);
    }
}

/// Single echo mixed at half gain on the interleaved 16-bit stereo buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    time: f64,
}

impl Delay {
    pub const DEFAULT_TIME: f64 = 0.3;
    pub const MAX_TIME: f64 = 5.0;

    /// Time in seconds, clamped to `[0, 5]`.
    pub fn new(time: f64) -> Self {
        let time = if time.is_finite() {
            time.clamp(0.0, Self::MAX_TIME)
        } else {
            Self::DEFAULT_TIME
        };
        Self { time }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn delay_frames(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.time).round() as usize
    }

    /// Mix the echo into `stereo` (interleaved L/R frames).
    ///
    /// The echo is the dry signal shifted forward by the delay with a silent
    /// prefix; nothing wraps from the tail. Mixing saturates at the i16 range.
    /// Buffers not longer than the delay are left untouched.
    pub fn apply_stereo(&self, stereo: &mut [i16], sample_rate: u32) {
        let frames = stereo.len() / 2;
        let delay = self.delay_frames(sample_rate);
        if frames <= delay {
            return;
        }

        let offset = delay * 2;
        let dry = stereo.to_vec();
        for (out, &echo) in stereo[offset..].iter_mut().zip(dry.iter()) {
            *out = out.saturating_add(echo / 2);
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIME)
    }
}

/// An effect's parameters plus whether it is switched on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pedal<P> {
    pub enabled: bool,
    pub params: P,
}

impl<P> Pedal<P> {
    pub fn new(enabled: bool, params: P) -> Self {
        Self { enabled, params }
    }
}

/// Full effect configuration, copied by value into each render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectChain {
    pub distortion: Pedal<Distortion>,
    pub delay: Pedal<Delay>,
    pub low_pass: Pedal<LowPass>,
    pub bit_crush: Pedal<BitCrush>,
}

impl EffectChain {
    /// All effects switched off, default parameters.
    pub fn bypassed() -> Self {
        Self {
            distortion: Pedal::new(false, Distortion::default()),
            delay: Pedal::new(false, Delay::default()),
            low_pass: Pedal::new(false, LowPass::default()),
            bit_crush: Pedal::new(false, BitCrush::default()),
        }
    }

    pub fn is_enabled(&self, effect: Effect) -> bool {
        match effect {
            Effect::Distortion => self.distortion.enabled,
            Effect::Delay => self.delay.enabled,
            Effect::LowPass => self.low_pass.enabled,
            Effect::BitCrush => self.bit_crush.enabled,
        }
    }

    pub fn set_enabled(&mut self, effect: Effect, enabled: bool) {
        match effect {
            Effect::Distortion => self.distortion.enabled = enabled,
            Effect::Delay => self.delay.enabled = enabled,
            Effect::LowPass => self.low_pass.enabled = enabled,
            Effect::BitCrush => self.bit_crush.enabled = enabled,
        }
    }

    /// Flip an effect on or off, returning its new state.
    pub fn toggle(&mut self, effect: Effect) -> bool {
        let enabled = !self.is_enabled(effect);
        self.set_enabled(effect, enabled);
        enabled
    }

    /// Builder-style variant of [`set_enabled`](Self::set_enabled).
    pub fn with(mut self, effect: Effect, enabled: bool) -> Self {
        self.set_enabled(effect, enabled);
        self
    }

    /// Run the enabled mono stages in order: distortion, bit-crush, low-pass.
    pub fn apply_mono(&self, samples: &mut [f64]) {
        if self.distortion.enabled {
            self.distortion.params.apply(samples);
        }
        if self.bit_crush.enabled {
            self.bit_crush.params.apply(samples);
        }
        if self.low_pass.enabled {
            self.low_pass.params.apply(samples);
        }
    }

    /// Run the stereo stage (delay) if enabled.
    pub fn apply_stereo(&self, stereo: &mut [i16], sample_rate: u32) {
        if self.delay.enabled {
            self.delay.params.apply_stereo(stereo, sample_rate);
        }
    }
}

impl Default for EffectChain {
    /// Bit-crush on, everything else off.
    fn default() -> Self {
        Self::bypassed().with(Effect::BitCrush, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain() {
        let chain = EffectChain::default();
        assert!(chain.is_enabled(Effect::BitCrush));
        assert!(!chain.is_enabled(Effect::Distortion));
        assert!(!chain.is_enabled(Effect::Delay));
        assert!(!chain.is_enabled(Effect::LowPass));
        assert_eq!(chain.distortion.params.drive(), 2.0);
        assert_eq!(chain.delay.params.time(), 0.3);
        assert_eq!(chain.bit_crush.params.bits(), 4);
        assert_eq!(chain.low_pass.params.alpha(), 0.1);
    }

    #[test]
    fn test_toggle_keeps_parameters() {
        let mut chain = EffectChain::default();
        chain.distortion.params = Distortion::new(7.5);

        assert!(chain.toggle(Effect::Distortion));
        assert!(!chain.toggle(Effect::Distortion));
        assert_eq!(chain.distortion.params.drive(), 7.5);
    }

    #[test]
    fn test_parameter_clamping() {
        assert_eq!(Distortion::new(-3.0).drive(), 0.0);
        assert_eq!(Distortion::new(1e9).drive(), Distortion::MAX_DRIVE);
        assert_eq!(BitCrush::new(0).bits(), 1);
        assert_eq!(BitCrush::new(40).bits(), 16);
        assert_eq!(Delay::new(-1.0).time(), 0.0);
        assert_eq!(Delay::new(f64::INFINITY).time(), Delay::DEFAULT_TIME);
        assert_eq!(LowPass::new(2.0).alpha(), 1.0);
    }

    #[test]
    fn test_distortion_bounded() {
        let mut samples = vec![-50.0, -1.0, 0.0, 1.0, 50.0];
        Distortion::new(10.0).apply(&mut samples);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
        assert_eq!(samples[2], 0.0);
    }

    #[test]
    fn test_bit_crush_levels() {
        let mut samples = vec![0.0, 0.03, 0.5, -0.97, 1.0];
        BitCrush::new(4).apply(&mut samples);
        assert_eq!(samples, vec![0.0, 0.0, 0.5, -1.0, 1.0]);
    }

    #[test]
    fn test_delay_frames() {
        assert_eq!(Delay::new(0.3).delay_frames(44100), 13230);
        assert_eq!(Delay::new(0.0).delay_frames(44100), 0);
    }

    #[test]
    fn test_delay_mix() {
        // 2 frames of delay at 10 Hz = 0.2 s
        let delay = Delay::new(0.2);
        let mut stereo = vec![100, 100, 200, 200, 30000, 30000, 400, 400, 32000, 32000];
        delay.apply_stereo(&mut stereo, 10);

        assert_eq!(
            stereo,
            vec![100, 100, 200, 200, 30050, 30050, 500, 500, 32767, 32767]
        );
    }

    #[test]
    fn test_delay_short_buffer_untouched() {
        let delay = Delay::new(0.5);
        let mut stereo = vec![1000, 1000, 2000, 2000];
        delay.apply_stereo(&mut stereo, 10);
        assert_eq!(stereo, vec![1000, 1000, 2000, 2000]);
    }

    #[test]
    fn test_mono_stage_order() {
        // Distortion runs before bit-crush: tanh(0.3 * 2) = 0.537 -> 9/16
        let chain = EffectChain::bypassed()
            .with(Effect::Distortion, true)
            .with(Effect::BitCrush, true);
        let mut samples = vec![0.3];
        chain.apply_mono(&mut samples);
        assert_eq!(samples[0], 9.0 / 16.0);
    }
}
