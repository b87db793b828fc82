//! Basic waveform shapes

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// All waveforms in selector order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Lower-case label, as stored in session files.
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    /// The waveform after this one in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&w| w == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Evaluate the waveform at an absolute phase (cycles, `frequency * t`).
    ///
    /// Output lies in `[-1, 1]`. The square wave is `sign(sin)`, which is 0
    /// at exact zero crossings.
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                let s = (2.0 * PI * phase).sin();
                if s > 0.0 {
                    1.0
                } else if s < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Waveform::Sawtooth => 2.0 * (phase - (0.5 + phase).floor()),
            Waveform::Triangle => 2.0 * (2.0 * (phase - (phase + 0.5).floor())).abs() - 1.0,
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SynthError::UnknownWaveform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_shape() {
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-12);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-12);
        assert!((Waveform::Sine.sample(0.75) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_square_shape() {
        assert_eq!(Waveform::Square.sample(0.0), 0.0);
        assert_eq!(Waveform::Square.sample(0.1), 1.0);
        assert_eq!(Waveform::Square.sample(0.4), 1.0);
        assert_eq!(Waveform::Square.sample(0.6), -1.0);
        assert_eq!(Waveform::Square.sample(0.9), -1.0);
    }

    #[test]
    fn test_sawtooth_shape() {
        // Rises from 0 at phase 0, jumps from +1 to -1 at phase 0.5
        assert_eq!(Waveform::Sawtooth.sample(0.0), 0.0);
        assert_eq!(Waveform::Sawtooth.sample(0.25), 0.5);
        assert_eq!(Waveform::Sawtooth.sample(0.5), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.75), -0.5);
        assert_eq!(Waveform::Sawtooth.sample(1.25), 0.5);
    }

    #[test]
    fn test_triangle_shape() {
        assert_eq!(Waveform::Triangle.sample(0.0), -1.0);
        assert_eq!(Waveform::Triangle.sample(0.25), 0.0);
        assert_eq!(Waveform::Triangle.sample(0.5), 1.0);
        assert_eq!(Waveform::Triangle.sample(0.75), 0.0);
        assert_eq!(Waveform::Triangle.sample(1.0), -1.0);
    }

    #[test]
    fn test_all_shapes_bounded() {
        for waveform in Waveform::ALL {
            for i in 0..2000 {
                let s = waveform.sample(i as f64 * 0.0137);
                assert!((-1.0..=1.0).contains(&s), "{} out of range: {}", waveform, s);
            }
        }
    }

    #[test]
    fn test_next_cycles() {
        assert_eq!(Waveform::Sine.next(), Waveform::Square);
        assert_eq!(Waveform::Triangle.next(), Waveform::Sine);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("sawtooth".parse::<Waveform>().unwrap(), Waveform::Sawtooth);
        assert_eq!("Triangle".parse::<Waveform>().unwrap(), Waveform::Triangle);
        assert!(matches!(
            "noise".parse::<Waveform>(),
            Err(SynthError::UnknownWaveform(_))
        ));
    }
}
