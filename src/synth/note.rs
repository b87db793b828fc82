//! Note value type

use super::Waveform;
use crate::error::SynthError;

/// Longest note that will be rendered, in seconds.
pub const MAX_DURATION: f64 = 60.0;

/// A pitch to play, as produced by the key map.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    frequency: f64,
    name: String,
    waveform: Waveform,
    duration: f64,
}

impl Note {
    /// Create a note; frequency must be positive, duration in `(0, MAX_DURATION]`.
    pub fn new(
        frequency: f64,
        name: impl Into<String>,
        waveform: Waveform,
        duration: f64,
    ) -> Result<Self, SynthError> {
        check_positive("frequency", frequency)?;
        check_duration(duration)?;
        Ok(Self {
            frequency,
            name: name.into(),
            waveform,
            duration,
        })
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), SynthError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SynthError::invalid(name, value))
    }
}

pub(crate) fn check_duration(value: f64) -> Result<(), SynthError> {
    check_positive("duration", value)?;
    if value > MAX_DURATION {
        return Err(SynthError::invalid("duration", value));
    }
    Ok(())
}
