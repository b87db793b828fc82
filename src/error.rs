//! Error types for synthesis and session persistence

use thiserror::Error;

/// Errors raised while building notes or rendering audio.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A numeric input was out of range (non-positive or not finite).
    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A waveform label that does not name a known waveform.
    #[error("unknown waveform '{0}'")]
    UnknownWaveform(String),
}

impl SynthError {
    pub(crate) fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}

/// Errors raised when persisting a recording session.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The recorder holds no events.
    #[error("nothing to save: no notes were recorded")]
    NothingToSave,

    /// Recording is still in progress; stop it first.
    #[error("recording still in progress")]
    StillRecording,

    /// The recordings directory or file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be encoded.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised when loading a saved session.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No recording with that name exists.
    #[error("recording not found: {0}")]
    NotFound(String),

    /// The recording exists but could not be read or is malformed.
    #[error("corrupt recording '{name}': {reason}")]
    Corrupt {
        /// Recording file name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl LoadError {
    pub(crate) fn corrupt(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
