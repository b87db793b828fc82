//! Chiptone - chiptune keyboard synthesizer
//!
//! Renders single notes through a chain of retro effect pedals and records
//! what was played into replayable sessions.

pub mod config;
pub mod engine;
pub mod error;
pub mod keyboard;
pub mod session;
pub mod synth;
pub mod viz;

pub use config::ChiptoneConfig;
pub use error::{LoadError, SaveError, SynthError};
pub use session::SessionRecorder;
pub use synth::Synthesizer;
