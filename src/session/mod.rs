//! Session recording
//!
//! Timestamps notes as they are played, persists finished recordings as
//! JSON, and renders them back to audio.

mod clock;
mod record;
mod recorder;
mod replay;
mod store;

pub use clock::{Clock, SystemClock};
pub use record::{
    format_timestamp, round2, RecordedEvent, Session, MAX_SESSION_SECS, TIMESTAMP_FORMAT,
};
pub use recorder::{RecorderState, SessionRecorder};
pub use replay::render_session;
pub use store::{load_file, SessionHandle, SessionStore};
