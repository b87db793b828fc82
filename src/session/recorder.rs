//! Note recorder
//!
//! Captures timestamped note events between `start` and `stop`, then hands
//! the frozen session to a [`SessionStore`].

use std::time::Instant;

use log::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::record::{round2, RecordedEvent, Session, MAX_SESSION_SECS};
use super::store::{SessionHandle, SessionStore};
use crate::error::{LoadError, SaveError};
use crate::synth::{Note, Waveform};

/// Recorder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Records played notes for later saving
pub struct SessionRecorder<C: Clock = SystemClock> {
    store: SessionStore,
    clock: C,
    state: RecorderState,
    started_at: Option<Instant>,
    duration_secs: f64,
    events: Vec<RecordedEvent>,
}

impl SessionRecorder<SystemClock> {
    /// Create a recorder using the system clock
    pub fn new(store: SessionStore) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> SessionRecorder<C> {
    /// Create a recorder with an explicit time source
    pub fn with_clock(store: SessionStore, clock: C) -> Self {
        Self {
            store,
            clock,
            state: RecorderState::Idle,
            started_at: None,
            duration_secs: 0.0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Events captured in the current (or last) recording
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Length of the last finished recording, or time elapsed so far
    pub fn duration_secs(&self) -> f64 {
        match (self.state, self.started_at) {
            (RecorderState::Recording, Some(start)) => self.elapsed_since(start),
            _ => self.duration_secs,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Begin a new recording, discarding any previous events
    pub fn start(&mut self) {
        self.events.clear();
        self.duration_secs = 0.0;
        self.started_at = Some(self.clock.now());
        self.state = RecorderState::Recording;
        info!("recording started");
    }

    /// Finish the recording; events are kept for saving
    pub fn stop(&mut self) {
        if self.state != RecorderState::Recording {
            return;
        }
        if let Some(start) = self.started_at {
            self.duration_secs = round2(self.elapsed_since(start)).min(MAX_SESSION_SECS);
        }
        self.state = RecorderState::Idle;
        info!(
            "recording stopped: {} notes in {:.2}s",
            self.events.len(),
            self.duration_secs
        );
    }

    /// Start if idle, stop if recording. Returns whether recording is now on.
    pub fn toggle(&mut self) -> bool {
        if self.is_recording() {
            self.stop();
        } else {
            self.start();
        }
        self.is_recording()
    }

    /// Append a note event; ignored unless recording
    ///
    /// Returns whether the event was recorded.
    pub fn add_event(&mut self, note: &str, frequency: f64, waveform: Waveform) -> bool {
        let Some(start) = self.started_at.filter(|_| self.is_recording()) else {
            return false;
        };

        let offset_secs = round2(self.elapsed_since(start));
        if offset_secs > MAX_SESSION_SECS {
            warn!("recording is full, dropping {} at {:.2}s", note, offset_secs);
            return false;
        }
        debug!("recorded {} at {:.2}s", note, offset_secs);
        self.events.push(RecordedEvent {
            offset_secs,
            note: note.to_string(),
            frequency,
            waveform: waveform.name().to_string(),
        });
        true
    }

    /// [`add_event`](Self::add_event) for a [`Note`]
    pub fn add_note(&mut self, note: &Note) -> bool {
        self.add_event(note.name(), note.frequency(), note.waveform())
    }

    /// Freeze the finished recording into a session without writing it
    pub fn snapshot(&self) -> Result<Session, SaveError> {
        if self.is_recording() {
            return Err(SaveError::StillRecording);
        }
        if self.events.is_empty() {
            return Err(SaveError::NothingToSave);
        }
        Ok(Session::new(
            self.clock.local_now(),
            self.duration_secs,
            self.events.clone(),
        ))
    }

    /// Write the finished recording to the store
    ///
    /// Only valid after `stop` with at least one event. Events are kept, so
    /// saving again writes another file.
    pub fn save(&self) -> Result<SessionHandle, SaveError> {
        let session = self.snapshot()?;
        self.store.save(&session)
    }

    /// Load a previously saved session from the store
    pub fn load(&self, id: &str) -> Result<Session, LoadError> {
        self.store.load(id)
    }

    fn elapsed_since(&self, start: Instant) -> f64 {
        self.clock.now().saturating_duration_since(start).as_secs_f64()
    }
}
