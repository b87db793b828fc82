//! Persisted session format
//!
//! ```json
//! {
//!   "timestamp": "20240309_140507",
//!   "duration": 3.42,
//!   "total_notes": 2,
//!   "notes": [
//!     { "time": 0.0, "note": "C", "freq": 261.63, "wave": "sine" },
//!     { "time": 0.5, "note": "E", "freq": 329.63, "wave": "sine" }
//!   ]
//! }
//! ```

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// `strftime` layout of session timestamps and file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Longest session, in seconds. Note times and durations beyond this are
/// rejected.
pub const MAX_SESSION_SECS: f64 = 3600.0;

/// One note played while recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Seconds since recording started, two decimals.
    #[serde(rename = "time")]
    pub offset_secs: f64,
    pub note: String,
    #[serde(rename = "freq")]
    pub frequency: f64,
    #[serde(rename = "wave")]
    pub waveform: String,
}

/// A saved recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// When the session was saved, in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Length of the recording interval in seconds, two decimals.
    #[serde(rename = "duration")]
    pub duration_secs: f64,
    pub total_notes: usize,
    pub notes: Vec<RecordedEvent>,
}

impl Session {
    pub fn new(saved_at: DateTime<Local>, duration_secs: f64, notes: Vec<RecordedEvent>) -> Self {
        Self {
            timestamp: format_timestamp(saved_at),
            duration_secs: round2(duration_secs),
            total_notes: notes.len(),
            notes,
        }
    }

    /// Parsed form of [`timestamp`](Self::timestamp).
    pub fn saved_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }

    /// Check the record is internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.saved_at().is_none() {
            return Err(format!("bad timestamp '{}'", self.timestamp));
        }
        if !(0.0..=MAX_SESSION_SECS).contains(&self.duration_secs) {
            return Err(format!("bad duration {}", self.duration_secs));
        }
        if self.total_notes != self.notes.len() {
            return Err(format!(
                "total_notes is {} but {} notes are present",
                self.total_notes,
                self.notes.len()
            ));
        }

        let mut last = 0.0;
        for (i, event) in self.notes.iter().enumerate() {
            if !event.offset_secs.is_finite() || event.offset_secs < last {
                return Err(format!("note {} has out-of-order time {}", i, event.offset_secs));
            }
            if event.offset_secs > MAX_SESSION_SECS {
                return Err(format!("note {} is past the end at {}", i, event.offset_secs));
            }
            if !event.frequency.is_finite() || event.frequency <= 0.0 {
                return Err(format!("note {} has bad frequency {}", i, event.frequency));
            }
            last = event.offset_secs;
        }
        Ok(())
    }
}

pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(time: f64, note: &str) -> RecordedEvent {
        RecordedEvent {
            offset_secs: time,
            note: note.to_string(),
            frequency: 261.63,
            waveform: "sine".to_string(),
        }
    }

    fn saved_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.504), 0.5);
        assert_eq!(round2(1.235001), 1.24);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_session_new() {
        let session = Session::new(saved_at(), 3.4199, vec![event(0.0, "C"), event(0.5, "E")]);
        assert_eq!(session.timestamp, "20240309_140507");
        assert_eq!(session.duration_secs, 3.42);
        assert_eq!(session.total_notes, 2);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_json_field_names() {
        let session = Session::new(saved_at(), 1.0, vec![event(0.25, "C#")]);
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["timestamp"], "20240309_140507");
        assert_eq!(json["duration"], 1.0);
        assert_eq!(json["total_notes"], 1);
        assert_eq!(json["notes"][0]["time"], 0.25);
        assert_eq!(json["notes"][0]["note"], "C#");
        assert_eq!(json["notes"][0]["freq"], 261.63);
        assert_eq!(json["notes"][0]["wave"], "sine");
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let mut session = Session::new(saved_at(), 1.0, vec![event(0.0, "C")]);
        session.total_notes = 3;
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_order() {
        let session = Session::new(saved_at(), 1.0, vec![event(0.5, "C"), event(0.2, "D")]);
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_validate_allows_ties() {
        let session = Session::new(saved_at(), 1.0, vec![event(0.5, "C"), event(0.5, "D")]);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_far_offsets() {
        let session = Session::new(saved_at(), 1.0, vec![event(0.0, "C"), event(1e30, "D")]);
        assert!(session.validate().is_err());

        let session = Session::new(saved_at(), 1.0, vec![event(MAX_SESSION_SECS, "C")]);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        let mut session = Session::new(saved_at(), 1.0, vec![event(0.0, "C")]);
        session.duration_secs = f64::INFINITY;
        assert!(session.validate().is_err());
        session.duration_secs = MAX_SESSION_SECS * 2.0;
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_timestamp() {
        let mut session = Session::new(saved_at(), 1.0, vec![event(0.0, "C")]);
        session.timestamp = "yesterday".to_string();
        assert!(session.validate().is_err());
    }
}
