//! Render a saved session back to audio
//!
//! Notes are placed at their recorded offsets. Only one voice sounds at a
//! time: each note is cut off when the next one starts.

use log::debug;

use super::record::{Session, MAX_SESSION_SECS};
use crate::error::SynthError;
use crate::synth::{AudioBuffer, Note, Synthesizer, Waveform};

/// Render every note in `session` into one stereo buffer
///
/// Each note is rendered for `note_duration` seconds with the synthesizer's
/// current volume and effects.
pub fn render_session(
    session: &Session,
    synth: &Synthesizer,
    note_duration: f64,
) -> Result<AudioBuffer, SynthError> {
    let rate = synth.sample_rate();
    let starts = session
        .notes
        .iter()
        .map(|event| start_frame(event.offset_secs, rate))
        .collect::<Result<Vec<usize>, SynthError>>()?;

    let mut out: Vec<i16> = Vec::new();
    for (i, event) in session.notes.iter().enumerate() {
        let waveform: Waveform = event.waveform.parse()?;
        let note = Note::new(event.frequency, event.note.as_str(), waveform, note_duration)?;
        let rendered = synth.render_note(&note)?.buffer;

        let start = starts[i];
        let mut frames = rendered.frames();
        if let Some(&next) = starts.get(i + 1) {
            frames = frames.min(next.saturating_sub(start));
        }

        let end = start
            .checked_add(frames)
            .and_then(|f| f.checked_mul(2))
            .ok_or_else(|| SynthError::invalid("time", event.offset_secs))?;
        if out.len() < end {
            out.resize(end, 0);
        }
        out[start * 2..end].copy_from_slice(&rendered.samples()[..frames * 2]);
    }

    debug!(
        "replayed {} notes into {} frames",
        session.notes.len(),
        out.len() / 2
    );
    Ok(AudioBuffer::from_interleaved(out, rate))
}

/// Frame at which a note recorded at `offset_secs` starts
fn start_frame(offset_secs: f64, sample_rate: u32) -> Result<usize, SynthError> {
    if !(0.0..=MAX_SESSION_SECS).contains(&offset_secs) {
        return Err(SynthError::invalid("time", offset_secs));
    }
    Ok((offset_secs * sample_rate as f64).round() as usize)
}
