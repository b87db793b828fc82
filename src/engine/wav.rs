//! WAV file export
//!
//! Writes rendered buffers as 16-bit stereo PCM.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::synth::AudioBuffer;

/// WAV file writer for rendered audio
pub struct WavExporter {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    frames_written: u64,
}

impl WavExporter {
    /// Create a new exporter
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Sample rate in Hz
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: AudioBuffer::CHANNELS,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            frames_written: 0,
        })
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of stereo frames written
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Get the duration written in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Append a buffer
    pub fn write_buffer(&mut self, buffer: &AudioBuffer) -> Result<()> {
        for &sample in buffer.samples() {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.frames_written += buffer.frames() as u64;
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

/// Write a single buffer to `path`
pub fn export_wav(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    let mut exporter = WavExporter::create(path, buffer.sample_rate())?;
    exporter.write_buffer(buffer)?;
    exporter.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_exporter_creation() {
        let file = NamedTempFile::new().unwrap();
        let exporter = WavExporter::create(file.path(), 44100).unwrap();

        assert_eq!(exporter.sample_rate(), 44100);
        assert_eq!(exporter.frames_written(), 0);
        assert_eq!(exporter.duration_secs(), 0.0);
    }

    #[test]
    fn test_exporter_duration() {
        let file = NamedTempFile::new().unwrap();
        let mut exporter = WavExporter::create(file.path(), 44100).unwrap();

        exporter
            .write_buffer(&AudioBuffer::silence(44100, 44100))
            .unwrap();

        assert_eq!(exporter.frames_written(), 44100);
        assert!((exporter.duration_secs() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_export_produces_valid_wav() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let buffer = AudioBuffer::from_interleaved(vec![100, 100, -200, -200, 32767, 32767], 22050);
        export_wav(&path, &buffer).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();

        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, SampleFormat::Int);

        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples, buffer.samples());
    }
}
