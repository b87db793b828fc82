//! Real-time audio playback using cpal

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use log::{info, warn};
use std::sync::{Arc, Mutex};

use super::PlaybackSink;
use crate::synth::AudioBuffer;

/// Buffer currently being played, with a read position in frames.
struct Playback {
    samples: Vec<i16>,
    frame: usize,
}

impl Playback {
    /// Next left/right pair, or `None` once the buffer is exhausted
    fn next_frame(&mut self) -> Option<(i16, i16)> {
        let i = self.frame * 2;
        let pair = (*self.samples.get(i)?, *self.samples.get(i + 1)?);
        self.frame += 1;
        Some(pair)
    }
}

type Slot = Arc<Mutex<Option<Playback>>>;

/// Single-voice audio player
///
/// Each `play` replaces whatever was sounding.
pub struct Player {
    _stream: Stream,
    slot: Slot,
    sample_rate: u32,
}

impl Player {
    /// Open an output stream on the named device, or the default one
    pub fn open(sample_rate: u32, device_name: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device_name {
            Some(name) => host
                .output_devices()?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| anyhow!("Output device '{}' not found", name))?,
            None => host
                .default_output_device()
                .ok_or_else(|| anyhow!("No output device available"))?,
        };

        let (stream_config, sample_format) = choose_config(&device, sample_rate)?;
        let slot: Slot = Arc::new(Mutex::new(None));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, slot.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, slot.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, slot.clone())?,
            _ => return Err(anyhow!("Unsupported sample format")),
        };
        stream.play().context("failed to start output stream")?;

        info!(
            "audio output on {} ({} Hz, {} ch)",
            device.name().unwrap_or_default(),
            stream_config.sample_rate.0,
            stream_config.channels
        );

        Ok(Self {
            _stream: stream,
            slot,
            sample_rate,
        })
    }
}

impl PlaybackSink for Player {
    fn play(&mut self, buffer: AudioBuffer) -> Result<()> {
        if buffer.sample_rate() != self.sample_rate {
            warn!(
                "buffer rendered at {} Hz, stream runs at {} Hz",
                buffer.sample_rate(),
                self.sample_rate
            );
        }
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("playback state poisoned"))?;
        *slot = Some(Playback {
            samples: buffer.into_samples(),
            frame: 0,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Prefer a stereo config at our sample rate; fall back to the device default
fn choose_config(device: &Device, sample_rate: u32) -> Result<(StreamConfig, SampleFormat)> {
    let rate = cpal::SampleRate(sample_rate);
    if let Ok(ranges) = device.supported_output_configs() {
        let mut candidates: Vec<_> = ranges
            .filter(|r| r.min_sample_rate() <= rate && rate <= r.max_sample_rate())
            .collect();
        candidates.sort_by_key(|r| (r.channels() != 2, r.channels()));
        if let Some(range) = candidates.into_iter().next() {
            let config = range.with_sample_rate(rate);
            return Ok((config.config(), config.sample_format()));
        }
    }

    let config = device.default_output_config()?;
    warn!(
        "device does not support {} Hz, using {} Hz (pitch will be off)",
        sample_rate,
        config.sample_rate().0
    );
    Ok((config.config(), config.sample_format()))
}

fn build_stream<T>(device: &Device, config: &StreamConfig, slot: Slot) -> Result<Stream>
where
    T: cpal::SizedSample + cpal::FromSample<i16>,
{
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut guard) = slot.try_lock() else {
                // Main thread is swapping buffers, fill with silence
                data.fill(T::from_sample(0i16));
                return;
            };

            for frame in data.chunks_mut(channels) {
                let (left, right) = match guard.as_mut().and_then(Playback::next_frame) {
                    Some(pair) => pair,
                    None => {
                        *guard = None;
                        (0, 0)
                    }
                };

                if frame.len() == 1 {
                    let mono = ((left as i32 + right as i32) / 2) as i16;
                    frame[0] = T::from_sample(mono);
                    continue;
                }
                for (ch, out) in frame.iter_mut().enumerate() {
                    *out = T::from_sample(if ch % 2 == 0 { left } else { right });
                }
            }
        },
        |err| {
            warn!("audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
