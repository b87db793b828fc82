//! Chiptone - chiptune keyboard synthesizer

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::warn;
use std::path::Path;

use chiptone::config::{self, ChiptoneConfig};
use chiptone::engine::{self, NullSink, PlaybackSink, Player};
use chiptone::keyboard;
use chiptone::session::{self, SessionRecorder, SessionStore};
use chiptone::synth::{Effect, Note, Synthesizer};
use chiptone::viz::{self, App};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { config, silent } => {
            let cfg = config::load_or_default(config.as_deref())?;

            let sink: Box<dyn PlaybackSink> = if silent {
                Box::new(NullSink)
            } else {
                match Player::open(cfg.audio.sample_rate, cfg.audio.device.as_deref()) {
                    Ok(player) => Box::new(player),
                    Err(e) => {
                        warn!("audio output unavailable, playing silently: {:#}", e);
                        Box::new(NullSink)
                    }
                }
            };

            let mut app = App::new(
                synth_from(&cfg),
                SessionRecorder::new(store_from(&cfg)),
                sink,
                cfg.synth.waveform,
                cfg.synth.note_duration,
            );
            viz::run(&mut app)?;
        }

        Commands::Render {
            config,
            note,
            freq,
            waveform,
            duration,
            effects,
            output,
        } => {
            let cfg = config::load_or_default(config.as_deref())?;
            let mut synth = synth_from(&cfg);
            for effect in effects {
                synth.toggle(Effect::from(effect));
            }

            let (name, frequency) = match (note, freq) {
                (Some(name), _) => {
                    let key = keyboard::by_note(&name)
                        .ok_or_else(|| anyhow!("Unknown note '{}'", name))?;
                    (key.note.to_string(), key.frequency)
                }
                (None, Some(freq)) => (format!("{:.2} Hz", freq), freq),
                (None, None) => bail!("Either --note or --freq is required"),
            };

            let note = Note::new(
                frequency,
                name,
                waveform.unwrap_or(cfg.synth.waveform),
                duration.unwrap_or(cfg.synth.note_duration),
            )?;
            let buffer = synth.play_note(&note)?;
            engine::export_wav(&output, &buffer)?;

            println!(
                "Rendered {} ({:.2} Hz, {}) for {:.2}s to {:?}",
                note.name(),
                note.frequency(),
                note.waveform(),
                buffer.duration_secs(),
                output
            );
        }

        Commands::Replay {
            session: id,
            config,
            output,
        } => {
            let cfg = config::load_or_default(config.as_deref())?;

            let path = Path::new(&id);
            let loaded = if path.is_file() {
                session::load_file(path)
            } else {
                store_from(&cfg).load(&id)
            };
            let recording = loaded.with_context(|| format!("failed to load session '{}'", id))?;

            let synth = synth_from(&cfg);
            let buffer = session::render_session(&recording, &synth, cfg.synth.note_duration)?;
            engine::export_wav(&output, &buffer)?;

            println!(
                "Replayed {} notes ({:.2}s) from {} to {:?}",
                recording.total_notes,
                buffer.duration_secs(),
                recording.timestamp,
                output
            );
        }

        Commands::Sessions { config } => {
            let cfg = config::load_or_default(config.as_deref())?;
            let store = store_from(&cfg);
            let names = store
                .list()
                .with_context(|| format!("failed to read {:?}", store.directory()))?;

            if names.is_empty() {
                println!("No recordings in {:?}", store.directory());
                return Ok(());
            }

            println!("Recordings in {:?}:\n", store.directory());
            for name in names {
                match store.load(&name) {
                    Ok(s) => println!(
                        "  {}  {:>3} notes  {:>7.2}s",
                        name, s.total_notes, s.duration_secs
                    ),
                    Err(e) => println!("  {}  ({})", name, e),
                }
            }
        }

        Commands::Devices => {
            println!("Available audio devices:\n");

            if let Some(name) = engine::default_device_name() {
                println!("Default output: {}\n", name);
            }

            println!("Output devices:");
            for (name, config) in engine::list_output_devices() {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Volume: {:.0}%", cfg.synth.volume * 100.0);
                    println!("  Note duration: {:.2}s", cfg.synth.note_duration);
                    println!("  Waveform: {}", cfg.synth.waveform);
                    let chain = cfg.effect_chain();
                    for effect in Effect::ALL {
                        println!(
                            "    - {} {}",
                            effect,
                            if chain.is_enabled(effect) { "[on]" } else { "[off]" }
                        );
                    }
                    println!("  Recordings: {:?}", cfg.recorder.directory);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../chiptone.example.yaml");

            let path = "chiptone.yaml";
            if Path::new(path).exists() {
                println!("chiptone.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created chiptone.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

fn synth_from(cfg: &ChiptoneConfig) -> Synthesizer {
    Synthesizer::new(cfg.audio.sample_rate, cfg.synth.volume, cfg.effect_chain())
}

fn store_from(cfg: &ChiptoneConfig) -> SessionStore {
    SessionStore::new(&cfg.recorder.directory)
}
