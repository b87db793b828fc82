//! CLI interface for Chiptone

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chiptone::synth::Waveform;

/// Chiptune keyboard synthesizer
#[derive(Parser)]
#[command(name = "chiptone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play the synth from the computer keyboard
    Play {
        /// Configuration file path (defaults are used if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run without opening an audio device
        #[arg(long)]
        silent: bool,
    },

    /// Render a single note to a WAV file
    Render {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Note name from the keyboard map (e.g. C, F#, C5)
        #[arg(short, long, conflicts_with = "freq", required_unless_present = "freq")]
        note: Option<String>,

        /// Frequency in Hz
        #[arg(short, long)]
        freq: Option<f64>,

        /// Waveform (overrides the config)
        #[arg(short, long)]
        waveform: Option<Waveform>,

        /// Duration in seconds (overrides the config)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Toggle an effect relative to the config (repeatable)
        #[arg(short, long = "effect", value_enum)]
        effects: Vec<EffectArg>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a saved session to a WAV file
    Replay {
        /// Session file name or timestamp in the recordings directory, or a path
        session: String,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List saved sessions
    Sessions {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "chiptone.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

/// Effect names accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum EffectArg {
    Distortion,
    Delay,
    LowPass,
    BitCrush,
}

impl From<EffectArg> for chiptone::synth::Effect {
    fn from(arg: EffectArg) -> Self {
        use chiptone::synth::Effect;
        match arg {
            EffectArg::Distortion => Effect::Distortion,
            EffectArg::Delay => Effect::Delay,
            EffectArg::LowPass => Effect::LowPass,
            EffectArg::BitCrush => Effect::BitCrush,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "chiptone", "render", "--note", "A", "-w", "square", "-e", "delay", "-e", "low-pass",
            "-o", "a.wav",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                note,
                waveform,
                effects,
                ..
            } => {
                assert_eq!(note.as_deref(), Some("A"));
                assert_eq!(waveform, Some(Waveform::Square));
                assert_eq!(effects, vec![EffectArg::Delay, EffectArg::LowPass]);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_needs_pitch() {
        assert!(Cli::try_parse_from(["chiptone", "render", "-o", "a.wav"]).is_err());
    }
}
