//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pluck_dsp::{
    dsp::Overflow,
    playback::LoadPolicy,
    sequencing::{Note, NoteLibrary},
    synth::PluckParams,
    DEFAULT_DECAY,
};
use rand::{rngs::StdRng, SeedableRng};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pluck")]
#[command(about = "Plucked-string notes with the Karplus-Strong algorithm", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Re-render every note even if a cached WAV file exists
    #[arg(long, global = true)]
    pub force: bool,

    /// Directory holding the rendered <NOTE>.wav files
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub samples_dir: PathBuf,

    /// Replace the note set (repeatable), e.g. --note C4=262 --note G=391
    #[arg(long = "note", value_name = "NAME=HZ", global = true)]
    pub notes: Vec<Note>,

    /// Feedback gain of the string loop, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_DECAY, global = true)]
    pub decay: f32,

    /// Saturate out-of-range samples instead of wrapping them
    #[arg(long, global = true)]
    pub clamp: bool,

    /// Seed for the noise bursts and note choices
    #[arg(long, value_name = "SEED", global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Render the note set and exit
    Render {
        /// Re-render while plotting the string, then play each note
        #[arg(long)]
        display: bool,
    },
    /// Play a random melody until interrupted
    Play {
        /// Stop after this many notes
        #[arg(long, value_name = "COUNT")]
        limit: Option<usize>,
    },
    /// Play a random note on every key press
    Piano,
}

impl Args {
    /// Notes given on the command line, or the pentatonic minor scale
    pub fn library(&self) -> NoteLibrary {
        if self.notes.is_empty() {
            NoteLibrary::pentatonic_minor()
        } else {
            self.notes.iter().cloned().collect()
        }
    }

    pub fn params(&self) -> PluckParams {
        PluckParams::default().decay(self.decay)
    }

    pub fn overflow(&self) -> Overflow {
        if self.clamp {
            Overflow::Clamp
        } else {
            Overflow::Wrap
        }
    }

    /// Whether the string should be plotted while rendering
    pub fn display(&self) -> bool {
        matches!(self.command, Command::Render { display: true })
    }

    pub fn load_policy(&self) -> LoadPolicy {
        // Plotting needs a live render, so display implies a re-render.
        LoadPolicy::new().force(self.force || self.display())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_pentatonic_minor() {
        let args = Args::parse_from(["pluck", "render"]);
        assert_eq!(args.library(), NoteLibrary::pentatonic_minor());
        assert_eq!(args.overflow(), Overflow::Wrap);
        assert!(!args.load_policy().force);
    }

    #[test]
    fn display_forces_render() {
        let args = Args::parse_from(["pluck", "render", "--display"]);
        assert!(args.display());
        assert!(args.load_policy().force);
    }

    #[test]
    fn custom_notes_and_options() {
        let args = Args::parse_from([
            "pluck", "play", "--note", "A=220", "--note", "E=330", "--clamp", "--decay", "0.99",
            "--limit", "4",
        ]);
        assert_eq!(args.command, Command::Play { limit: Some(4) });
        assert_eq!(args.library().names().collect::<Vec<_>>(), ["A", "E"]);
        assert_eq!(args.overflow(), Overflow::Clamp);
        assert_eq!(args.params().decay, 0.99);
    }

    #[test]
    fn rejects_malformed_notes() {
        assert!(Args::try_parse_from(["pluck", "piano", "--note", "A"]).is_err());
    }
}
