//! pluck - Karplus-Strong note renderer and player
//!
//! Run with: cargo run -- <render|play|piano>

mod cli;
mod keys;
mod player;
mod ui;

use std::io::Write;

use clap::Parser;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use pluck_dsp::{
    io::SampleCache,
    playback::{load_library, LoadOutcome, LoadReport, Playback, SampleBank, Scheduler, StopFlag},
    sequencing::NoteLibrary,
    synth::{PluckSynth, Snapshots},
    SAMPLE_RATE,
};
use rand::rngs::StdRng;

use cli::{Args, Command};
use keys::TerminalKeys;
use player::CpalPlayer;
use ui::{NotePlot, Spectrum};

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging();

    let args = Args::parse();
    let library = args.library();
    let synth = PluckSynth::new()
        .params(args.params())
        .overflow(args.overflow());
    let cache = SampleCache::new(&args.samples_dir, SAMPLE_RATE);
    let mut rng = args.rng();

    println!("=== pluck ===");
    println!("Notes: {}", library.names().collect::<Vec<_>>().join(" "));
    println!("Samples: {}", cache.dir().display());
    println!();

    match args.command {
        Command::Render { display: false } => {
            let mut bank = SampleBank::new();
            load(&args, &library, &cache, &synth, &mut rng, &mut bank)?;
        }
        Command::Render { display: true } => {
            let mut player = CpalPlayer::open()?;
            let mut plots = Vec::new();
            let report = load_library(
                &library,
                &cache,
                &args.load_policy(),
                &mut player,
                |note| {
                    let mut snapshots = Snapshots::new();
                    let (samples, pcm) =
                        synth.render_observed(note.frequency(), &mut rng, &mut snapshots)?;
                    plots.push(NotePlot {
                        name: note.name().to_string(),
                        frequency: note.frequency(),
                        snapshots: snapshots.into_frames(),
                        spectrum: Spectrum::analyze(&samples, SAMPLE_RATE as f32),
                    });
                    Ok(pcm)
                },
            )
            .wrap_err("failed to load notes")?;
            print_report(&report);

            Scheduler::new(player, rng).preview(&report.loaded());
            ui::show(&plots)?;
        }
        Command::Play { limit } => {
            let mut player = CpalPlayer::open()?;
            load(&args, &library, &cache, &synth, &mut rng, &mut player)?;

            println!("Playing... Press Q, Esc or Ctrl+C to stop");
            let stop = StopFlag::new();
            let keys = TerminalKeys::new().wrap_err("failed to enter raw mode")?;
            let watcher = stop.raise_on_interrupt(keys);

            // The scheduler (and with it the output stream) drops here.
            let played = Scheduler::new(player, rng).run_random_melody(&stop, limit);
            stop.raise();
            watcher
                .join()
                .map_err(|_| eyre!("keyboard thread panicked"))?
                .wrap_err("failed to read keyboard")?;
            println!("Played {} notes", played);
        }
        Command::Piano => {
            let mut player = CpalPlayer::open()?;
            load(&args, &library, &cache, &synth, &mut rng, &mut player)?;

            println!("Press any key to play a note, Q or Esc to quit");
            let mut keys = TerminalKeys::new().wrap_err("failed to enter raw mode")?;
            let presses = Scheduler::new(player, rng)
                .run_interactive(&mut keys)
                .wrap_err("failed to read keyboard")?;
            drop(keys);
            println!("Played {} notes", presses);
        }
    }

    Ok(())
}

/// Load the library through the cache, rendering as needed
fn load<P: Playback>(
    args: &Args,
    library: &NoteLibrary,
    cache: &SampleCache,
    synth: &PluckSynth,
    rng: &mut StdRng,
    playback: &mut P,
) -> EyreResult<LoadReport> {
    let report = load_library(library, cache, &args.load_policy(), playback, |note| {
        synth.render_pcm(note.frequency(), rng)
    })
    .wrap_err("failed to load notes")?;
    print_report(&report);
    Ok(report)
}

fn print_report(report: &LoadReport) {
    for (name, outcome) in report.entries() {
        match outcome {
            LoadOutcome::Cached => println!("  {:<4} cached", name),
            LoadOutcome::Rendered => println!("  {:<4} rendered", name),
            LoadOutcome::RenderedUncached(err) => {
                println!("  {:<4} rendered (not cached: {})", name, err)
            }
            LoadOutcome::Failed(err) => println!("  {:<4} skipped ({})", name, err),
        }
    }
    println!();
}

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
///
/// Lines end in CRLF so they stay readable while piano mode holds the
/// terminal in raw mode.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            write!(
                buf,
                "[{} {}] {}\r\n",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
