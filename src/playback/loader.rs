//! Loader - gets every library note into the player
//!
//! For each note the cache is checked first. A cached asset is reused as-is
//! unless a re-render is forced; otherwise the note is rendered, written to
//! the cache and handed to the player. Problems stay local to the note they
//! happen on:
//!
//! - an unplayable frequency skips that note
//! - a cache read failure re-renders the note
//! - a cache write failure keeps the fresh render in memory for this run
//!   (unless the policy asks for strict persistence)

use log::{error, info, warn};

use super::{Playback, PlaybackError};
use crate::{
    io::{CacheError, SampleCache},
    sequencing::{Note, NoteLibrary},
    synth::SynthError,
};

/// How the loader treats existing assets and write failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadPolicy {
    /// Re-render every note even when a cached asset exists
    pub force: bool,
    /// Abort loading when a rendered note cannot be written to the cache
    pub strict_persistence: bool,
}

impl LoadPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn strict_persistence(mut self, strict: bool) -> Self {
        self.strict_persistence = strict;
        self
    }
}

/// Why a note did not make it into the player
#[derive(Debug)]
pub enum LoadError {
    Synth(SynthError),
    Playback(PlaybackError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Synth(err) => write!(f, "render failed: {}", err),
            LoadError::Playback(err) => write!(f, "player rejected note: {}", err),
        }
    }
}

impl std::error::Error for LoadError {}

/// What happened to one note.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Reused the asset already in the cache
    Cached,
    /// Rendered and written to the cache
    Rendered,
    /// Rendered, but the cache could not be used; lives in memory only
    RenderedUncached(CacheError),
    /// Not loaded into the player
    Failed(LoadError),
}

impl LoadOutcome {
    /// Whether the player now holds this note.
    pub fn is_loaded(&self) -> bool {
        !matches!(self, LoadOutcome::Failed(_))
    }
}

/// Per-note outcomes, in library order.
#[derive(Debug, Default)]
pub struct LoadReport {
    entries: Vec<(String, LoadOutcome)>,
}

impl LoadReport {
    pub fn entries(&self) -> &[(String, LoadOutcome)] {
        &self.entries
    }

    pub fn outcome(&self, name: &str) -> Option<&LoadOutcome> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// Names of the notes the player holds.
    pub fn loaded(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_loaded())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of notes that were rendered during this load.
    pub fn rendered_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, LoadOutcome::Rendered | LoadOutcome::RenderedUncached(_)))
            .count()
    }
}

/// Load every note of `library` into `playback`.
///
/// `render` produces the PCM for a note; it is only called for notes that
/// need rendering. Returns `Err` only for a cache write failure under a
/// strict policy.
pub fn load_library<P, F>(
    library: &NoteLibrary,
    cache: &SampleCache,
    policy: &LoadPolicy,
    playback: &mut P,
    mut render: F,
) -> Result<LoadReport, CacheError>
where
    P: Playback + ?Sized,
    F: FnMut(&Note) -> Result<Vec<i16>, SynthError>,
{
    let mut report = LoadReport::default();

    for note in library.iter() {
        let outcome = load_note(note, cache, policy, playback, &mut render)?;
        report.entries.push((note.name().to_string(), outcome));
    }

    Ok(report)
}

fn load_note<P, F>(
    note: &Note,
    cache: &SampleCache,
    policy: &LoadPolicy,
    playback: &mut P,
    render: &mut F,
) -> Result<LoadOutcome, CacheError>
where
    P: Playback + ?Sized,
    F: FnMut(&Note) -> Result<Vec<i16>, SynthError>,
{
    let name = note.name();
    let path = cache.path_for(name);

    let cached = if policy.force {
        None
    } else {
        match cache.contains(name).and_then(|present| {
            if present {
                cache.load(name).map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(pcm) => pcm,
            Err(err) => {
                warn!("{} unreadable ({err}), rendering again", path.display());
                None
            }
        }
    };

    let (pcm, outcome) = match cached {
        Some(pcm) => {
            info!("{} already exists, skipping render", path.display());
            (pcm, LoadOutcome::Cached)
        }
        None => {
            let pcm = match render(note) {
                Ok(pcm) => pcm,
                Err(err) => {
                    error!("cannot render {name}: {err}");
                    return Ok(LoadOutcome::Failed(LoadError::Synth(err)));
                }
            };
            info!("rendered {} ({} Hz)", path.display(), note.frequency());

            let outcome = match cache.store(name, &pcm) {
                Ok(_) => LoadOutcome::Rendered,
                Err(err) if policy.strict_persistence => return Err(err),
                Err(err) => {
                    warn!("could not cache {name}, keeping it in memory: {err}");
                    LoadOutcome::RenderedUncached(err)
                }
            };
            (pcm, outcome)
        }
    };

    if let Err(err) = playback.load(name, &pcm) {
        warn!("player could not load {name}: {err}");
        return Ok(LoadOutcome::Failed(LoadError::Playback(err)));
    }

    Ok(outcome)
}
