//! Playback orchestration.
//!
//! The library never talks to an audio device or a terminal directly. It
//! drives three small collaborators instead:
//!
//! - [`Playback`] holds rendered notes and plays them on request.
//! - [`InputPoller`] reports key presses without blocking.
//! - [`Clock`] performs the waits between notes.
//!
//! [`bank::SampleBank`] is an in-memory [`Playback`] that records what it was
//! asked to play; the `pluck` binary provides the device-backed one.

pub mod bank;
pub mod loader;
pub mod scheduler;

use rand::Rng;
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

pub use bank::SampleBank;
pub use loader::{load_library, LoadError, LoadOutcome, LoadPolicy, LoadReport};
pub use scheduler::Scheduler;

/// Something that can hold rendered notes and play them.
pub trait Playback {
    /// Register (or replace) the PCM asset for `id`.
    fn load(&mut self, id: &str, pcm: &[i16]) -> Result<(), PlaybackError>;

    /// Start playing the asset registered as `id`.
    fn play(&mut self, id: &str) -> Result<(), PlaybackError>;

    /// Ids of every loaded asset, in load order.
    fn loaded_ids(&self) -> Vec<String>;

    /// Play one loaded asset chosen uniformly at random. Returns its id.
    fn play_random_loaded<R: Rng>(&mut self, rng: &mut R) -> Result<String, PlaybackError>
    where
        Self: Sized,
    {
        let ids = self.loaded_ids();
        if ids.is_empty() {
            return Err(PlaybackError::NothingLoaded);
        }
        let id = ids[rng.random_range(0..ids.len())].clone();
        self.play(&id)?;
        Ok(id)
    }
}

/// Errors reported by a [`Playback`] collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// No asset was loaded under this id
    NotLoaded(String),
    /// A random trigger was requested with nothing loaded
    NothingLoaded,
    /// The audio backend refused the request
    Device(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NotLoaded(id) => write!(f, "Note {} is not loaded", id),
            PlaybackError::NothingLoaded => write!(f, "No notes are loaded"),
            PlaybackError::Device(msg) => write!(f, "Audio device error: {}", msg),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// What an [`InputPoller`] saw since the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Any key that should trigger a note
    KeyPress,
    /// The user asked to stop
    Interrupt,
}

/// Non-blocking source of key presses.
pub trait InputPoller {
    type Error;

    /// Return the next pending event, or `None` if nothing happened.
    ///
    /// Implementations may wait briefly (a few milliseconds) to avoid
    /// spinning, but must not block until a key arrives.
    fn poll(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}

/// Performs the scheduler's waits.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Real time, via [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadClock;

impl Clock for ThreadClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Shared flag that asks a running melody loop to stop.
#[derive(Debug, Default, Clone)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Poll `input` on a background thread and raise the flag on interrupt.
    ///
    /// The thread exits once the flag is raised from either side. A poller
    /// error also raises the flag, so a loop waiting on it cannot outlive
    /// its input.
    pub fn raise_on_interrupt<I>(&self, mut input: I) -> JoinHandle<Result<(), I::Error>>
    where
        I: InputPoller + Send + 'static,
        I::Error: Send + 'static,
    {
        let stop = self.clone();
        thread::spawn(move || {
            let result = loop {
                if stop.is_raised() {
                    break Ok(());
                }
                match input.poll() {
                    Ok(Some(InputEvent::Interrupt)) => break Ok(()),
                    Ok(_) => {}
                    Err(err) => break Err(err),
                }
            };
            stop.raise();
            result
        })
    }
}
