//! Scheduler - decides which note plays and when
//!
//! Two loops, one per run:
//!
//! - random melody: trigger a random note, rest a weighted number of beats,
//!   repeat until stopped
//! - interactive: poll for key presses, trigger a random note on each one and
//!   pause briefly before listening again
//!
//! The scheduler never renders audio. It only calls into a [`Playback`] and
//! waits through a [`Clock`], so both loops run in tests without a device.

use log::{debug, warn};
use rand::Rng;
use std::{collections::VecDeque, time::Duration};

use super::{Clock, InputEvent, InputPoller, Playback, StopFlag, ThreadClock};
use crate::sequencing::{RestDistribution, BEAT};

/// Pause after each key-triggered note.
pub const KEY_PAUSE: Duration = Duration::from_millis(500);

/// How many `(note, beats)` choices the melody history keeps.
pub const HISTORY_LIMIT: usize = 16_384;

/// Note-triggering policy on top of a [`Playback`] collaborator.
pub struct Scheduler<P, R, C = ThreadClock> {
    playback: P,
    rng: R,
    clock: C,
    rests: RestDistribution,
    beat: Duration,
    key_pause: Duration,
    /// Recent melody choices: (note id, rest in beats)
    history: VecDeque<(String, u32)>,
}

impl<P: Playback, R: Rng> Scheduler<P, R, ThreadClock> {
    /// Create a scheduler that sleeps in real time
    pub fn new(playback: P, rng: R) -> Self {
        Self::with_clock(playback, rng, ThreadClock)
    }
}

impl<P: Playback, R: Rng, C: Clock> Scheduler<P, R, C> {
    pub fn with_clock(playback: P, rng: R, clock: C) -> Self {
        Self {
            playback,
            rng,
            clock,
            rests: RestDistribution::standard(),
            beat: BEAT,
            key_pause: KEY_PAUSE,
            history: VecDeque::new(),
        }
    }

    /// Replace the rest-length distribution
    pub fn rests(mut self, rests: RestDistribution) -> Self {
        self.rests = rests;
        self
    }

    /// Set the length of one beat
    pub fn beat(mut self, beat: Duration) -> Self {
        self.beat = beat;
        self
    }

    /// Set the pause after a key-triggered note
    pub fn key_pause(mut self, pause: Duration) -> Self {
        self.key_pause = pause;
        self
    }

    /// Play one random loaded note.
    ///
    /// Failures are logged and swallowed: a note that cannot play is skipped.
    pub fn trigger_random(&mut self) -> Option<String> {
        match self.playback.play_random_loaded(&mut self.rng) {
            Ok(id) => {
                debug!("triggered {id}");
                Some(id)
            }
            Err(err) => {
                warn!("skipping trigger: {err}");
                None
            }
        }
    }

    /// Random melody loop.
    ///
    /// Runs until `stop` is raised or `max_notes` iterations have passed
    /// (`None` means forever). Returns the number of iterations run.
    pub fn run_random_melody(&mut self, stop: &StopFlag, max_notes: Option<usize>) -> usize {
        let mut iterations = 0;

        while !stop.is_raised() && max_notes.map_or(true, |max| iterations < max) {
            let note = self.trigger_random();
            let beats = self.rests.sample(&mut self.rng);

            if let Some(note) = note {
                self.record(note, beats);
            }
            iterations += 1;

            self.clock.sleep(self.beat * beats);
        }

        iterations
    }

    /// Interactive loop: one random note per key press.
    ///
    /// Returns the number of key presses handled once the poller reports an
    /// interrupt. Poller errors end the loop and are passed back.
    pub fn run_interactive<I: InputPoller>(&mut self, input: &mut I) -> Result<usize, I::Error> {
        let mut presses = 0;

        loop {
            match input.poll()? {
                Some(InputEvent::KeyPress) => {
                    presses += 1;
                    self.trigger_random();
                    self.clock.sleep(self.key_pause);
                }
                Some(InputEvent::Interrupt) => return Ok(presses),
                None => {}
            }
        }
    }

    /// Play each of `ids` in order with a key pause after each.
    pub fn preview<S: AsRef<str>>(&mut self, ids: &[S]) {
        for id in ids {
            let id = id.as_ref();
            if let Err(err) = self.playback.play(id) {
                warn!("skipping preview of {id}: {err}");
                continue;
            }
            self.clock.sleep(self.key_pause);
        }
    }

    fn record(&mut self, note: String, beats: u32) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back((note, beats));
    }

    /// Recent melody choices, oldest first
    pub fn history(&self) -> impl Iterator<Item = (&str, u32)> {
        self.history.iter().map(|(note, beats)| (note.as_str(), *beats))
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_playback(self) -> P {
        self.playback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::SampleBank;
    use rand::{rngs::StdRng, SeedableRng};

    /// Records sleeps instead of sleeping.
    #[derive(Default)]
    struct FakeClock {
        slept: Vec<Duration>,
    }

    impl Clock for FakeClock {
        fn sleep(&mut self, duration: Duration) {
            self.slept.push(duration);
        }
    }

    /// Replays a fixed script of poll results, then interrupts.
    struct Script(VecDeque<Option<InputEvent>>);

    impl InputPoller for Script {
        type Error = std::convert::Infallible;

        fn poll(&mut self) -> Result<Option<InputEvent>, Self::Error> {
            Ok(self.0.pop_front().unwrap_or(Some(InputEvent::Interrupt)))
        }
    }

    fn bank(ids: &[&str]) -> SampleBank {
        let mut bank = SampleBank::new();
        for id in ids {
            bank.load(id, &[0; 8]).unwrap();
        }
        bank
    }

    fn scheduler(ids: &[&str], seed: u64) -> Scheduler<SampleBank, StdRng, FakeClock> {
        Scheduler::with_clock(bank(ids), StdRng::seed_from_u64(seed), FakeClock::default())
    }

    #[test]
    fn melody_rests_follow_beats() {
        let mut sched = scheduler(&["C4", "Eb"], 1);
        let ran = sched.run_random_melody(&StopFlag::new(), Some(50));

        assert_eq!(ran, 50);
        let beats: Vec<u32> = sched.history().map(|(_, b)| b).collect();
        let expected: Vec<Duration> = beats.iter().map(|&b| BEAT * b).collect();
        assert_eq!(sched.clock().slept, expected);
        assert!(beats.iter().all(|b| [1, 2, 4, 8].contains(b)));
        assert_eq!(sched.playback().played().len(), 50);
    }

    #[test]
    fn raised_stop_flag_ends_melody_immediately() {
        let mut sched = scheduler(&["C4"], 2);
        let stop = StopFlag::new();
        stop.raise();

        assert_eq!(sched.run_random_melody(&stop, None), 0);
        assert!(sched.playback().played().is_empty());
    }

    #[test]
    fn melody_without_notes_still_rests() {
        let mut sched = scheduler(&[], 3);
        assert_eq!(sched.run_random_melody(&StopFlag::new(), Some(5)), 5);
        assert_eq!(sched.history().count(), 0);
        assert_eq!(sched.clock().slept.len(), 5);
    }

    #[test]
    fn interactive_triggers_once_per_key() {
        let mut sched = scheduler(&["F", "G"], 4);
        let mut input = Script(VecDeque::from([
            None,
            Some(InputEvent::KeyPress),
            None,
            None,
            Some(InputEvent::KeyPress),
            Some(InputEvent::KeyPress),
            Some(InputEvent::Interrupt),
            Some(InputEvent::KeyPress),
        ]));

        let presses = sched.run_interactive(&mut input).unwrap();

        assert_eq!(presses, 3);
        assert_eq!(sched.playback().played().len(), 3);
        assert_eq!(sched.clock().slept, vec![KEY_PAUSE; 3]);
        // The key press after the interrupt is never consumed.
        assert_eq!(input.0.len(), 1);
    }

    #[test]
    fn preview_skips_missing_notes() {
        let mut sched = scheduler(&["C4", "B"], 5);
        sched.preview(&["C4", "Eb", "B"]);

        assert_eq!(sched.playback().played(), ["C4", "B"]);
        assert_eq!(sched.clock().slept.len(), 2);
    }

    #[test]
    fn custom_timing() {
        let rests = RestDistribution::new(&[(3, 1.0)]).unwrap();
        let mut sched = scheduler(&["C4"], 6)
            .rests(rests)
            .beat(Duration::from_millis(10));

        sched.run_random_melody(&StopFlag::new(), Some(2));
        assert_eq!(sched.clock().slept, vec![Duration::from_millis(30); 2]);
    }
}
