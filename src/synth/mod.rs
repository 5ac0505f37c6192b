// Purpose: plucked-string voice rendering
// This layer drives the dsp primitives and produces finished waveforms

pub mod pluck;

use std::fmt;

use crate::dsp::DelayLine;

pub use pluck::{delay_len, synthesize, synthesize_observed, PluckParams, PluckSynth};

/// Errors that can occur when rendering a note
#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Frequency is not positive, or gives a delay line shorter than two samples
    InvalidFrequency { frequency: f32, delay_len: usize },
    /// Decay factor outside (0, 1]
    InvalidDecay(f32),
    /// Zero sample rate or zero-length render
    InvalidDuration,
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::InvalidFrequency {
                frequency,
                delay_len,
            } => write!(
                f,
                "Invalid frequency {} Hz: delay line of {} samples (need at least {})",
                frequency,
                delay_len,
                pluck::MIN_DELAY_LEN
            ),
            SynthError::InvalidDecay(decay) => {
                write!(f, "Invalid decay {}: must be in (0, 1]", decay)
            }
            SynthError::InvalidDuration => {
                write!(f, "Sample rate and duration must both be non-zero")
            }
        }
    }
}

impl std::error::Error for SynthError {}

/// Watches the delay line while a note renders (for plotting).
///
/// Observers get shared access only and cannot alter the output.
pub trait DelayLineObserver {
    fn observe(&mut self, step: usize, line: &DelayLine);
}

/// Observer that ignores everything.
pub struct NoObserver;

impl DelayLineObserver for NoObserver {
    #[inline]
    fn observe(&mut self, _step: usize, _line: &DelayLine) {}
}

/// Records a copy of the delay line at every observation.
#[derive(Debug, Default, Clone)]
pub struct Snapshots {
    frames: Vec<(usize, Vec<f32>)>,
}

impl Snapshots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(step, contents)` pairs, oldest observation first
    pub fn frames(&self) -> &[(usize, Vec<f32>)] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<(usize, Vec<f32>)> {
        self.frames
    }
}

impl DelayLineObserver for Snapshots {
    fn observe(&mut self, step: usize, line: &DelayLine) {
        let mut contents = Vec::with_capacity(line.len());
        line.snapshot_into(&mut contents);
        self.frames.push((step, contents));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshots_record_step_and_contents() {
        let mut line = DelayLine::from_samples(vec![0.1, 0.2, 0.3]);
        let mut snaps = Snapshots::new();

        snaps.observe(0, &line);
        line.advance(0.4);
        snaps.observe(1, &line);

        assert_eq!(
            snaps.frames(),
            &[(0, vec![0.1, 0.2, 0.3]), (1, vec![0.2, 0.3, 0.4])]
        );
    }

    #[test]
    fn errors_describe_the_problem() {
        let err = SynthError::InvalidFrequency {
            frequency: 30_000.0,
            delay_len: 1,
        };
        assert!(err.to_string().contains("30000"));
        assert!(SynthError::InvalidDecay(2.0).to_string().contains("(0, 1]"));
    }
}
