//! Karplus-Strong plucked string.
//!
//! # How It Works
//!
//! 1. A delay line of `N = sample_rate / frequency` samples is filled with
//!    white noise. `N` sets the period of the fundamental, so it sets the pitch.
//! 2. Every output step emits the oldest sample of the line.
//! 3. The two oldest samples are averaged, scaled by `decay`, and fed back in
//!    at the tail while the oldest one falls off the head.
//!
//! The averaging is a gentle one-pole lowpass, so high harmonics die first;
//! the decay factor removes energy on every trip around the loop. Together
//! they turn a burst of noise into a pluck that mellows as it fades.
//!
//! Averaging the two *oldest* samples (not the newest) is what gives the
//! expected timbre; changing the pair changes the sound.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use super::{DelayLineObserver, NoObserver, SynthError};
use crate::{
    dsp::{quantize, DelayLine, Overflow},
    DEFAULT_DECAY, DEFAULT_DURATION_SAMPLES, SAMPLE_RATE,
};

/// Shortest delay line for which the two-sample average is defined.
pub const MIN_DELAY_LEN: usize = crate::dsp::delay::MIN_LEN;

/// How often the plot observer is refreshed by default, in output samples.
pub const DEFAULT_OBSERVE_EVERY: usize = 1000;

/// Parameters for one pluck render.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluckParams {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Number of samples to produce
    pub duration_samples: usize,
    /// Feedback gain applied to every averaged sample, in (0, 1]
    pub decay: f32,
    /// Observer cadence in output samples (values below 1 act as 1)
    pub observe_every: usize,
}

impl Default for PluckParams {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            duration_samples: DEFAULT_DURATION_SAMPLES,
            decay: DEFAULT_DECAY,
            observe_every: DEFAULT_OBSERVE_EVERY,
        }
    }
}

impl PluckParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn duration_samples(mut self, duration_samples: usize) -> Self {
        self.duration_samples = duration_samples;
        self
    }

    pub fn decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn observe_every(mut self, observe_every: usize) -> Self {
        self.observe_every = observe_every;
        self
    }

    fn validate(&self) -> Result<(), SynthError> {
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(SynthError::InvalidDecay(self.decay));
        }
        if self.sample_rate == 0 || self.duration_samples == 0 {
            return Err(SynthError::InvalidDuration);
        }
        Ok(())
    }
}

/// Delay-line length for `frequency`, truncated toward zero.
///
/// Fails when the frequency is not a positive finite number or when the
/// resulting line would be shorter than [`MIN_DELAY_LEN`].
pub fn delay_len(frequency: f32, sample_rate: u32) -> Result<usize, SynthError> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(SynthError::InvalidFrequency {
            frequency,
            delay_len: 0,
        });
    }

    let len = (sample_rate as f64 / frequency as f64) as usize;
    if len < MIN_DELAY_LEN {
        return Err(SynthError::InvalidFrequency {
            frequency,
            delay_len: len,
        });
    }
    Ok(len)
}

/// Render a pluck at `frequency`.
pub fn synthesize<R: Rng>(
    frequency: f32,
    params: &PluckParams,
    rng: &mut R,
) -> Result<Vec<f32>, SynthError> {
    synthesize_observed(frequency, params, rng, &mut NoObserver)
}

/// Render a pluck at `frequency`, showing the delay line to `observer`.
///
/// The observer sees the line once before the first step and then after
/// every `params.observe_every` steps. It only gets shared access, so it
/// cannot influence the rendered samples.
pub fn synthesize_observed<R, O>(
    frequency: f32,
    params: &PluckParams,
    rng: &mut R,
    observer: &mut O,
) -> Result<Vec<f32>, SynthError>
where
    R: Rng,
    O: DelayLineObserver + ?Sized,
{
    params.validate()?;
    let len = delay_len(frequency, params.sample_rate)?;

    let mut line = DelayLine::with_noise(len, rng);
    let mut out = Vec::with_capacity(params.duration_samples);
    let every = params.observe_every.max(1);
    let gain = params.decay * 0.5;

    observer.observe(0, &line);

    for step in 0..params.duration_samples {
        out.push(line.head());

        let (s0, s1) = line.head2();
        line.advance(gain * (s0 + s1));

        if (step + 1) % every == 0 {
            observer.observe(step + 1, &line);
        }
    }

    Ok(out)
}

/// Bundles render parameters with the PCM overflow policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluckSynth {
    params: PluckParams,
    overflow: Overflow,
}

impl PluckSynth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: PluckParams) -> Self {
        self.params = params;
        self
    }

    pub fn decay(mut self, decay: f32) -> Self {
        self.params.decay = decay;
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn render_params(&self) -> &PluckParams {
        &self.params
    }

    pub fn overflow_policy(&self) -> Overflow {
        self.overflow
    }

    /// Render floating-point samples.
    pub fn render<R: Rng>(&self, frequency: f32, rng: &mut R) -> Result<Vec<f32>, SynthError> {
        synthesize(frequency, &self.params, rng)
    }

    /// Render and quantize to 16-bit PCM.
    pub fn render_pcm<R: Rng>(&self, frequency: f32, rng: &mut R) -> Result<Vec<i16>, SynthError> {
        let samples = self.render(frequency, rng)?;
        Ok(quantize(&samples, self.overflow))
    }

    /// Render and quantize while feeding `observer`. Returns both buffers.
    pub fn render_observed<R, O>(
        &self,
        frequency: f32,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<(Vec<f32>, Vec<i16>), SynthError>
    where
        R: Rng,
        O: DelayLineObserver + ?Sized,
    {
        let samples = synthesize_observed(frequency, &self.params, rng, observer)?;
        let pcm = quantize(&samples, self.overflow);
        Ok((samples, pcm))
    }
}
