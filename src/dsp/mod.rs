//! Low-level DSP primitives used by the plucked-string synthesizer.
//!
//! These components stay focused on the signal-processing math; the
//! synthesizer in [`crate::synth`] drives them and the playback layer never
//! touches them directly.

/// Fixed-length ring buffer holding the vibrating string.
pub mod delay;
/// Float to 16-bit PCM conversion with a selectable overflow policy.
pub mod quantize;

pub use delay::DelayLine;
pub use quantize::{dequantize, quantize, Overflow};
