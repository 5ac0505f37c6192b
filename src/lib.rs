pub mod dsp;
pub mod io; // Cached note assets
pub mod playback; // Note scheduling and collaborator traits
pub mod sequencing; // Note library and rest lengths
pub mod synth; // Plucked-string rendering

/// Sample rate of every rendered note, in Hz.
pub const SAMPLE_RATE: u32 = 44_100;
/// Rendered note length: one second at [`SAMPLE_RATE`].
pub const DEFAULT_DURATION_SAMPLES: usize = SAMPLE_RATE as usize;
/// Feedback gain of the string loop.
pub const DEFAULT_DECAY: f32 = 0.995;
