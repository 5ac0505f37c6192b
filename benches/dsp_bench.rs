//! Benchmarks for the string model.
//!
//! Run with: cargo bench
//!
//! A note is rendered once and cached, so these are not real-time deadlines.
//! They mostly guard against regressions in the inner loop.
//!
//! Reference sizes at 44.1kHz sample rate:
//!   - 4410 samples  = 100ms of sound
//!   - 44100 samples = 1s of sound (one full note)
//!
//! Benchmark groups:
//!   - dsp/delay     Ring buffer stepping
//!   - dsp/pluck     Whole-note synthesis
//!   - dsp/quantize  Float to 16-bit PCM

use criterion::{criterion_group, criterion_main};

mod dsp;

/// Sample counts rendered per iteration.
pub const RENDER_SIZES: &[usize] = &[4_410, 44_100];

criterion_group!(
    benches,
    dsp::bench_delay,
    dsp::bench_pluck,
    dsp::bench_quantize,
);
criterion_main!(benches);
