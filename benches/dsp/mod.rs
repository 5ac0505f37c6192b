//! Benchmarks for the synthesis primitives.

mod delay;
mod pluck;
mod quantize;

pub use delay::bench_delay;
pub use pluck::bench_pluck;
pub use quantize::bench_quantize;
