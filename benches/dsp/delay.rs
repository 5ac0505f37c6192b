//! Benchmarks for delay line stepping.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pluck_dsp::dsp::DelayLine;
use rand::{rngs::StdRng, SeedableRng};

use crate::RENDER_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // String lengths at 44.1kHz
    let lengths: &[usize] = &[
        94,  // B4 (466 Hz)
        168, // C4 (262 Hz)
        441, // 100 Hz
    ];

    for &size in RENDER_SIZES {
        for &len in lengths {
            let mut line = DelayLine::with_noise(len, &mut StdRng::seed_from_u64(1));
            group.bench_with_input(
                BenchmarkId::new(format!("average_len{}", len), size),
                &size,
                |b, &size| {
                    b.iter(|| {
                        for _ in 0..size {
                            let (s0, s1) = line.head2();
                            line.advance(black_box(0.4975 * (s0 + s1)));
                        }
                        black_box(line.head())
                    })
                },
            );
        }
    }

    // Snapshot copy, as done by the string plot every 1000 steps
    let line = DelayLine::with_noise(168, &mut StdRng::seed_from_u64(1));
    let mut snapshot = Vec::with_capacity(168);
    group.bench_function("snapshot_len168", |b| {
        b.iter(|| {
            line.snapshot_into(black_box(&mut snapshot));
        })
    });

    group.finish();
}
