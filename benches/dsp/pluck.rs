//! Benchmarks for whole-note synthesis.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pluck_dsp::synth::{PluckParams, PluckSynth, Snapshots};
use rand::{rngs::StdRng, SeedableRng};

use crate::RENDER_SIZES;

pub fn bench_pluck(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pluck");
    let mut rng = StdRng::seed_from_u64(7);

    for &size in RENDER_SIZES {
        let synth = PluckSynth::new().params(PluckParams::default().duration_samples(size));

        group.bench_with_input(BenchmarkId::new("render_c4", size), &size, |b, _| {
            b.iter(|| synth.render(black_box(262.0), &mut rng))
        });

        group.bench_with_input(BenchmarkId::new("render_pcm_c4", size), &size, |b, _| {
            b.iter(|| synth.render_pcm(black_box(262.0), &mut rng))
        });

        // Observed render pays for a snapshot every 1000 steps
        group.bench_with_input(BenchmarkId::new("render_observed_c4", size), &size, |b, _| {
            b.iter(|| {
                let mut snapshots = Snapshots::new();
                synth.render_observed(black_box(262.0), &mut rng, &mut snapshots)
            })
        });
    }

    group.finish();
}
