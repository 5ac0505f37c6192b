//! Benchmarks for PCM quantization.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pluck_dsp::dsp::{dequantize, quantize, Overflow};

use crate::RENDER_SIZES;

pub fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/quantize");

    for &size in RENDER_SIZES {
        let samples: Vec<f32> = (0..size).map(|i| 0.5 * (i as f32 * 0.1).sin()).collect();

        group.bench_with_input(BenchmarkId::new("wrap", size), &size, |b, _| {
            b.iter(|| quantize(black_box(&samples), Overflow::Wrap))
        });

        group.bench_with_input(BenchmarkId::new("clamp", size), &size, |b, _| {
            b.iter(|| quantize(black_box(&samples), Overflow::Clamp))
        });

        let pcm = quantize(&samples, Overflow::Wrap);
        group.bench_with_input(BenchmarkId::new("dequantize", size), &size, |b, _| {
            b.iter(|| dequantize(black_box(&pcm)))
        });
    }

    group.finish();
}
