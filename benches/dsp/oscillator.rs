//! Benchmarks for the sine and noise sources.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicelab::dsp::oscillator::{Noise, Sine};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut sine = Sine::new(SAMPLE_RATE).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    *sample = sine.next_sample();
                }
            })
        });

        // Frequency rewritten every sample, as the FM carrier does
        let mut carrier = Sine::new(SAMPLE_RATE);
        let mut modulator = Sine::new(SAMPLE_RATE).with_frequency(440.7);
        group.bench_with_input(BenchmarkId::new("sine_fm", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    carrier.set_frequency(440.0 + 2000.0 * modulator.next_sample());
                    *sample = carrier.next_sample();
                }
            })
        });

        let mut noise = Noise::default();
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    *sample = noise.next_sample();
                }
            })
        });
    }

    group.finish();
}
