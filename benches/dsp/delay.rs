//! Benchmarks for the Karplus-Strong string loop.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicelab::dsp::{delay::DelayLine, filter::MovingAverage};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Bare delay line at a low pitch (long buffer)
        let mut line = DelayLine::with_max_delay(SAMPLE_RATE, 0.05);
        line.set_frequency(SAMPLE_RATE, 27.5);
        group.bench_with_input(BenchmarkId::new("line", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    let out = line.read();
                    *sample = line.tick(out * 0.5 + 0.1);
                }
            })
        });

        // Delay with the averaging damper in the loop
        let mut string = DelayLine::with_max_delay(SAMPLE_RATE, 0.05);
        string.set_frequency(SAMPLE_RATE, 220.0);
        let mut damping = MovingAverage::new();
        group.bench_with_input(BenchmarkId::new("string", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    let feedback = string.read();
                    *sample = string.tick(damping.process(feedback + 0.01));
                }
            })
        });
    }

    group.finish();
}
