//! Benchmarks for DSP primitives, voices and the render graph.
//!
//! Run with: cargo bench
//!
//! Everything here runs inside the audio callback, so it has to finish
//! well within the real-time deadline.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (oscillator, envelope, delay)
//!   - scenarios/*  Single voices and full engine renders

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_oscillator,
    dsp::bench_envelope,
    dsp::bench_delay,
    // Voices and the engine
    scenarios::bench_voices,
    scenarios::bench_engine,
);
criterion_main!(benches);
