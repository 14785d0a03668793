//! Benchmarks for the full render graph.
//!
//! Measures the per-callback cost of the engine at increasing polyphony,
//! and the cost of splitting a block at event boundaries.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicelab::{
    sequencing::notes::midi_to_freq, synth::NoteParams, voices, EngineConfig, SynthEngine,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn build_engine(block_size: usize) -> SynthEngine {
    let config = EngineConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_block_size(block_size)
        .with_max_voices(Some(64));
    SynthEngine::with_default_voices(config).0
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Held chords of SineEnv voices
        for polyphony in [1u8, 8, 32] {
            let mut engine = build_engine(size);
            for n in 0..polyphony {
                let params = NoteParams::new().with("frequency", midi_to_freq(48 + n));
                engine
                    .sequencer_mut()
                    .note_on(u32::from(n), voices::SINE_ENV, params);
            }
            engine.render(&mut left, &mut right);

            let id = format!("sine_x{polyphony}");
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| engine.render(black_box(&mut left), black_box(&mut right)))
            });
        }

        // A fresh hi-hat every 16 frames: the block is split at each onset
        // and voices are stolen and retriggered continuously.
        let mut engine = build_engine(size);
        group.bench_with_input(BenchmarkId::new("dense_onsets", size), &size, |b, _| {
            b.iter(|| {
                let clock = engine.sequencer().clock();
                for n in 0..(size / 16) {
                    let time = clock + (n * 16) as f64 / f64::from(SAMPLE_RATE);
                    engine
                        .sequencer_mut()
                        .schedule(voices::HIHAT, time, 0.05, NoteParams::new());
                }
                engine.render(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
