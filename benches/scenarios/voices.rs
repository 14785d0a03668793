//! Benchmarks for the built-in voices, one note each.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicelab::{
    synth::{NoteParams, ParamSet, StereoBlock, Voice},
    voices::{Additive, Fm, Hihat, Kick, Pluck, Snare},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Trigger with defaults plus `overrides`; a huge release keeps the voice
/// sounding for the whole measurement.
fn triggered<V: Voice>(mut voice: V, overrides: NoteParams) -> V {
    let mut params = ParamSet::new();
    voice.init(&mut params);
    params.apply(&overrides.with("releaseTime", 10.0));
    voice.trigger_on(&params);
    voice
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let note = NoteParams::new().with("frequency", 220.0).with("freq", 220.0);

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        let mut palette: [(&str, Box<dyn Voice>); 7] = [
            ("sine_env", Box::new(triggered(Additive::sine_env(SAMPLE_RATE), note))),
            ("square_wave", Box::new(triggered(Additive::square_wave(SAMPLE_RATE), note))),
            ("fm", Box::new(triggered(Fm::new(SAMPLE_RATE), note))),
            ("pluck", Box::new(triggered(Pluck::new(SAMPLE_RATE), note))),
            ("kick", Box::new(triggered(Kick::new(SAMPLE_RATE), note))),
            ("snare", Box::new(triggered(Snare::new(SAMPLE_RATE), note))),
            ("hihat", Box::new(triggered(Hihat::new(SAMPLE_RATE), note))),
        ];

        for (name, voice) in palette.iter_mut() {
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    let mut block = StereoBlock::new(&mut left, &mut right);
                    voice.process(black_box(&mut block));
                })
            });
        }
    }

    group.finish();
}
