//! Closed hi-hat voice: a very short, bright noise burst.
//!
//! There is no gate; the burst always plays out in full.

use crate::{
    dsp::burst::Burst,
    synth::{ParamSet, StereoBlock, Voice},
};

pub struct Hihat {
    burst: Burst,
    amplitude: f32,
}

impl Hihat {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            burst: Burst::new(sample_rate, 20_000.0, 15_000.0, 0.05),
            amplitude: 0.0,
        }
    }
}

impl Voice for Hihat {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("amplitude", 0.3, 0.0, 1.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        self.amplitude = params.value("amplitude");
        self.burst.reset();
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        let gain = std::f32::consts::FRAC_1_SQRT_2;
        for frame in 0..block.frames() {
            let s = self.burst.next_sample() * self.amplitude;
            block.add(frame, s * gain, s * gain);
        }
    }

    fn trigger_off(&mut self) {}

    fn is_done(&self) -> bool {
        self.burst.is_done()
    }

    fn envelope_level(&self) -> f32 {
        self.burst.level()
    }
}
