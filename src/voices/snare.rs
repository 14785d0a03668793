//! Snare drum voice.
//!
//! Two parts: the drum head (two sines with a fast pitch drop) and the
//! wires (a noise burst swept down from 8 kHz to 5 kHz).

use crate::{
    dsp::{burst::Burst, decay::Decay, envelope::Envelope, oscillator::Sine},
    synth::{ParamSet, StereoBlock, Voice},
};

pub struct Snare {
    wires: Burst,
    head: Sine,
    overtone: Sine,
    pitch: Decay,
    envelope: Envelope,
    amplitude: f32,
}

impl Snare {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            wires: Burst::new(sample_rate, 8_000.0, 5_000.0, 0.1),
            head: Sine::new(sample_rate).with_frequency(200.0),
            overtone: Sine::new(sample_rate).with_frequency(150.0),
            pitch: Decay::new(sample_rate, 0.1),
            envelope: Envelope::ad(sample_rate, 0.01, 0.15),
            amplitude: 0.0,
        }
    }
}

impl Voice for Snare {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("amplitude", 0.5, 0.0, 1.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        self.amplitude = params.value("amplitude");
        self.wires.reset();
        self.head.reset();
        self.overtone.reset();
        self.pitch.reset();
        self.envelope.note_on();
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        let gain = std::f32::consts::FRAC_1_SQRT_2;
        for frame in 0..block.frames() {
            let drop = self.pitch.next_sample();
            self.head.set_freq_mul(drop);
            self.overtone.set_freq_mul(drop);

            let env = self.envelope.next_sample();
            let head = (self.head.next_sample() * 0.3 + self.overtone.next_sample() * 0.15) * env;
            let s = (self.wires.next_sample() + head) * self.amplitude;
            block.add(frame, s * gain, s * gain);
        }
    }

    fn trigger_off(&mut self) {
        self.envelope.note_off();
    }

    /// Done once both the head and the wires have died away.
    fn is_done(&self) -> bool {
        self.envelope.is_done() && self.wires.is_done()
    }

    fn envelope_level(&self) -> f32 {
        self.envelope.level().max(self.wires.level())
    }
}
