//! Kick drum voice.
//!
//! A sine whose pitch falls exponentially from the note frequency, under a
//! short attack/decay envelope. The pitch drop is the "punch"; the decay
//! sets how boomy it is.
//!
//! # How It Works
//!
//! 1. Sine oscillator provides the body
//! 2. An exponential decay multiplies the oscillator frequency, sweeping it
//!    down from `frequency` over 0.3 s
//! 3. One-shot amplitude envelope: 10 ms attack, 0.3 s decay
//!
//! The envelope finishes on its own; a trigger-off just cuts the decay
//! short.

use crate::{
    dsp::{decay::Decay, envelope::Envelope, oscillator::Sine},
    synth::{ParamSet, RetirePolicy, StereoBlock, Voice},
};

pub struct Kick {
    body: Sine,
    pitch: Decay,
    envelope: Envelope,
    policy: RetirePolicy,
    amplitude: f32,
}

impl Kick {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            body: Sine::new(sample_rate).with_frequency(150.0),
            pitch: Decay::new(sample_rate, 0.3),
            envelope: Envelope::ad(sample_rate, 0.01, 0.3),
            policy: RetirePolicy::EnvelopeDone,
            amplitude: 0.0,
        }
    }
}

impl Voice for Kick {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("amplitude", 0.5, 0.0, 1.0);
        params.declare("frequency", 150.0, 20.0, 5000.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        self.amplitude = params.value("amplitude");
        self.body.reset();
        self.body.set_frequency(params.value("frequency"));
        self.pitch.reset();
        self.envelope.note_on();
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        let gain = std::f32::consts::FRAC_1_SQRT_2;
        for frame in 0..block.frames() {
            self.body.set_freq_mul(self.pitch.next_sample());
            let s = self.body.next_sample() * self.envelope.next_sample() * self.amplitude;
            block.add(frame, s * gain, s * gain);
        }
    }

    fn trigger_off(&mut self) {
        self.envelope.note_off();
        self.pitch.finish();
    }

    fn is_done(&self) -> bool {
        self.policy.is_done(self.envelope.is_done(), 0.0)
    }

    fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }
}
