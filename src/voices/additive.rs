//! Additive voices: a handful of sine partials under one ADSR.
//!
//! # How It Works
//!
//! 1. Up to five sine oscillators sit at integer multiples of the note
//!    frequency, each weighted 1/n
//! 2. `sine_env` uses partials 1, 3, 5, 7 for a soft hollow tone
//! 3. `square_wave` uses the odd partials up to 9, the start of a square
//!    wave's series
//! 4. An equal-power panner places the sum in the stereo field

use crate::{
    dsp::{
        envelope::Envelope, follower::EnvelopeFollower, oscillator::Sine, pan::equal_power,
    },
    synth::{ParamSet, RetirePolicy, StereoBlock, Voice},
};

const MAX_PARTIALS: usize = 5;

pub struct Additive {
    partials: [Sine; MAX_PARTIALS],
    harmonics: &'static [f32],
    envelope: Envelope,
    follower: EnvelopeFollower,
    policy: RetirePolicy,
    amplitude: f32,
    gains: (f32, f32),
}

impl Additive {
    fn with_harmonics(sample_rate: f32, harmonics: &'static [f32], sustain: f32) -> Self {
        debug_assert!(harmonics.len() <= MAX_PARTIALS);
        Self {
            partials: std::array::from_fn(|_| Sine::new(sample_rate)),
            harmonics,
            envelope: Envelope::adsr(sample_rate, 0.2, 0.5, sustain, 0.2),
            follower: EnvelopeFollower::new(sample_rate, 0.1),
            policy: RetirePolicy::EnvelopeDone,
            amplitude: 0.0,
            gains: equal_power(0.0),
        }
    }

    pub fn sine_env(sample_rate: f32) -> Self {
        Self::with_harmonics(sample_rate, &[1.0, 3.0, 5.0, 7.0], 1.0)
    }

    pub fn square_wave(sample_rate: f32) -> Self {
        Self::with_harmonics(sample_rate, &[1.0, 3.0, 5.0, 7.0, 9.0], 0.8)
    }

    pub fn with_retire_policy(mut self, policy: RetirePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Voice for Additive {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("amplitude", 0.3, 0.0, 1.0);
        params.declare("frequency", 60.0, 20.0, 5000.0);
        params.declare("attackTime", 0.2, 0.01, 3.0);
        params.declare("releaseTime", 0.2, 0.1, 10.0);
        params.declare("pan", 0.0, -1.0, 1.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        let frequency = params.value("frequency");
        for (osc, n) in self.partials.iter_mut().zip(self.harmonics) {
            osc.reset();
            osc.set_frequency(frequency * n);
        }
        self.amplitude = params.value("amplitude");
        self.gains = equal_power(params.value("pan"));

        self.envelope.set_attack(params.value("attackTime"));
        self.envelope.set_release(params.value("releaseTime"));
        self.envelope.note_on();
        self.follower.reset();
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        let count = self.harmonics.len();
        let (gain_l, gain_r) = self.gains;
        for frame in 0..block.frames() {
            let mut sum = 0.0;
            for (osc, n) in self.partials[..count].iter_mut().zip(self.harmonics) {
                sum += osc.next_sample() / n;
            }
            let s = sum * self.envelope.next_sample() * self.amplitude;
            self.follower.process(s);
            block.add(frame, s * gain_l, s * gain_r);
        }
    }

    fn trigger_off(&mut self) {
        self.envelope.note_off();
    }

    fn is_done(&self) -> bool {
        self.policy
            .is_done(self.envelope.is_done(), self.follower.value())
    }

    fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }
}
