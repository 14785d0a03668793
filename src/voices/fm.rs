//! Two-operator FM voice.
//!
//! A sine modulator bends the frequency of a sine carrier. The modulation
//! index follows its own envelope (`idx1 → idx2 → idx2 → idx3`), which is
//! what gives FM brass and bell patches their evolving brightness.
//!
//! # How It Works
//!
//! 1. Carrier base frequency = `freq * carMul`
//! 2. Modulator runs at `freq * modMul`; a slightly detuned ratio
//!    (the default 1.0007) adds a slow beating
//! 3. Each sample the carrier frequency is the base plus
//!    `modulator * index_envelope * freq * modMul`
//! 4. Amplitude envelope peaks and sustains at `sustain`
//!
//! The carrier can keep ringing at low level after the amplitude envelope
//! settles, so by default the voice also waits for its output to fall
//! below -60 dB before reporting done.

use crate::{
    dsp::{
        envelope::Envelope, follower::EnvelopeFollower, oscillator::Sine, pan::equal_power,
    },
    synth::{ParamSet, RetirePolicy, StereoBlock, Voice},
};

pub struct Fm {
    carrier: Sine,
    modulator: Sine,
    amp_env: Envelope,
    index_env: Envelope,
    follower: EnvelopeFollower,
    policy: RetirePolicy,
    amplitude: f32,
    carrier_base: f32,
    mod_scale: f32,
    gains: (f32, f32),
}

impl Fm {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            carrier: Sine::new(sample_rate),
            modulator: Sine::new(sample_rate),
            amp_env: Envelope::adsr(sample_rate, 0.1, 0.001, 0.75, 0.1),
            index_env: Envelope::adsr(sample_rate, 0.1, 0.001, 1.0, 0.1),
            follower: EnvelopeFollower::new(sample_rate, 0.1),
            policy: RetirePolicy::TAIL,
            amplitude: 0.0,
            carrier_base: 0.0,
            mod_scale: 0.0,
            gains: equal_power(0.0),
        }
    }

    pub fn with_retire_policy(mut self, policy: RetirePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Voice for Fm {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("freq", 440.0, 10.0, 4000.0);
        params.declare("amplitude", 0.5, 0.0, 1.0);
        params.declare("attackTime", 0.1, 0.01, 3.0);
        params.declare("releaseTime", 0.1, 0.1, 10.0);
        params.declare("sustain", 0.75, 0.1, 1.0);
        params.declare("idx1", 0.01, 0.0, 10.0);
        params.declare("idx2", 7.0, 0.0, 10.0);
        params.declare("idx3", 5.0, 0.0, 10.0);
        params.declare("carMul", 1.0, 0.0, 20.0);
        params.declare("modMul", 1.0007, 0.0, 20.0);
        params.declare("pan", 0.0, -1.0, 1.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        let freq = params.value("freq");
        let mod_mul = params.value("modMul");
        self.carrier_base = freq * params.value("carMul");
        self.mod_scale = freq * mod_mul;

        self.carrier.reset();
        self.carrier.set_frequency(self.carrier_base);
        self.modulator.reset();
        self.modulator.set_frequency(self.mod_scale);

        self.amplitude = params.value("amplitude");
        self.gains = equal_power(params.value("pan"));

        let attack = params.value("attackTime");
        let release = params.value("releaseTime");
        // "sustain" is declared for presets only; the amplitude envelope
        // always peaks and holds at full scale.
        self.amp_env.set_levels(0.0, 1.0, 1.0, 0.0);
        self.amp_env.set_attack(attack);
        self.amp_env.set_release(release);
        self.amp_env.note_on();

        let (idx1, idx2, idx3) = (
            params.value("idx1"),
            params.value("idx2"),
            params.value("idx3"),
        );
        self.index_env.set_levels(idx1, idx2, idx2, idx3);
        self.index_env.set_attack(attack);
        self.index_env.set_release(release);
        self.index_env.note_on();

        self.follower.reset();
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        let (gain_l, gain_r) = self.gains;
        for frame in 0..block.frames() {
            let deviation =
                self.modulator.next_sample() * self.index_env.next_sample() * self.mod_scale;
            self.carrier.set_frequency(self.carrier_base + deviation);

            let s = self.carrier.next_sample() * self.amp_env.next_sample() * self.amplitude;
            self.follower.process(s);
            block.add(frame, s * gain_l, s * gain_r);
        }
    }

    fn trigger_off(&mut self) {
        self.amp_env.note_off();
        self.index_env.note_off();
    }

    fn is_done(&self) -> bool {
        self.policy
            .is_done(self.amp_env.is_done(), self.follower.value())
    }

    fn envelope_level(&self) -> f32 {
        self.amp_env.level()
    }
}
