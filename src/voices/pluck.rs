//! Plucked string voice (Karplus-Strong).
//!
//! A short burst of noise is fed into a delay line whose length sets the
//! pitch. Each trip around the loop passes through a two-point average, so
//! high harmonics die first and the tone mellows as it rings, like a real
//! string.
//!
//! # How It Works
//!
//! 1. Noise under a fast exponential decay excites the loop
//! 2. `delay(average(delay_out + excitation))` is the string
//! 3. An ADSR shapes the overall level; the long default release lets
//!    notes ring into each other
//! 4. A one-shot pan envelope sweeps `Pan1 → Pan2 → Pan1` over `PanRise`
//!    seconds each way

use crate::{
    dsp::{
        decay::Decay, delay::DelayLine, envelope::Envelope, filter::MovingAverage,
        follower::EnvelopeFollower, oscillator::Noise, pan::equal_power,
    },
    synth::{ParamSet, RetirePolicy, StereoBlock, Voice},
};

/// Lowest playable pitch (A0) fixes the delay capacity.
const LOWEST_HZ: f32 = 27.5;

pub struct Pluck {
    sample_rate: f32,
    noise: Noise,
    excitation: Decay,
    string: DelayLine,
    damping: MovingAverage,
    amp_env: Envelope,
    pan_env: Envelope,
    follower: EnvelopeFollower,
    policy: RetirePolicy,
    amplitude: f32,
}

impl Pluck {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            noise: Noise::default(),
            excitation: Decay::new(sample_rate, 0.1),
            string: DelayLine::with_max_delay(sample_rate, 1.0 / LOWEST_HZ),
            damping: MovingAverage::new(),
            amp_env: Envelope::adsr(sample_rate, 0.001, 0.1, 0.7, 3.0),
            pan_env: Envelope::ad(sample_rate, 0.0, 0.0),
            follower: EnvelopeFollower::new(sample_rate, 0.1),
            policy: RetirePolicy::TAIL,
            amplitude: 0.0,
        }
    }

    pub fn with_retire_policy(mut self, policy: RetirePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Voice for Pluck {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("amplitude", 0.1, 0.0, 1.0);
        params.declare("frequency", 60.0, 20.0, 5000.0);
        params.declare("attackTime", 0.001, 0.001, 1.0);
        params.declare("releaseTime", 3.0, 0.1, 10.0);
        params.declare("sustain", 0.7, 0.0, 1.0);
        params.declare("Pan1", 0.0, -1.0, 1.0);
        params.declare("Pan2", 0.0, -1.0, 1.0);
        params.declare("PanRise", 0.0, 0.0, 3.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        self.amplitude = params.value("amplitude");
        self.string.clear();
        self.string
            .set_frequency(self.sample_rate, params.value("frequency"));
        self.damping.reset();
        self.excitation.reset();

        self.amp_env.set_attack(params.value("attackTime"));
        self.amp_env.set_release(params.value("releaseTime"));
        self.amp_env.set_sustain_level(params.value("sustain"));
        self.amp_env.note_on();

        let (pan1, pan2) = (params.value("Pan1"), params.value("Pan2"));
        let rise = params.value("PanRise");
        self.pan_env.set_levels(pan1, pan2, pan1, pan1);
        self.pan_env.set_attack(rise);
        self.pan_env.set_decay(rise);
        self.pan_env.note_on();

        self.follower.reset();
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        for frame in 0..block.frames() {
            let excite = self.noise.next_sample() * self.excitation.next_sample();
            let feedback = self.string.read();
            let s = self.string.tick(self.damping.process(feedback + excite));

            let out = s * self.amp_env.next_sample() * self.amplitude;
            self.follower.process(out);

            let (gain_l, gain_r) = equal_power(self.pan_env.next_sample());
            block.add(frame, out * gain_l, out * gain_r);
        }
    }

    fn trigger_off(&mut self) {
        self.amp_env.note_off();
    }

    fn is_done(&self) -> bool {
        self.policy
            .is_done(self.amp_env.is_done(), self.follower.value())
    }

    fn envelope_level(&self) -> f32 {
        self.amp_env.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        synth::NoteParams,
        voices::tests::{peak, play},
    };

    #[test]
    fn string_rings_and_dies_out() {
        let mut voice = Pluck::new(48_000.0);
        let overrides = NoteParams::new()
            .with("frequency", 220.0)
            .with("amplitude", 0.5)
            .with("releaseTime", 0.2);
        let (out, done) = play(&mut voice, 48_000.0, overrides, 0.2, 3.0);

        assert!(done);
        assert!(peak(&out[..4800]) > 0.01);
    }

    #[test]
    fn pitch_sets_loop_length() {
        let mut voice = Pluck::new(48_000.0);
        let mut params = ParamSet::new();
        voice.init(&mut params);
        params.set("frequency", 480.0);
        voice.trigger_on(&params);
        assert_eq!(voice.string.delay_samples(), 100);
    }

    #[test]
    fn pan_sweep_moves_the_image() {
        let mut voice = Pluck::new(48_000.0);
        let mut params = ParamSet::new();
        voice.init(&mut params);
        params.apply(
            &NoteParams::new()
                .with("frequency", 480.0)
                .with("Pan1", -1.0)
                .with("Pan2", 1.0)
                .with("PanRise", 0.05),
        );
        voice.trigger_on(&params);

        let (mut left, mut right) = (vec![0.0; 2400], vec![0.0; 2400]);
        voice.process(&mut StereoBlock::new(&mut left, &mut right));

        let energy = |s: &[f32]| s.iter().map(|x| x.abs()).sum::<f32>();
        // Starts left, ends the attack right.
        assert!(energy(&right[100..400]) < 0.5 * energy(&left[100..400]));
        assert!(energy(&left[2100..]) < 0.5 * energy(&right[2100..]));
    }
}
