use std::f32::consts::TAU;

/*
Oscillators
===========

A phase accumulator stores where we are in the waveform as a fraction of one
cycle (0.0 to 1.0). Every sample it moves forward by

    increment = frequency / sample_rate

and wraps back into 0..1. The sine output is sin(TAU * phase).

Because the phase lives in the oscillator (not in the caller), rendering in
blocks of any size produces the same signal as rendering sample by sample:
there is no discontinuity at callback boundaries.

`freq_mul` scales the base frequency without forgetting it. The kick and
snare feed an exponential decay into it for their pitch drop, the FM voice
instead rewrites the frequency every sample.
*/

#[derive(Debug, Clone)]
pub struct Sine {
    sample_rate: f32,
    frequency: f32,
    multiplier: f32,
    phase: f32,
    increment: f32,
}

impl Sine {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            sample_rate,
            frequency: 440.0,
            multiplier: 1.0,
            phase: 0.0,
            increment: 0.0,
        };
        osc.update_increment();
        osc
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.set_frequency(frequency);
        self
    }

    #[inline]
    fn update_increment(&mut self) {
        self.increment = self.frequency * self.multiplier / self.sample_rate;
    }

    #[inline]
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.update_increment();
    }

    /// Scale the base frequency (1.0 = unchanged).
    #[inline]
    pub fn set_freq_mul(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
        self.update_increment();
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = (TAU * self.phase).sin();
        self.phase += self.increment;
        self.phase -= self.phase.floor();
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Restart at phase zero with no frequency scaling.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.multiplier = 1.0;
        self.update_increment();
    }
}

/// Deterministic white noise in -1..1 (xorshift32).
#[derive(Debug, Clone)]
pub struct Noise {
    state: u32,
}

impl Noise {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(0x9E37_79B9)
    }
}
