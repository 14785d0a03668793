use super::{
    decay::Decay,
    filter::SVFilter,
    oscillator::Noise,
};

/// A short burst of resonant noise.
///
/// White noise runs through a band-pass whose center glides from
/// `start_hz` to `end_hz` over the burst, under an exponential decay that
/// reaches -60 dB at `duration`. Hi-hats use a bright, very short burst;
/// the snare uses a lower, longer one for the rattle.
#[derive(Debug, Clone)]
pub struct Burst {
    noise: Noise,
    filter: SVFilter,
    envelope: Decay,
    start_hz: f32,
    end_hz: f32,
    elapsed: u32,
    total: u32,
}

impl Burst {
    pub fn new(sample_rate: f32, start_hz: f32, end_hz: f32, duration: f32) -> Self {
        Self {
            noise: Noise::default(),
            filter: SVFilter::bandpass(sample_rate, start_hz).with_resonance(0.6),
            envelope: Decay::new(sample_rate, duration),
            start_hz,
            end_hz,
            elapsed: 0,
            total: ((duration * sample_rate) as u32).max(1),
        }
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.filter.set_cutoff(self.start_hz);
        self.envelope.reset();
        self.elapsed = 0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.envelope.is_done() {
            return 0.0;
        }
        let t = (self.elapsed as f32 / self.total as f32).min(1.0);
        self.filter
            .set_cutoff(self.start_hz + (self.end_hz - self.start_hz) * t);
        self.elapsed = self.elapsed.saturating_add(1);

        let gain = self.envelope.next_sample();
        self.filter.process(self.noise.next_sample()) * gain
    }

    pub fn level(&self) -> f32 {
        if self.envelope.is_done() {
            0.0
        } else {
            self.envelope.value()
        }
    }

    pub fn is_done(&self) -> bool {
        self.envelope.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_silent_until_reset_and_ends_on_its_own() {
        let mut burst = Burst::new(48_000.0, 8_000.0, 5_000.0, 0.05);
        assert!(burst.is_done());
        assert_eq!(burst.next_sample(), 0.0);

        burst.reset();
        let energy: f32 = (0..480).map(|_| burst.next_sample().abs()).sum();
        assert!(energy > 0.0);

        for _ in 0..48_000 {
            burst.next_sample();
        }
        assert!(burst.is_done());
    }
}
