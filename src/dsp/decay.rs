use crate::MIN_TIME;

/// Level at which a decay is considered finished (-60 dB).
pub const DECAY_FLOOR: f32 = 0.001;

/// Exponential decay from 1.0 toward zero.
///
/// The curve reaches [`DECAY_FLOOR`] after `time` seconds. Drums use it both
/// as an excitation envelope and as a pitch multiplier.
#[derive(Debug, Clone)]
pub struct Decay {
    value: f32,
    multiplier: f32,
}

impl Decay {
    pub fn new(sample_rate: f32, time: f32) -> Self {
        let mut decay = Self {
            value: DECAY_FLOOR,
            multiplier: 0.0,
        };
        decay.set_time(sample_rate, time);
        decay
    }

    pub fn set_time(&mut self, sample_rate: f32, time: f32) {
        let samples = (time.max(MIN_TIME) * sample_rate).max(1.0);
        self.multiplier = DECAY_FLOOR.powf(1.0 / samples);
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = self.value;
        self.value *= self.multiplier;
        out
    }

    /// Restart the curve at 1.0.
    pub fn reset(&mut self) {
        self.value = 1.0;
    }

    /// Jump straight to the end of the curve.
    pub fn finish(&mut self) {
        self.value = self.value.min(DECAY_FLOOR);
    }

    pub fn is_done(&self) -> bool {
        self.value <= DECAY_FLOOR
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_floor_after_decay_time() {
        let mut decay = Decay::new(1_000.0, 0.1);
        decay.reset();
        assert_eq!(decay.next_sample(), 1.0);

        for _ in 0..98 {
            decay.next_sample();
        }
        assert!(!decay.is_done());
        decay.next_sample();
        decay.next_sample();
        assert!(decay.value() <= DECAY_FLOOR * 1.01);
    }

    #[test]
    fn finish_jumps_to_floor() {
        let mut decay = Decay::new(48_000.0, 2.0);
        decay.reset();
        decay.finish();
        assert!(decay.is_done());
    }
}
