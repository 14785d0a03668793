/// One-pole follower of a signal's magnitude.
///
/// Voices feed their output through it so retirement can wait for the audible
/// tail, not just the envelope, to die away.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    coefficient: f32,
    value: f32,
}

impl EnvelopeFollower {
    /// `lag` is the time constant in seconds.
    pub fn new(sample_rate: f32, lag: f32) -> Self {
        let samples = (lag * sample_rate).max(1.0);
        Self {
            coefficient: (-1.0 / samples).exp(),
            value: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let magnitude = sample.abs();
        self.value = magnitude + self.coefficient * (self.value - magnitude);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
