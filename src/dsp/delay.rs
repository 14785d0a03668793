/// Circular delay line with a capacity fixed at construction.
///
/// The only allocation happens in [`DelayLine::with_max_delay`], which runs
/// when a voice is created, never per note.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    delay_samples: usize,
}

impl DelayLine {
    pub fn with_max_delay(sample_rate: f32, max_seconds: f32) -> Self {
        let capacity = ((sample_rate * max_seconds).ceil() as usize).max(2);
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            delay_samples: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn set_delay_samples(&mut self, samples: usize) {
        self.delay_samples = samples.clamp(1, self.buffer.len() - 1);
    }

    /// Tune the loop so it repeats `frequency` times per second.
    pub fn set_frequency(&mut self, sample_rate: f32, frequency: f32) {
        let samples = (sample_rate / frequency.max(1.0)) as usize;
        self.set_delay_samples(samples);
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// The sample that will come out on the next [`tick`](Self::tick).
    #[inline]
    pub fn read(&self) -> f32 {
        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - self.delay_samples) % len;
        self.buffer[read_pos]
    }

    /// Write one sample and return the delayed output.
    #[inline]
    pub fn tick(&mut self, sample: f32) -> f32 {
        let delayed = self.read();
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        delayed
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_comes_back_after_delay() {
        let mut delay = DelayLine::with_max_delay(1_000.0, 0.1);
        delay.set_delay_samples(10);

        assert_eq!(delay.tick(1.0), 0.0);
        for _ in 0..9 {
            assert_eq!(delay.tick(0.0), 0.0);
        }
        assert_eq!(delay.tick(0.0), 1.0);
    }

    #[test]
    fn frequency_sets_period() {
        let mut delay = DelayLine::with_max_delay(48_000.0, 1.0 / 27.5);
        delay.set_frequency(48_000.0, 440.0);
        assert_eq!(delay.delay_samples(), 109);

        delay.set_frequency(48_000.0, 10.0);
        assert_eq!(delay.delay_samples(), delay.capacity() - 1);
    }
}
