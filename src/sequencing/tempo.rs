/// Beat arithmetic for a fixed tempo in 4/4.
///
/// All values are seconds, ready to use as score times and durations.
///
/// ```
/// use voicelab::sequencing::Tempo;
///
/// let tempo = Tempo::new(120.0);
/// assert_eq!(tempo.beat(), 0.5);
/// assert_eq!(tempo.at(1, 2.0), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    pub bpm: f64,
}

impl Tempo {
    pub const BEATS_PER_MEASURE: f64 = 4.0;

    pub fn new(bpm: f64) -> Self {
        Self { bpm }
    }

    pub fn beat(&self) -> f64 {
        60.0 / self.bpm
    }

    pub fn measure(&self) -> f64 {
        self.beat() * Self::BEATS_PER_MEASURE
    }

    pub fn whole(&self) -> f64 {
        self.measure()
    }

    pub fn half(&self) -> f64 {
        self.beat() * 2.0
    }

    pub fn quarter(&self) -> f64 {
        self.beat()
    }

    pub fn eighth(&self) -> f64 {
        self.quarter() / 2.0
    }

    pub fn sixteenth(&self) -> f64 {
        self.eighth() / 2.0
    }

    /// Seconds from the top of the piece to `beat` within `measure`
    /// (both counted from zero).
    pub fn at(&self, measure: u32, beat: f64) -> f64 {
        f64::from(measure) * self.measure() + beat * self.beat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_values_at_105_bpm() {
        let tempo = Tempo::new(105.0);
        let beat = 60.0 / 105.0;
        assert_eq!(tempo.beat(), beat);
        assert_eq!(tempo.measure(), beat * 4.0);
        assert_eq!(tempo.sixteenth(), beat / 4.0);
        assert_eq!(tempo.half(), 2.0 * tempo.quarter());
        assert_eq!(tempo.at(2, 0.5), tempo.measure() * 2.0 + beat * 0.5);
    }
}
