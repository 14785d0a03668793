use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type              | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | far from it  |
| notch / band-stop | far from cutoff | around it    |
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

/// Topology-preserving state-variable filter.
///
/// The cutoff coefficient is cached, so sweeping the cutoff costs one `tan`
/// per change rather than one per sample.
#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    g: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate,
            cutoff_hz,
            resonance: 0.0,
            g: 0.0,
            filter_type,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, sample_rate, cutoff_hz)
    }

    pub fn highpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, sample_rate, cutoff_hz)
    }

    pub fn bandpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, sample_rate, cutoff_hz)
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.set_resonance(resonance);
        self
    }

    /// Set the cutoff, kept below Nyquist.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz.clamp(10.0, self.sample_rate * 0.45);
        self.g = (PI * self.cutoff_hz / self.sample_rate).tan();
    }

    /// Resonance in 0..1 (1.0 self-oscillates).
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 0.99);
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    #[inline]
    fn tick(&mut self, sample: f32) -> FilterOutputs {
        let g = self.g;
        let k = 2.0 - 2.0 * self.resonance;
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.tick(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::Notch => outputs.notch,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

/// Two-point moving average, the damping filter of a plucked string loop.
#[derive(Debug, Clone, Default)]
pub struct MovingAverage {
    previous: f32,
}

impl MovingAverage {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let out = 0.5 * (sample + self.previous);
        self.previous = sample;
        out
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Sine;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(64);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn filtered_sine(filter: &mut SVFilter, freq: f32) -> f32 {
        let mut osc = Sine::new(48_000.0).with_frequency(freq);
        let mut buffer = vec![0.0f32; 1024];
        osc.render(&mut buffer);
        filter.render(&mut buffer);
        peak_after_transient(&buffer)
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(48_000.0, 500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer);
        assert!(buffer[511] > 0.99);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(48_000.0, 500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer);
        assert!(buffer[511].abs() < 0.01);
    }

    #[test]
    fn bandpass_emphasizes_cutoff_frequency() {
        let mut filter = SVFilter::bandpass(48_000.0, 1_000.0).with_resonance(0.5);
        let pass_peak = filtered_sine(&mut filter, 1_000.0);
        filter.reset();
        let off_peak = filtered_sine(&mut filter, 100.0);

        assert!(
            pass_peak > off_peak * 2.0,
            "pass_peak={pass_peak}, off_peak={off_peak}"
        );
    }

    #[test]
    fn cutoff_is_clamped_below_nyquist() {
        let filter = SVFilter::bandpass(44_100.0, 30_000.0);
        assert!(filter.cutoff() < 22_050.0);
    }

    #[test]
    fn moving_average_smooths_alternating_signal() {
        let mut avg = MovingAverage::new();
        avg.process(1.0);
        assert_eq!(avg.process(-1.0), 0.0);
    }
}
