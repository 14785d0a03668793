//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the oscilloscope buffer, sampled at log-spaced
//! frequencies so each octave gets the same width.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Points on the displayed curve
const SPECTRUM_POINTS: usize = 64;

/// Floor of the dB axis
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin read for each display point
    bins: Vec<usize>,
    /// (log10 Hz, dB) per display point
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(size);

        let denom = size.saturating_sub(1).max(1) as f32;
        let window = (0..size)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let nyquist_bin = (size / 2).max(1) - 1;
        let max_freq = f64::from((sample_rate / 2.0).min(20_000.0));
        let min_freq = 20.0_f64.min(max_freq);
        let (bins, points) = (0..SPECTRUM_POINTS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
                let freq = min_freq * (max_freq / min_freq).powf(t);
                let bin = (freq * size as f64 / f64::from(sample_rate)).round() as usize;
                (bin.min(nyquist_bin), (freq.log10(), FLOOR_DB))
            })
            .unzip();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); size],
            bins,
            points,
        }
    }

    /// Recompute from `buffer`; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (point, &bin) in self.points.iter_mut().zip(&self.bins) {
            let power = self.scratch[bin].norm_sqr().max(1e-12);
            point.1 = (10.0 * f64::from(power).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let (min_x, max_x) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.0, last.0.max(first.0 + 1.0)),
        _ => (1.0, 4.0),
    };
    let max_db = points.iter().map(|p| p.1).fold(FLOOR_DB, f64::max);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
