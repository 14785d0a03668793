//! Waveform oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// First rising zero crossing in the first half of `samples`, so periodic
/// tones hold still between frames instead of scrolling.
fn trigger_point(samples: &[f32]) -> usize {
    samples[..samples.len() / 2]
        .windows(2)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .map_or(0, |i| i + 1)
}

/// Render the mono mix, scaled so quiet passages stay visible
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let window = &audio_buffer[trigger_point(audio_buffer)..];
    let peak = window
        .iter()
        .fold(0.0f32, |acc, &x| acc.max(x.abs()))
        .max(0.05) as f64;

    let width = (audio_buffer.len() / 2).max(1);
    let data: Vec<(f64, f64)> = window
        .iter()
        .take(width)
        .enumerate()
        .map(|(i, &sample)| (i as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let axis_style = Style::default().fg(Color::DarkGray);
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!(" Scope (±{peak:.2}) "))
                .borders(Borders::ALL),
        )
        .x_axis(Axis::default().bounds([0.0, width as f64]).style(axis_style))
        .y_axis(Axis::default().bounds([-peak, peak]).style(axis_style));

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_finds_rising_crossing() {
        let samples = [0.5, 0.2, -0.1, -0.3, 0.4, 0.6, 0.1, -0.2, -0.4, 0.3];
        assert_eq!(trigger_point(&samples), 4);
    }

    #[test]
    fn silence_starts_at_zero() {
        assert_eq!(trigger_point(&[0.0; 16]), 0);
        assert_eq!(trigger_point(&[]), 0);
    }
}
