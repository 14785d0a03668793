//! Transport bar widget - song, clock, voice counts and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{UiStateInit, UiStateUpdate};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

const PROGRESS_WIDTH: usize = 16;

fn progress_bar(clock: f64, end_time: f64) -> String {
    let ratio = if end_time > 0.0 {
        (clock / end_time).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let filled = (ratio * PROGRESS_WIDTH as f64).round() as usize;
    format!("{}{}", "━".repeat(filled), "─".repeat(PROGRESS_WIDTH - filled))
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    init: &UiStateInit,
    update: &UiStateUpdate,
    audio_stats: &AudioStats,
) {
    let block = Block::default()
        .title(" voicelab ")
        .borders(Borders::ALL);

    let stats = &update.stats;
    let finished = stats.clock >= init.end_time && stats.active_voices == 0;
    let (symbol, label, color) = if finished {
        ("■", "Done", Color::Yellow)
    } else {
        ("▶", "Playing", Color::Green)
    };

    let line = Line::from(vec![
        Span::styled(format!(" {}  ", init.title), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("{:6.2}s ", stats.clock),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            progress_bar(stats.clock, init.end_time),
            Style::default().fg(color),
        ),
        Span::styled(
            format!(" {:.2}s  ", init.end_time),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "voices {}  queued {}  dropped {}  ",
                stats.active_voices, stats.pending_events, stats.dropped_notes
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz  ", init.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_with_the_clock() {
        assert_eq!(progress_bar(0.0, 8.0), "─".repeat(PROGRESS_WIDTH));
        assert_eq!(progress_bar(4.0, 8.0).chars().filter(|&c| c == '━').count(), 8);
        assert_eq!(progress_bar(20.0, 8.0), "━".repeat(PROGRESS_WIDTH));
        assert_eq!(progress_bar(1.0, 0.0), "━".repeat(PROGRESS_WIDTH));
    }

    #[test]
    fn audio_stats_of_a_square() {
        let stats = AudioStats::from_buffer(&[0.5, -0.5, 0.5, -0.5]);
        assert_eq!(stats.peak, 0.5);
        assert!((stats.rms - 0.5).abs() < 1e-6);
    }
}
