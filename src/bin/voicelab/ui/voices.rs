//! Active voice list
//!
//! One row per sounding voice: kind, pitch, an envelope meter and a small
//! orbiting marker. The orbit is pure decoration; its phase lives here in
//! the UI and never touches the engine.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use voicelab::{synth::VoiceSnapshot, voices};

use super::state::MAX_SHOWN_VOICES;

const ORBIT: [&str; 8] = ["◜", "◝", "◞", "◟", "◜", "◝", "◞", "◟"];
const METER_WIDTH: usize = 20;

/// Per-row animation counters
#[derive(Default)]
pub struct Orbits {
    phases: [f32; MAX_SHOWN_VOICES],
}

impl Orbits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance each row's phase; higher notes spin faster.
    pub fn tick(&mut self, voices: &[VoiceSnapshot], dt: f32) {
        for (phase, voice) in self.phases.iter_mut().zip(voices) {
            let speed = 0.5 + (voice.frequency.max(1.0) / 110.0).log2().max(0.0);
            *phase = (*phase + speed * dt).fract();
        }
    }

    fn glyph(&self, row: usize) -> &'static str {
        let step = (self.phases[row] * ORBIT.len() as f32) as usize;
        ORBIT[step.min(ORBIT.len() - 1)]
    }
}

fn kind_color(voice: &VoiceSnapshot) -> Color {
    match voice.kind {
        voices::SINE_ENV => Color::Cyan,
        voices::SQUARE_WAVE => Color::Blue,
        voices::FM => Color::Magenta,
        voices::PLUCK => Color::Yellow,
        voices::KICK | voices::SNARE | voices::HIHAT => Color::Red,
        _ => Color::White,
    }
}

pub fn render_voices(frame: &mut Frame, area: Rect, voices: &[VoiceSnapshot], orbits: &Orbits) {
    let block = Block::default()
        .title(format!(" Voices ({}) ", voices.len()))
        .borders(Borders::ALL);

    let lines: Vec<Line> = voices
        .iter()
        .enumerate()
        .map(|(row, voice)| {
            let filled = ((voice.level.clamp(0.0, 1.0) * METER_WIDTH as f32).round()) as usize;
            let pitch = if voice.frequency > 0.0 {
                format!("{:8.2} Hz", voice.frequency)
            } else {
                "       -   ".to_string()
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", orbits.glyph(row)),
                    Style::default().fg(kind_color(voice)),
                ),
                Span::styled(
                    format!("{:<11}", voice.kind.name()),
                    Style::default().fg(kind_color(voice)),
                ),
                Span::raw(pitch),
                Span::styled(
                    format!("  amp {:.2}  ", voice.amplitude),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<width$}", "█".repeat(filled), width = METER_WIDTH),
                    Style::default().fg(Color::Green),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
