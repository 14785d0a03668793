//! TUI module for voicelab
//!
//! Real-time view of the engine plus a small computer keyboard for live
//! notes. Everything that reaches the audio thread goes through the
//! engine's `SynthHandle`.

pub mod state;
mod spectrum;
mod transport;
mod voices;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use voicelab::{
    io::{converter::midi_to_synth, midi::MidiEvent},
    synth::{SynthMessage, VoiceKind},
    voices as palette, EngineError, SynthHandle,
};

pub use state::{UiStateInit, UiStateUpdate};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use voices::{render_voices, Orbits};
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT size)
const VIS_BUFFER_SIZE: usize = 1024;

/// Voices the live keyboard can play, cycled with Tab
const LIVE_VOICES: [VoiceKind; 4] = [
    palette::SINE_ENV,
    palette::SQUARE_WAVE,
    palette::FM,
    palette::PLUCK,
];

/// Note length when the terminal cannot report key releases
const TAP_LENGTH: f64 = 0.3;

const LIVE_VELOCITY: u8 = 100;

/// Semitone offset from the current octave's C for a piano-style key row
fn key_to_semitone(c: char) -> Option<u8> {
    let semitone = match c {
        'a' => 0,
        'w' => 1,
        's' => 2,
        'e' => 3,
        'd' => 4,
        'f' => 5,
        't' => 6,
        'g' => 7,
        'y' => 8,
        'h' => 9,
        'u' => 10,
        'j' => 11,
        'k' => 12,
        _ => return None,
    };
    Some(semitone)
}

/// UI application state
pub struct UiApp {
    handle: SynthHandle,
    audio_rx: Consumer<f32>,
    state_rx: Consumer<UiStateUpdate>,
    init: UiStateInit,
    current: UiStateUpdate,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    orbits: Orbits,
    live_voice: usize,
    /// MIDI note of the `a` key
    base_note: u8,
    /// Terminal reports key releases, so live notes can be held
    key_releases: bool,
    status: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: SynthHandle,
        audio_rx: Consumer<f32>,
        state_rx: Consumer<UiStateUpdate>,
        init: UiStateInit,
    ) -> Self {
        Self {
            handle,
            audio_rx,
            state_rx,
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, init.sample_rate),
            init,
            current: UiStateUpdate::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            orbits: Orbits::new(),
            live_voice: 0,
            base_note: 60,
            key_releases: false,
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.key_releases = supports_keyboard_enhancement().unwrap_or(false);
        if self.key_releases {
            execute!(
                std::io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        tracing::debug!(key_releases = self.key_releases, "ui started");

        let result = self.event_loop(terminal);

        if self.key_releases {
            execute!(std::io::stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last_frame = Instant::now();
        while !self.should_quit {
            self.poll_audio();
            self.poll_state();

            let now = Instant::now();
            self.orbits
                .tick(self.current.voices(), (now - last_frame).as_secs_f32());
            last_frame = now;

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    match key.kind {
                        KeyEventKind::Press => self.handle_press(key.code),
                        KeyEventKind::Release => self.handle_release(key.code),
                        KeyEventKind::Repeat => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        if received {
            self.spectrum.update(&self.audio_buffer);
        }
    }

    /// Keep only the latest state
    fn poll_state(&mut self) {
        while let Ok(update) = self.state_rx.pop() {
            self.current = update;
        }
    }

    fn handle_press(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.live_voice = (self.live_voice + 1) % LIVE_VOICES.len(),
            KeyCode::Char(' ') => {
                let sent = self.handle.all_notes_off();
                self.report(sent);
            }
            KeyCode::Char('z') => self.base_note = self.base_note.saturating_sub(12).max(24),
            KeyCode::Char('x') => self.base_note = (self.base_note + 12).min(96),
            KeyCode::Char(c) => {
                if let Some(key) = self.live_key(c) {
                    self.play(MidiEvent::NoteOn {
                        channel: 0,
                        key,
                        velocity: LIVE_VELOCITY,
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_release(&mut self, key: KeyCode) {
        if let KeyCode::Char(c) = key {
            if let Some(key) = self.live_key(c) {
                self.play(MidiEvent::NoteOff {
                    channel: 0,
                    key,
                    velocity: 0,
                });
            }
        }
    }

    fn live_key(&self, c: char) -> Option<u8> {
        key_to_semitone(c.to_ascii_lowercase()).map(|semitone| self.base_note + semitone)
    }

    fn play(&mut self, event: MidiEvent) {
        let Some(message) = midi_to_synth(event, 0, LIVE_VOICES[self.live_voice]) else {
            return;
        };
        let sent = match message {
            // Without release events every tap becomes a fixed-length note.
            SynthMessage::NoteOn { voice, params, .. } if !self.key_releases => self
                .handle
                .schedule_note_from_now(voice, 0.0, TAP_LENGTH, params),
            message => self.handle.send(message),
        };
        self.report(sent);
    }

    fn report(&mut self, result: Result<(), EngineError>) {
        self.status = result.err().map(|err| err.to_string());
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(6),    // Voices
                Constraint::Length(10), // Scope | Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let audio_stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, rows[0], &self.init, &self.current, &audio_stats);
        render_voices(frame, rows[1], self.current.voices(), &self.orbits);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = match &self.status {
            Some(status) => format!(" {status}"),
            None => format!(
                " [A-K] Play {} (octave {})  [Z/X] Octave  [Tab] Voice  [Space] All off  [Q] Quit  | {} notes scored",
                LIVE_VOICES[self.live_voice],
                i32::from(self.base_note) / 12 - 1,
                self.init.notes,
            ),
        };
        let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
