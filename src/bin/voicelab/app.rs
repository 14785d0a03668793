//! Audio setup and the real-time callback

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use voicelab::{
    sequencing::{songs, Score},
    synth::VoiceSnapshot,
    EngineConfig, SynthEngine, MAX_BLOCK_SIZE,
};

use crate::ui::{
    state::{UiStateInit, UiStateUpdate, MAX_SHOWN_VOICES},
    UiApp,
};

/// Samples buffered for the oscilloscope between UI frames
const AUDIO_RING_SIZE: usize = 8192;

/// Silence rendered after the last note when running headless
const HEADLESS_TAIL: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Song {
    Arpeggio,
    Groove,
    Loonboon,
}

impl Song {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "arpeggio" => Some(Self::Arpeggio),
            "groove" => Some(Self::Groove),
            "loonboon" => Some(Self::Loonboon),
            _ => None,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Arpeggio => "Arpeggio in G",
            Self::Groove => "Drum Groove",
            Self::Loonboon => "Loonboon",
        }
    }

    fn score(self) -> Score {
        match self {
            Self::Arpeggio => songs::arpeggio_in_g(),
            Self::Groove => songs::drum_groove(),
            Self::Loonboon => songs::loonboon(),
        }
    }
}

/// Application builder
pub struct Voicelab {
    song: Song,
    headless: bool,
}

impl Voicelab {
    pub fn new(song: Song) -> Self {
        Self {
            song,
            headless: false,
        }
    }

    /// Play without the TUI and exit after the song ends
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let score = self.song.score();
        let (mut engine, handle) =
            SynthEngine::with_default_voices(EngineConfig::default().with_sample_rate(sample_rate));
        engine.load_score(&score);

        tracing::info!(
            song = self.song.title(),
            sample_rate,
            channels,
            notes = score.len(),
            "starting playback"
        );

        let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(AUDIO_RING_SIZE);
        let (mut state_tx, state_rx) = RingBuffer::<UiStateUpdate>::new(64);

        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut snapshots = [VoiceSnapshot::default(); MAX_SHOWN_VOICES];

        // The engine moves into the callback; the handle stays with the UI.
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    engine.render(&mut left[..frames], &mut right[..frames]);

                    let start = frames_written * channels;
                    let out = &mut data[start..start + frames * channels];
                    for (i, frame) in out.chunks_exact_mut(channels).enumerate() {
                        let (l, r) = (left[i], right[i]);
                        let mid = 0.5 * (l + r);
                        for (ch, sample) in frame.iter_mut().enumerate() {
                            *sample = match ch {
                                0 if channels > 1 => l,
                                1 => r,
                                _ => mid,
                            };
                        }
                        let _ = audio_tx.push(mid);
                    }

                    frames_written += frames;
                }

                let shown = engine.write_snapshots(&mut snapshots);
                let _ = state_tx.push(UiStateUpdate::new(engine.stats(), snapshots, shown));
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        if self.headless {
            let seconds = score.end_time() + HEADLESS_TAIL;
            println!("Playing {} ({seconds:.1} s)...", self.song.title());
            thread::sleep(Duration::from_secs_f64(seconds));
            return Ok(());
        }

        let init = UiStateInit {
            title: self.song.title(),
            sample_rate,
            end_time: score.end_time(),
            notes: score.len(),
        };
        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, audio_rx, state_rx, init).run(&mut terminal);
        ratatui::restore();
        drop(stream);
        result
    }
}
