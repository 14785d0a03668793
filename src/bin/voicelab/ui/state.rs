//! Shared state types for UI communication
//!
//! Static data is handed over once at startup; updates pushed from the
//! audio callback are `Copy` and allocation-free.

use voicelab::{synth::VoiceSnapshot, EngineStats};

/// Voices listed per update
pub const MAX_SHOWN_VOICES: usize = 16;

/// Static state, known before playback starts
#[derive(Clone, Debug)]
pub struct UiStateInit {
    pub title: &'static str,
    pub sample_rate: f32,
    /// Seconds until the last scored note is released
    pub end_time: f64,
    pub notes: usize,
}

/// Dynamic state update sent from the audio thread once per callback
#[derive(Clone, Copy, Debug)]
pub struct UiStateUpdate {
    pub stats: EngineStats,
    pub voices: [VoiceSnapshot; MAX_SHOWN_VOICES],
    /// Leading entries of `voices` that are filled
    pub shown: usize,
}

impl UiStateUpdate {
    pub fn new(stats: EngineStats, voices: [VoiceSnapshot; MAX_SHOWN_VOICES], shown: usize) -> Self {
        Self {
            stats,
            voices,
            shown: shown.min(MAX_SHOWN_VOICES),
        }
    }

    pub fn voices(&self) -> &[VoiceSnapshot] {
        &self.voices[..self.shown]
    }
}

impl Default for UiStateUpdate {
    fn default() -> Self {
        Self::new(
            EngineStats::default(),
            [VoiceSnapshot::default(); MAX_SHOWN_VOICES],
            0,
        )
    }
}
