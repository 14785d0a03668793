use std::fmt;

use super::{block::StereoBlock, params::ParamSet};

/// Type tag naming a family of interchangeable voices (e.g. `"SineEnv"`).
///
/// The pool partitions its voices by kind; the sequencer schedules by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceKind(&'static str);

impl VoiceKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// When a voice counts as finished.
///
/// Plain envelope voices are done as soon as their amplitude envelope is.
/// Voices with resonant or delay-based tails (FM, plucked string) keep
/// ringing after the envelope settles, so they also wait for an envelope
/// follower on their output to drop below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetirePolicy {
    #[default]
    EnvelopeDone,
    EnvelopeAndTail {
        threshold: f32,
    },
}

impl RetirePolicy {
    pub const TAIL: Self = Self::EnvelopeAndTail { threshold: 0.001 };

    pub fn is_done(self, envelope_done: bool, tail_level: f32) -> bool {
        match self {
            Self::EnvelopeDone => envelope_done,
            Self::EnvelopeAndTail { threshold } => envelope_done && tail_level < threshold,
        }
    }
}

/// A sound-producing unit with a note lifecycle.
///
/// The pool calls `init` once when it creates the voice, then cycles it
/// through `trigger_on` → `process`* → `trigger_off` → `process`* until
/// `is_done` reports true, at which point the voice is returned to the free
/// set and may be triggered again. `process` must not allocate or block.
pub trait Voice: Send {
    /// Declare parameters with their defaults and ranges.
    fn init(&mut self, params: &mut ParamSet);

    /// Latch parameter values and reset envelopes, phases and filters to
    /// note-start.
    fn trigger_on(&mut self, params: &ParamSet);

    /// Advance by `block.frames()` samples, accumulating into `block`.
    fn process(&mut self, block: &mut StereoBlock<'_>);

    /// Enter the release stage. Output fades rather than stopping.
    fn trigger_off(&mut self);

    fn is_done(&self) -> bool;

    /// Amplitude envelope level, for display only.
    fn envelope_level(&self) -> f32 {
        0.0
    }
}

/// What the visualizer needs to know about one sounding voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub kind: VoiceKind,
    pub frequency: f32,
    pub amplitude: f32,
    pub level: f32,
}

impl Default for VoiceSnapshot {
    fn default() -> Self {
        Self {
            kind: VoiceKind::new(""),
            frequency: 0.0,
            amplitude: 0.0,
            level: 0.0,
        }
    }
}
