use super::{params::NoteParams, voice::VoiceKind};

/// Caller-chosen id pairing a live note-on with its note-off
/// (e.g. the MIDI key number).
pub type NoteId = u32;

/// Trigger time of a scheduled note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum When {
    /// Absolute virtual time in seconds.
    At(f64),
    /// Seconds after the engine clock at the moment the message is drained.
    FromNow(f64),
}

/// Control messages from the UI thread to the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthMessage {
    Schedule {
        voice: VoiceKind,
        when: When,
        duration: f64,
        params: NoteParams,
    },
    NoteOn {
        note: NoteId,
        voice: VoiceKind,
        params: NoteParams,
    },
    NoteOff {
        note: NoteId,
    },
    AllNotesOff,
}
