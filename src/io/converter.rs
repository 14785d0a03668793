use crate::{
    io::midi::{MidiEvent, ALL_NOTES_OFF},
    sequencing::notes::midi_to_freq,
    synth::{NoteParams, SynthMessage, VoiceKind},
};

/// Peak amplitude of a full-velocity note.
const VELOCITY_SCALE: f32 = 0.5;

/// Map a MIDI event on `channel_filter` to a live note message for `voice`.
///
/// The key number doubles as the note id, so a later note-off for the same
/// key releases the right voice. A note-on with velocity 0 is a note-off.
/// Frequency is written under both `frequency` and `freq` so it reaches
/// every voice in the palette; the name a voice does not declare is ignored.
pub fn midi_to_synth(
    midi: MidiEvent,
    channel_filter: u8,
    voice: VoiceKind,
) -> Option<SynthMessage> {
    if midi.channel() != channel_filter {
        return None;
    }
    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } | MidiEvent::NoteOff { key, .. } => {
            Some(SynthMessage::NoteOff {
                note: u32::from(key),
            })
        }
        MidiEvent::NoteOn { key, velocity, .. } => {
            let frequency = midi_to_freq(key);
            let params = NoteParams::new()
                .with("frequency", frequency)
                .with("freq", frequency)
                .with("amplitude", f32::from(velocity) / 127.0 * VELOCITY_SCALE);
            Some(SynthMessage::NoteOn {
                note: u32::from(key),
                voice,
                params,
            })
        }
        MidiEvent::ControlChange {
            controller: ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff),
        _ => None,
    }
}
