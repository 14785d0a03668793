use crate::synth::{NoteParams, VoiceKind};

/// One note of a score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreNote {
    /// Which voice kind plays it
    pub voice: VoiceKind,
    /// Trigger time in seconds from the start of the score
    pub time: f64,
    /// Seconds until the note is released
    pub duration: f64,
    /// Parameter overrides on top of the voice's defaults
    pub params: NoteParams,
}

/// A piece of music as data: `(voice, time, duration, parameters)` rows.
///
/// Notes keep the order they were added in; the sequencer sorts by time
/// when they are scheduled, so a score can be written voice by voice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    notes: Vec<ScoreNote>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note
    pub fn note(
        &mut self,
        voice: VoiceKind,
        time: f64,
        duration: f64,
        params: NoteParams,
    ) -> &mut Self {
        self.notes.push(ScoreNote {
            voice,
            time,
            duration,
            params,
        });
        self
    }

    pub fn push(&mut self, note: ScoreNote) {
        self.notes.push(note);
    }

    /// Copy every note of `other` in, shifted by `offset` seconds
    pub fn append(&mut self, other: &Score, offset: f64) -> &mut Self {
        self.notes.extend(other.notes.iter().map(|note| ScoreNote {
            time: note.time + offset,
            ..*note
        }));
        self
    }

    /// Shift the whole score by `seconds`
    pub fn offset(mut self, seconds: f64) -> Self {
        for note in &mut self.notes {
            note.time += seconds;
        }
        self
    }

    pub fn notes(&self) -> &[ScoreNote] {
        &self.notes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreNote> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Time the last note is released, or the last onset if every note
    /// is held indefinitely. Zero for an empty score.
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(|note| {
                if note.duration.is_finite() {
                    note.time + note.duration.max(0.0)
                } else {
                    note.time
                }
            })
            .fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a Score {
    type Item = &'a ScoreNote;
    type IntoIter = std::slice::Iter<'a, ScoreNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}
