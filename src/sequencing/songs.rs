//! Demo songs, written as data.
//!
//! Each function returns a [`Score`] ready for
//! [`SynthEngine::load_score`](crate::SynthEngine::load_score) or
//! [`SynthHandle::schedule_score`](crate::SynthHandle::schedule_score).

use super::{notes::*, score::Score, tempo::Tempo};
use crate::{
    synth::NoteParams,
    voices::{FM, HIHAT, KICK, PLUCK, SINE_ENV, SNARE, SQUARE_WAVE},
};

/// Every song starts one second in, leaving the audio device time to settle.
const LEAD_IN: f64 = 1.0;

/// Chord per measure: `(frequency, amplitude)` for each sine voice.
const G_CHORDS: [[(f32, f32); 3]; 4] = [
    [(D4, 0.05), (B3, 0.05), (G3, 0.07)],
    [(E4, 0.05), (C4, 0.05), (G3, 0.07)],
    [(D4, 0.05), (G4, 0.05), (B3, 0.07)],
    [(A4, 0.05), (E4, 0.05), (C4, 0.07)],
];

/// Arpeggio tones per measure, played in the order of `ARP_SHAPE`.
const G_ARPEGGIOS: [[f32; 3]; 4] = [
    [B4, D5, G5],
    [C5, E5, A5],
    [D5, G5, B5],
    [E5, A5, C6],
];
const ARP_SHAPE: [usize; 4] = [0, 1, 2, 1];

/// Four bars in G at 105 BPM: sustained sine chords under a plucked
/// sixteenth-note arpeggio.
pub fn arpeggio_in_g() -> Score {
    let tempo = Tempo::new(105.0);
    let mut score = Score::new();

    for (measure, chord) in G_CHORDS.iter().enumerate() {
        let time = LEAD_IN + tempo.at(measure as u32, 0.0);
        for &(frequency, amplitude) in chord {
            score.note(
                SINE_ENV,
                time,
                tempo.whole(),
                NoteParams::new()
                    .with("amplitude", amplitude)
                    .with("frequency", frequency)
                    .with("attackTime", 0.2)
                    .with("releaseTime", 0.2),
            );
        }
    }

    for (measure, tones) in G_ARPEGGIOS.iter().enumerate() {
        for step in 0..16 {
            let frequency = tones[ARP_SHAPE[step % ARP_SHAPE.len()]];
            let time = LEAD_IN + tempo.at(measure as u32, step as f64 * 0.25);
            score.note(
                PLUCK,
                time,
                tempo.sixteenth(),
                NoteParams::new()
                    .with("frequency", frequency)
                    .with("amplitude", 0.07),
            );
        }
    }

    score
}

const KICK_STEPS: &str = "x---x---x---x---";
const SNARE_STEPS: &str = "----x-------x---";
const HIHAT_STEPS: &str = "x-x-x-x-x-x-xxx-";

/// FM stab per measure: `(freq, idx2)`.
const STABS: [(f32, f32); 4] = [(A3, 7.0), (F3, 5.0), (C4, 6.0), (G3, 8.0)];

/// Four bars of kick/snare/hi-hat at 120 BPM with an FM stab on each
/// downbeat.
pub fn drum_groove() -> Score {
    let tempo = Tempo::new(120.0);
    let mut score = Score::new();

    for measure in 0..4 {
        let bar = LEAD_IN + tempo.at(measure, 0.0);
        steps(&mut score, &tempo, bar, KICK_STEPS, |score, time| {
            score.note(KICK, time, 0.3, NoteParams::new().with("amplitude", 0.7));
        });
        steps(&mut score, &tempo, bar, SNARE_STEPS, |score, time| {
            score.note(SNARE, time, 0.2, NoteParams::new());
        });
        steps(&mut score, &tempo, bar, HIHAT_STEPS, |score, time| {
            score.note(HIHAT, time, 0.05, NoteParams::new());
        });

        let (freq, idx2) = STABS[measure as usize];
        score.note(
            FM,
            bar,
            tempo.half(),
            NoteParams::new()
                .with("freq", freq)
                .with("amplitude", 0.2)
                .with("idx2", idx2)
                .with("attackTime", 0.01)
                .with("releaseTime", 0.3),
        );
    }

    score
}

/// Square-wave lead: `(measure, beat, frequency, length in beats)`.
const LOON_LEAD: [(u32, f64, f32, f64); 47] = [
    (0, 0.75, G4, 0.125),
    (0, 1.0, Gs4, 0.1875),
    (0, 1.75, As4, 0.125),
    (0, 2.0, B4, 0.1875),
    (0, 2.75, Cs5, 0.125),
    (0, 3.0, Ds5, 0.1875),
    (0, 3.75, E5, 0.125),
    (1, 0.0, Ds5, 1.0),
    (1, 1.0, B4, 1.0),
    (1, 2.0, Ds5, 1.0),
    (1, 3.0, B4, 1.0),
    (2, 0.75, Ds5, 0.125),
    (2, 1.0, D5, 0.1875),
    (2, 1.75, Ds5, 0.125),
    (2, 2.0, D5, 0.1875),
    (2, 2.75, Ds5, 0.125),
    (2, 3.0, D5, 0.1875),
    (2, 3.75, Ds5, 0.125),
    (3, 0.0, B4, 0.5),
    (3, 1.0, Gs4, 0.5),
    (3, 1.5, Gs4, 0.5),
    (3, 2.0, Cs5, 0.5),
    (3, 2.5, B4, 0.5),
    (3, 3.0, Gs4, 0.5),
    (3, 3.5, Fs4, 0.5),
    (4, 0.0, Gs4, 0.5),
    (4, 0.75, G4, 0.125),
    (4, 1.0, Gs4, 0.1875),
    (4, 1.75, As4, 0.125),
    (4, 2.0, B4, 0.1875),
    (4, 2.75, Cs5, 0.125),
    (4, 3.0, Ds5, 0.1875),
    (4, 3.75, E5, 0.125),
    (5, 0.0, Ds5, 1.0),
    (5, 1.0, B4, 1.0),
    (5, 2.0, Ds5, 1.0),
    (5, 3.0, B4, 1.0),
    (6, 0.75, Gs5, 0.125),
    (6, 1.0, Fs5, 0.1875),
    (6, 1.75, Ds5, 0.125),
    (6, 2.0, Cs5, 0.1875),
    (6, 2.75, Fs5, 0.125),
    (6, 3.0, Ds5, 0.1875),
    (6, 3.75, B4, 0.125),
    (7, 0.0, Gs4, 1.5),
    (7, 2.0, B4, 1.0),
    (7, 3.0, Gs4, 1.0),
];

/// Eighth-note bass riff for measures 1 through 7.
const LOON_RIFF: [[f32; 8]; 7] = [
    [Gs2, Gs2, B2, Gs2, D3, Ds2, Fs2, G2],
    [Gs2, Gs2, B2, Gs2, D3, Ds3, Cs3, B2],
    [E3, E3, Gs3, B3, Cs4, D4, Cs4, B4],
    [E3, E3, Gs3, B3, Ds3, Ds3, G3, As3],
    [Gs2, Gs2, B2, Gs2, D3, Ds2, Fs2, G2],
    [Gs2, Gs2, B2, Gs2, D3, Ds3, Cs3, B2],
    [E3, E3, Gs3, B3, Cs4, D4, Cs4, B4],
];

/// The sine bass doubles the downbeat of measure 5 an octave up.
const LOON_RIFF_OCTAVE: (u32, f32) = (5, Gs3);

/// The pluck carries the riff one bar further, repeating its fourth bar.
const LOON_PLUCK_TAIL: usize = 3;

/// The opening section of "Loonboon" at 150 BPM: a square-wave lead, a
/// sine bass and a plucked copy of the same riff over a kick and hi-hat
/// pattern, ending in a hi-hat build-up.
pub fn loonboon() -> Score {
    let tempo = Tempo::new(150.0);
    let mut score = Score::new();

    for &(measure, beat, frequency, beats) in &LOON_LEAD {
        score.note(
            SQUARE_WAVE,
            LEAD_IN + tempo.at(measure, beat),
            beats * tempo.beat(),
            NoteParams::new()
                .with("frequency", frequency)
                .with("amplitude", 0.12)
                .with("attackTime", 0.07)
                .with("releaseTime", 0.4),
        );
    }

    let bass = |frequency: f32| {
        NoteParams::new()
            .with("frequency", frequency)
            .with("amplitude", 0.09)
            .with("attackTime", 0.03)
            .with("releaseTime", 0.3)
    };
    let pluck = |frequency: f32| {
        NoteParams::new()
            .with("frequency", frequency)
            .with("amplitude", 0.06)
    };

    for (i, bar) in LOON_RIFF.iter().enumerate() {
        let measure = i as u32 + 1;
        for (step, &frequency) in bar.iter().enumerate() {
            let time = LEAD_IN + tempo.at(measure, step as f64 * 0.5);
            score.note(SINE_ENV, time, tempo.eighth(), bass(frequency));
            score.note(PLUCK, time, tempo.eighth(), pluck(frequency));
        }
    }
    let (measure, frequency) = LOON_RIFF_OCTAVE;
    score.note(
        SINE_ENV,
        LEAD_IN + tempo.at(measure, 0.0),
        tempo.eighth(),
        bass(frequency),
    );
    let tail = LOON_RIFF.len() as u32 + 1;
    for (step, &frequency) in LOON_RIFF[LOON_PLUCK_TAIL].iter().enumerate() {
        let time = LEAD_IN + tempo.at(tail, step as f64 * 0.5);
        score.note(PLUCK, time, tempo.eighth(), pluck(frequency));
    }

    let kick = NoteParams::new()
        .with("amplitude", 0.25)
        .with("frequency", 150.0);
    let hat = |score: &mut Score, time: f64| {
        score.note(HIHAT, time, 0.3, NoteParams::new());
    };

    // Each drum figure spans two measures, so consecutive ones overlap.
    for measure in 1..=8 {
        for beat in 0..4 {
            let time = LEAD_IN + tempo.at(measure, beat as f64);
            score.note(KICK, time, 0.5, kick);
        }
        for (bar, beat) in [(0, 1.0), (0, 3.0), (1, 1.0), (1, 3.0)] {
            hat(&mut score, LEAD_IN + tempo.at(measure + bar, beat));
        }
    }

    for beat in [0.0, 1.0, 2.0, 3.0] {
        hat(&mut score, LEAD_IN + tempo.at(14, beat));
    }
    for beat in [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5] {
        hat(&mut score, LEAD_IN + tempo.at(15, beat));
    }

    score
}

/// Call `place` at each `x` of a sixteenth-note step string.
fn steps(
    score: &mut Score,
    tempo: &Tempo,
    bar: f64,
    pattern: &str,
    mut place: impl FnMut(&mut Score, f64),
) {
    let step = tempo.sixteenth();
    for (i, hit) in pattern.bytes().enumerate() {
        if hit == b'x' {
            place(score, bar + i as f64 * step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arpeggio_layout() {
        let score = arpeggio_in_g();
        let sines = score.iter().filter(|n| n.voice == SINE_ENV).count();
        let plucks = score.iter().filter(|n| n.voice == PLUCK).count();
        assert_eq!((sines, plucks), (12, 64));

        let first = score.iter().find(|n| n.voice == PLUCK).unwrap();
        assert_eq!(first.time, LEAD_IN);
        assert_eq!(first.params.get("frequency"), Some(B4));

        let tempo = Tempo::new(105.0);
        assert!((score.end_time() - (LEAD_IN + 4.0 * tempo.measure())).abs() < 1e-9);
    }

    #[test]
    fn groove_layout() {
        let score = drum_groove();
        let count = |kind| score.iter().filter(|n| n.voice == kind).count();
        assert_eq!(count(KICK), 16);
        assert_eq!(count(SNARE), 8);
        assert_eq!(count(HIHAT), 36);
        assert_eq!(count(FM), 4);
    }
    #[test]
    fn loonboon_layout() {
        let score = loonboon();
        let count = |kind| score.iter().filter(|n| n.voice == kind).count();
        assert_eq!(count(SQUARE_WAVE), 47);
        assert_eq!(count(SINE_ENV), 57);
        assert_eq!(count(PLUCK), 65);
        assert_eq!(count(KICK), 32);
        assert_eq!(count(HIHAT), 44);

        let tempo = Tempo::new(150.0);
        let lead = score.iter().find(|n| n.voice == SQUARE_WAVE).unwrap();
        assert!((lead.time - (LEAD_IN + 0.75 * tempo.beat())).abs() < 1e-9);
        assert_eq!(lead.params.get("frequency"), Some(G4));

        let last_hat = score
            .iter()
            .filter(|n| n.voice == HIHAT)
            .map(|n| n.time)
            .fold(0.0, f64::max);
        assert!((last_hat - (LEAD_IN + tempo.at(15, 3.5))).abs() < 1e-9);
    }

    #[test]
    fn loonboon_bass_and_pluck_share_the_riff() {
        let score = loonboon();
        let at = |kind, time: f64| {
            score
                .iter()
                .filter(|n| n.voice == kind && (n.time - time).abs() < 1e-9)
                .filter_map(|n| n.params.get("frequency"))
                .collect::<Vec<_>>()
        };
        let tempo = Tempo::new(150.0);
        let bar_three = LEAD_IN + tempo.at(3, 2.5);
        assert_eq!(at(SINE_ENV, bar_three), vec![D4]);
        assert_eq!(at(PLUCK, bar_three), vec![D4]);

        let mut doubled = at(SINE_ENV, LEAD_IN + tempo.at(5, 0.0));
        doubled.sort_by(f32::total_cmp);
        assert_eq!(doubled, vec![Gs2, Gs3]);

        assert_eq!(at(PLUCK, LEAD_IN + tempo.at(8, 3.5)), vec![As3]);
        assert!(at(SINE_ENV, LEAD_IN + tempo.at(8, 3.5)).is_empty());
    }
}
