/*
Pitch Constants
===============

Equal-tempered frequencies in Hz, A4 = 440, for the range the voice
palette covers comfortably (C2 to B6). Scores pass these straight into a
voice's `frequency` (or `freq`) parameter.

Naming Convention:
- Natural notes: C4, D4, E4, etc.
- Sharps: Cs4 (C#4), Fs4 (F#4), etc.

For anything outside the table, `midi_to_freq` converts a MIDI note number
(middle C = 60).
*/

// Octave 2
pub const C2: f32 = 65.41;
pub const Cs2: f32 = 69.30;
pub const D2: f32 = 73.42;
pub const Ds2: f32 = 77.78;
pub const E2: f32 = 82.41;
pub const F2: f32 = 87.31;
pub const Fs2: f32 = 92.50;
pub const G2: f32 = 98.00;
pub const Gs2: f32 = 103.83;
pub const A2: f32 = 110.00;
pub const As2: f32 = 116.54;
pub const B2: f32 = 123.47;

// Octave 3
pub const C3: f32 = 130.81;
pub const Cs3: f32 = 138.59;
pub const D3: f32 = 146.83;
pub const Ds3: f32 = 155.56;
pub const E3: f32 = 164.81;
pub const F3: f32 = 174.61;
pub const Fs3: f32 = 185.00;
pub const G3: f32 = 196.00;
pub const Gs3: f32 = 207.65;
pub const A3: f32 = 220.00;
pub const As3: f32 = 233.08;
pub const B3: f32 = 246.94;

// Octave 4
pub const C4: f32 = 261.63;
pub const Cs4: f32 = 277.18;
pub const D4: f32 = 293.66;
pub const Ds4: f32 = 311.13;
pub const E4: f32 = 329.63;
pub const F4: f32 = 349.23;
pub const Fs4: f32 = 369.99;
pub const G4: f32 = 392.00;
pub const Gs4: f32 = 415.30;
pub const A4: f32 = 440.00;
pub const As4: f32 = 466.16;
pub const B4: f32 = 493.88;

// Octave 5
pub const C5: f32 = 523.25;
pub const Cs5: f32 = 554.37;
pub const D5: f32 = 587.33;
pub const Ds5: f32 = 622.25;
pub const E5: f32 = 659.26;
pub const F5: f32 = 698.46;
pub const Fs5: f32 = 739.99;
pub const G5: f32 = 783.99;
pub const Gs5: f32 = 830.61;
pub const A5: f32 = 880.00;
pub const As5: f32 = 932.33;
pub const B5: f32 = 987.77;

// Octave 6
pub const C6: f32 = 1046.50;
pub const Cs6: f32 = 1108.73;
pub const D6: f32 = 1174.66;
pub const Ds6: f32 = 1244.51;
pub const E6: f32 = 1318.51;
pub const F6: f32 = 1396.91;
pub const Fs6: f32 = 1479.98;
pub const G6: f32 = 1567.98;
pub const Gs6: f32 = 1661.22;
pub const A6: f32 = 1760.00;
pub const As6: f32 = 1864.66;
pub const B6: f32 = 1975.53;

/// Frequency in Hz of a MIDI note number (A4 = 69 = 440 Hz).
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((f32::from(note) - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_midi_formula() {
        assert_eq!(midi_to_freq(69), 440.0);
        assert!((midi_to_freq(60) - C4).abs() < 0.01);
        assert!((midi_to_freq(66) - Fs4).abs() < 0.01);
        assert!((B6 / B5 - 2.0).abs() < 1e-3);
    }
}
