//! Pre-built voices for common sounds.
//!
//! Each voice implements [`Voice`](crate::synth::Voice) and declares its
//! parameters by name, so scores and live input address them the same way.
//! Use these as starting points for your own sounds, or study them to learn
//! how different timbres are built.
//!
//! # Example
//!
//! ```
//! use voicelab::{engine::VoicePool, voices};
//!
//! let mut pool = VoicePool::new(48_000.0);
//! voices::register_all(&mut pool);
//! assert!(pool.is_registered(voices::PLUCK));
//! ```

mod additive;
mod fm;
mod hihat;
mod kick;
mod pluck;
mod snare;

pub use additive::Additive;
pub use fm::Fm;
pub use hihat::Hihat;
pub use kick::Kick;
pub use pluck::Pluck;
pub use snare::Snare;

use crate::{engine::VoicePool, synth::VoiceKind};

pub const SINE_ENV: VoiceKind = VoiceKind::new("SineEnv");
pub const SQUARE_WAVE: VoiceKind = VoiceKind::new("SquareWave");
pub const FM: VoiceKind = VoiceKind::new("FM");
pub const PLUCK: VoiceKind = VoiceKind::new("Pluck");
pub const KICK: VoiceKind = VoiceKind::new("Kick");
pub const SNARE: VoiceKind = VoiceKind::new("Snare");
pub const HIHAT: VoiceKind = VoiceKind::new("Hihat");

/// Every built-in kind, in registration order.
pub const ALL: [VoiceKind; 7] = [SINE_ENV, SQUARE_WAVE, FM, PLUCK, KICK, SNARE, HIHAT];

/// Register factories for the whole palette.
pub fn register_all(pool: &mut VoicePool) {
    pool.register(SINE_ENV, Additive::sine_env);
    pool.register(SQUARE_WAVE, Additive::square_wave);
    pool.register(FM, Fm::new);
    pool.register(PLUCK, Pluck::new);
    pool.register(KICK, Kick::new);
    pool.register(SNARE, Snare::new);
    pool.register(HIHAT, Hihat::new);
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::synth::{NoteParams, ParamSet, StereoBlock, Voice};

    /// Trigger `voice` with its defaults plus `overrides`, hold for `hold`
    /// seconds, release, and render until done or `limit` seconds pass.
    /// Returns the mono output and whether the voice finished.
    pub(crate) fn play(
        voice: &mut dyn Voice,
        sample_rate: f32,
        overrides: NoteParams,
        hold: f32,
        limit: f32,
    ) -> (Vec<f32>, bool) {
        let mut params = ParamSet::new();
        voice.init(&mut params);
        params.apply(&overrides);
        voice.trigger_on(&params);

        let block = 64;
        let hold_blocks = (hold * sample_rate) as usize / block;
        let limit_blocks = (limit * sample_rate) as usize / block;
        let mut out = Vec::with_capacity(limit_blocks * block);
        let (mut left, mut right) = (vec![0.0; block], vec![0.0; block]);

        for n in 0..limit_blocks {
            if n == hold_blocks {
                voice.trigger_off();
            }
            left.fill(0.0);
            right.fill(0.0);
            voice.process(&mut StereoBlock::new(&mut left, &mut right));
            out.extend(left.iter().zip(&right).map(|(l, r)| 0.5 * (l + r)));
            if voice.is_done() {
                return (out, true);
            }
        }
        (out, false)
    }

    pub(crate) fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()))
    }
}
