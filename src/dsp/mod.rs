//! Low-level DSP primitives used by the voice palette.
//!
//! Everything here is allocation-free once constructed, so the primitives can
//! live directly inside voice structs that are recycled by the voice pool.
//! They only know about samples and sample rates; parameter names, note
//! lifecycles and retirement are handled one layer up.

/// Band-passed noise bursts for hats and snares.
pub mod burst;
/// Exponential decay curves.
pub mod decay;
/// Fixed-capacity delay line.
pub mod delay;
/// Segment envelope generator (ADSR and one-shot AD).
pub mod envelope;
/// State-variable filter and short averaging filters.
pub mod filter;
/// One-pole magnitude follower.
pub mod follower;
/// Oscillators and noise sources.
pub mod oscillator;
/// Equal-power stereo placement.
pub mod pan;

pub use envelope::{Envelope, EnvelopeState};
