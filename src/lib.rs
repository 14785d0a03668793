pub mod dsp;
pub mod engine; // Voice pool, event sequencer, render graph
pub mod error;
pub mod io;
pub mod sequencing; // Scores, pitches and tempo arithmetic
pub mod synth; // Voice contract and trigger parameters
pub mod voices;

pub use engine::{EngineConfig, EngineStats, SynthEngine, SynthHandle};
pub use error::{EngineError, PoolError};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
