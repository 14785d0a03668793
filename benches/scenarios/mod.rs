//! Real-world scenario benchmarks.
//!
//! Single palette voices at their default settings, and whole engine
//! renders at increasing polyphony.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
