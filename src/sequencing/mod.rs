#[allow(non_upper_case_globals)]
pub mod notes;
pub mod score;
pub mod songs;
pub mod tempo;

pub use score::{Score, ScoreNote};
pub use tempo::Tempo;
