// Purpose: the voice contract, trigger parameters and control messages.
// The engine layer owns voices through this contract; the palette in
// `voices` implements it.

pub mod block;
pub mod factory;
pub mod message;
pub mod params;
pub mod voice;

pub use block::StereoBlock;
pub use factory::VoiceFactory;
pub use message::{NoteId, SynthMessage, When};
pub use params::{NoteParams, Param, ParamSet};
pub use voice::{RetirePolicy, Voice, VoiceKind, VoiceSnapshot};
