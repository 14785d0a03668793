use thiserror::Error;

use crate::synth::VoiceKind;

/// Why the pool could not hand out a voice.
///
/// These never cross into the audio callback's caller: the engine counts
/// them as dropped notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("no factory registered for voice kind `{0}`")]
    UnknownVoice(VoiceKind),

    #[error("all {cap} `{kind}` voices are busy")]
    Exhausted { kind: VoiceKind, cap: usize },
}

/// Errors surfaced to the control side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("control queue is full ({capacity} messages)")]
    QueueFull { capacity: usize },

    #[error(transparent)]
    Pool(#[from] PoolError),
}
