use super::voice::Voice;

/// Builds fresh voices of one kind.
///
/// This is the "instrument design" layer: the sound is configured once and
/// the pool calls the factory whenever it needs another copy. Any
/// `Fn(sample_rate) -> impl Voice` closure is a factory.
pub trait VoiceFactory: Send {
    fn create_voice(&self, sample_rate: f32) -> Box<dyn Voice>;
}

impl<F, V> VoiceFactory for F
where
    F: Fn(f32) -> V + Send,
    V: Voice + 'static,
{
    fn create_voice(&self, sample_rate: f32) -> Box<dyn Voice> {
        Box::new(self(sample_rate))
    }
}
