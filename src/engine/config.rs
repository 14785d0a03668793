use super::allocator::OverflowPolicy;

/// Engine construction parameters.
///
/// ```
/// use voicelab::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_sample_rate(44_100.0)
///     .with_max_voices(Some(8));
/// assert_eq!(config.max_voices, Some(8));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Preferred callback size in frames; also the chunk size of
    /// `render_mono`.
    pub block_size: usize,
    /// Hard cap per voice kind. `None` lets the pool grow without bound.
    pub max_voices: Option<usize>,
    pub overflow: OverflowPolicy,
    /// Capacity of the control ring between handle and engine.
    pub queue_capacity: usize,
    /// Events reserved up front in the sequencer queue.
    pub event_capacity: usize,
    /// Voices created per kind at registration time.
    pub preallocate: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_size: 512,
            max_voices: Some(16),
            overflow: OverflowPolicy::StealOldest,
            queue_capacity: 1024,
            event_capacity: 4096,
            preallocate: 4,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.clamp(1, crate::MAX_BLOCK_SIZE);
        self
    }

    pub fn with_max_voices(mut self, max_voices: Option<usize>) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn with_preallocate(mut self, count: usize) -> Self {
        self.preallocate = count;
        self
    }
}
