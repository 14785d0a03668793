// Purpose: the real-time half of the synth. The engine owns the voice pool
// and the sequencer and is moved into the audio callback; the handle is
// the control side of the ring buffer that feeds it.

pub mod allocator;
pub mod config;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

use rtrb::{Consumer, Producer, RingBuffer};

pub use self::{
    allocator::{OverflowPolicy, VoiceId, VoicePool},
    config::EngineConfig,
    scheduler::{Advance, ScheduledEvent, Sequencer},
};
use crate::{
    error::EngineError,
    sequencing::score::Score,
    synth::{
        NoteId, NoteParams, StereoBlock, SynthMessage, VoiceFactory, VoiceKind, VoiceSnapshot,
        When,
    },
    voices,
};

/// Point-in-time engine counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineStats {
    pub clock: f64,
    pub active_voices: usize,
    pub pending_events: usize,
    pub dropped_notes: u64,
}

/// The render graph.
///
/// Once per callback it drains control messages, then walks the block in
/// sub-blocks split at event boundaries: advance the clock, render every
/// active voice into the sub-block, retire the voices that finished. No
/// locks are taken; allocation happens only if the pool has to grow or the
/// event queue outgrows its reserved capacity.
pub struct SynthEngine {
    config: EngineConfig,
    pool: VoicePool,
    sequencer: Sequencer,
    rx: Consumer<SynthMessage>,
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
}

impl SynthEngine {
    /// An engine with no voice kinds registered, plus its control handle.
    pub fn new(config: EngineConfig) -> (Self, SynthHandle) {
        let (tx, rx) = RingBuffer::new(config.queue_capacity);
        let pool = VoicePool::new(config.sample_rate)
            .with_max_voices(config.max_voices)
            .with_overflow(config.overflow);
        let scratch = config.block_size.clamp(1, crate::MAX_BLOCK_SIZE);

        tracing::info!(
            sample_rate = config.sample_rate,
            max_voices = ?config.max_voices,
            overflow = ?config.overflow,
            "synth engine created"
        );

        let handle = SynthHandle {
            tx,
            capacity: config.queue_capacity,
        };
        let engine = Self {
            sequencer: Sequencer::with_capacity(config.event_capacity),
            pool,
            rx,
            scratch_left: vec![0.0; scratch],
            scratch_right: vec![0.0; scratch],
            config,
        };
        (engine, handle)
    }

    /// An engine with the whole built-in palette registered and
    /// preallocated.
    pub fn with_default_voices(config: EngineConfig) -> (Self, SynthHandle) {
        let (mut engine, handle) = Self::new(config);
        voices::register_all(&mut engine.pool);
        let kinds: Vec<VoiceKind> = engine.pool.kinds().collect();
        for kind in kinds {
            engine.preallocate(kind, engine.config.preallocate);
        }
        (engine, handle)
    }

    /// Register a voice kind and preallocate `config.preallocate` of it.
    pub fn register<F>(&mut self, kind: VoiceKind, factory: F)
    where
        F: VoiceFactory + 'static,
    {
        self.pool.register(kind, factory);
        self.preallocate(kind, self.config.preallocate);
    }

    pub fn preallocate(&mut self, kind: VoiceKind, count: usize) -> usize {
        match self.pool.preallocate(kind, count) {
            Ok(created) => created,
            Err(err) => {
                tracing::warn!(%kind, %err, "preallocation failed");
                0
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut VoicePool {
        &mut self.pool
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Schedule every note of `score` directly, bypassing the control ring.
    /// Meant for setup before the engine moves to the audio thread.
    pub fn load_score(&mut self, score: &Score) -> usize {
        for note in score.iter() {
            self.sequencer
                .schedule(note.voice, note.time, note.duration, note.params);
        }
        tracing::info!(
            notes = score.len(),
            end = score.end_time(),
            "score loaded"
        );
        score.len()
    }

    /// Render one stereo block. Both channels are overwritten.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let mut block = StereoBlock::new(&mut left[..frames], &mut right[..frames]);
        self.render_block(&mut block);
    }

    /// Render a mono mixdown, `(left + right) / 2`.
    pub fn render_mono(&mut self, out: &mut [f32]) {
        let mut left = std::mem::take(&mut self.scratch_left);
        let mut right = std::mem::take(&mut self.scratch_right);
        let chunk_size = left.len().max(1);

        for chunk in out.chunks_mut(chunk_size) {
            let frames = chunk.len();
            self.render(&mut left[..frames], &mut right[..frames]);
            for ((o, l), r) in chunk.iter_mut().zip(&left).zip(&right) {
                *o = 0.5 * (l + r);
            }
        }

        self.scratch_left = left;
        self.scratch_right = right;
    }

    fn render_block(&mut self, block: &mut StereoBlock<'_>) {
        block.fill(0.0);
        self.drain_messages();

        let frames = block.frames();
        let sample_rate = f64::from(self.config.sample_rate);
        let mut offset = 0;
        while offset < frames {
            let remaining = frames - offset;
            let span = self
                .sequencer
                .next_event_in_frames(sample_rate)
                .map_or(remaining, |n| n.clamp(1, remaining));

            self.sequencer
                .advance(span as f64 / sample_rate, &mut self.pool);

            let mut sub = block.slice(offset, span);
            self.pool.for_each_active(|_, voice| voice.process(&mut sub));
            self.pool.retire_finished();

            offset += span;
        }
    }

    /// Apply every queued control message. Called at the top of `render`.
    pub fn drain_messages(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(message) = self.rx.pop() {
            self.apply(message);
            drained += 1;
        }
        drained
    }

    fn apply(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::Schedule {
                voice,
                when,
                duration,
                params,
            } => match when {
                When::At(time) => self.sequencer.schedule(voice, time, duration, params),
                When::FromNow(offset) => self
                    .sequencer
                    .schedule_from_now(voice, offset, duration, params),
            },
            SynthMessage::NoteOn {
                note,
                voice,
                params,
            } => self.sequencer.note_on(note, voice, params),
            SynthMessage::NoteOff { note } => self.sequencer.note_off(note),
            SynthMessage::AllNotesOff => self.sequencer.all_notes_off(),
        }
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            clock: self.sequencer.clock(),
            active_voices: self.pool.active_count(),
            pending_events: self.sequencer.pending(),
            dropped_notes: self.sequencer.dropped(),
        }
    }

    /// See [`VoicePool::snapshots_into`].
    pub fn write_snapshots(&self, out: &mut [VoiceSnapshot]) -> usize {
        self.pool.snapshots_into(out)
    }
}

/// Control side of the engine, for the UI or any other non-real-time
/// thread. Every method is a non-blocking push onto the ring buffer.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
    capacity: usize,
}

impl SynthHandle {
    pub fn send(&mut self, message: SynthMessage) -> Result<(), EngineError> {
        self.tx.push(message).map_err(|_| {
            tracing::warn!(capacity = self.capacity, "control queue full, message dropped");
            EngineError::QueueFull {
                capacity: self.capacity,
            }
        })
    }

    /// Schedule at an absolute virtual time.
    pub fn schedule_note(
        &mut self,
        voice: VoiceKind,
        time: f64,
        duration: f64,
        params: NoteParams,
    ) -> Result<(), EngineError> {
        self.send(SynthMessage::Schedule {
            voice,
            when: When::At(time),
            duration,
            params,
        })
    }

    /// Schedule relative to the engine clock when the message is drained.
    pub fn schedule_note_from_now(
        &mut self,
        voice: VoiceKind,
        offset: f64,
        duration: f64,
        params: NoteParams,
    ) -> Result<(), EngineError> {
        self.send(SynthMessage::Schedule {
            voice,
            when: When::FromNow(offset),
            duration,
            params,
        })
    }

    /// Start a held note, released by [`trigger_off`](Self::trigger_off)
    /// with the same id.
    pub fn trigger_on(
        &mut self,
        note: NoteId,
        voice: VoiceKind,
        params: NoteParams,
    ) -> Result<(), EngineError> {
        self.send(SynthMessage::NoteOn {
            note,
            voice,
            params,
        })
    }

    pub fn trigger_off(&mut self, note: NoteId) -> Result<(), EngineError> {
        self.send(SynthMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<(), EngineError> {
        self.send(SynthMessage::AllNotesOff)
    }

    /// Queue every note of `score` at its absolute time. Stops at the first
    /// full-queue error; returns how many notes were sent.
    pub fn schedule_score(&mut self, score: &Score) -> Result<usize, EngineError> {
        for (sent, note) in score.iter().enumerate() {
            self.schedule_note(note.voice, note.time, note.duration, note.params)
                .map_err(|err| {
                    tracing::warn!(sent, total = score.len(), "score only partly queued");
                    err
                })?;
        }
        Ok(score.len())
    }

    /// Messages that can be pushed before the queue is full.
    pub fn free_slots(&self) -> usize {
        self.tx.slots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testing::{TestVoice, TEST_VOICE};

    fn engine(block_size: usize) -> (SynthEngine, SynthHandle) {
        let config = EngineConfig::default()
            .with_sample_rate(1_000.0)
            .with_block_size(block_size)
            .with_preallocate(2);
        let (mut engine, handle) = SynthEngine::new(config);
        engine.register(TEST_VOICE, |_sr| TestVoice::new(0));
        (engine, handle)
    }

    fn first_nonzero(buffer: &[f32]) -> Option<usize> {
        buffer.iter().position(|&s| s != 0.0)
    }

    #[test]
    fn onset_is_sample_accurate_inside_a_block() {
        let (mut engine, _handle) = engine(64);
        engine
            .sequencer_mut()
            .schedule(TEST_VOICE, 0.0205, 0.01, NoteParams::new());

        let (mut left, mut right) = (vec![1.0; 64], vec![1.0; 64]);
        engine.render(&mut left, &mut right);

        assert_eq!(first_nonzero(&left), Some(20));
        assert_eq!(left[20..30], [0.5; 10]);
        assert!(left[30..].iter().all(|&s| s == 0.0), "release cut at 30");
        assert_eq!(engine.stats().active_voices, 0);
    }

    #[test]
    fn handle_messages_apply_on_next_render() {
        let (mut engine, mut handle) = engine(32);
        handle
            .trigger_on(1, TEST_VOICE, NoteParams::new().with("amplitude", 0.25))
            .unwrap();

        let mut out = vec![0.0; 32];
        engine.render_mono(&mut out);
        assert_eq!(out[0], 0.25);
        assert_eq!(engine.stats().active_voices, 1);

        handle.trigger_off(1).unwrap();
        engine.render_mono(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(engine.stats().active_voices, 0);
    }

    #[test]
    fn all_notes_off_releases_everything() {
        let (mut engine, mut handle) = engine(32);
        for note in 0..3 {
            handle.trigger_on(note, TEST_VOICE, NoteParams::new()).unwrap();
        }
        let mut out = vec![0.0; 32];
        engine.render_mono(&mut out);
        assert_eq!(engine.stats().active_voices, 3);

        handle.all_notes_off().unwrap();
        engine.render_mono(&mut out);
        assert_eq!(engine.stats().active_voices, 0);
    }

    #[test]
    fn all_notes_off_catches_notes_sent_just_before() {
        let (mut engine, mut handle) = engine(32);
        handle
            .trigger_on(1, TEST_VOICE, NoteParams::new().with("amplitude", 0.25))
            .unwrap();
        handle
            .schedule_note_from_now(TEST_VOICE, 0.0, 10.0, NoteParams::new())
            .unwrap();
        handle.all_notes_off().unwrap();

        let mut out = vec![0.0; 32];
        engine.render_mono(&mut out);
        assert_eq!(engine.stats().active_voices, 0);

        engine.render_mono(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn full_queue_reports_back_pressure() {
        let config = EngineConfig::default().with_queue_capacity(2);
        let (_engine, mut handle) = SynthEngine::new(config);
        handle.all_notes_off().unwrap();
        handle.all_notes_off().unwrap();
        assert_eq!(handle.free_slots(), 0);
        assert_eq!(
            handle.all_notes_off(),
            Err(EngineError::QueueFull { capacity: 2 })
        );
    }

    #[test]
    fn from_now_is_relative_to_the_drain_time() {
        let (mut engine, mut handle) = engine(100);
        let mut out = vec![0.0; 100];
        engine.render_mono(&mut out);

        handle
            .schedule_note_from_now(TEST_VOICE, 0.05, 1.0, NoteParams::new())
            .unwrap();
        engine.render_mono(&mut out);
        assert_eq!(first_nonzero(&out), Some(50));
    }

    #[test]
    fn render_mono_spans_multiple_chunks() {
        let (mut engine, _handle) = engine(16);
        engine
            .sequencer_mut()
            .schedule(TEST_VOICE, 0.0405, 0.010, NoteParams::new());
        let mut out = vec![0.0; 100];
        engine.render_mono(&mut out);
        assert_eq!(first_nonzero(&out), Some(40));
        assert_eq!(out.iter().filter(|&&s| s != 0.0).count(), 10);
    }
}
