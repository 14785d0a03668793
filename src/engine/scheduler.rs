use std::{cmp::Ordering, collections::BinaryHeap};

use super::allocator::{VoiceId, VoicePool};
use crate::synth::{NoteId, NoteParams, VoiceKind};

/// A note waiting in the queue. Immutable once enqueued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub voice: VoiceKind,
    /// Trigger time in seconds of virtual clock.
    pub time: f64,
    /// Seconds until the implicit trigger-off; infinite means "until told".
    pub duration: f64,
    pub params: NoteParams,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Start {
        event: ScheduledEvent,
        note: Option<NoteId>,
    },
    Release {
        voice: VoiceId,
    },
    NoteOff {
        note: NoteId,
    },
    ReleaseAll,
}

#[derive(Debug)]
struct Entry {
    time: f64,
    seq: u64,
    action: Action,
}

// Reversed so the max-heap pops the earliest time, then the earliest insert.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// What one `advance` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Advance {
    pub started: usize,
    pub released: usize,
    pub dropped: usize,
}

/// Time-ordered event queue driven by a virtual clock.
///
/// Events fire when the clock sweeps past their trigger time; ties fire in
/// insertion order. Events scheduled in the past fire on the next advance,
/// and their trigger-off still lands at trigger time plus duration.
pub struct Sequencer {
    clock: f64,
    seq: u64,
    queue: BinaryHeap<Entry>,
    held: Vec<(NoteId, VoiceId)>,
    dropped: u64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(events: usize) -> Self {
        Self {
            clock: 0.0,
            seq: 0,
            queue: BinaryHeap::with_capacity(events),
            held: Vec::with_capacity(128),
            dropped: 0,
        }
    }

    /// Current virtual time in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Queued entries, including pending implicit trigger-offs.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Notes that could not get a voice, or were refused for a non-finite
    /// time or duration, since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn schedule(&mut self, voice: VoiceKind, time: f64, duration: f64, params: NoteParams) {
        self.schedule_event(ScheduledEvent {
            voice,
            time,
            duration,
            params,
        });
    }

    /// Queue a start. A non-finite time or a NaN duration is refused and
    /// counted as dropped.
    pub fn schedule_event(&mut self, event: ScheduledEvent) {
        if !event.time.is_finite() || event.duration.is_nan() {
            tracing::warn!(
                time = event.time,
                duration = event.duration,
                "refusing event with non-finite timing"
            );
            self.dropped += 1;
            return;
        }
        self.push(event.time, Action::Start { event, note: None });
    }

    /// Schedule `offset` seconds after the current clock.
    pub fn schedule_from_now(
        &mut self,
        voice: VoiceKind,
        offset: f64,
        duration: f64,
        params: NoteParams,
    ) {
        self.schedule(voice, self.clock + offset.max(0.0), duration, params);
    }

    /// Start a held note on the next advance. Re-using a held `note` id
    /// releases the voice it was bound to.
    pub fn note_on(&mut self, note: NoteId, voice: VoiceKind, params: NoteParams) {
        let event = ScheduledEvent {
            voice,
            time: self.clock,
            duration: f64::INFINITY,
            params,
        };
        self.push(self.clock, Action::Start {
            event,
            note: Some(note),
        });
    }

    /// Release the voice bound to `note` on the next advance.
    pub fn note_off(&mut self, note: NoteId) {
        self.push(self.clock, Action::NoteOff { note });
    }

    /// Trigger-off every sounding voice on the next advance, after any
    /// starts already queued for the current clock.
    pub fn all_notes_off(&mut self) {
        self.push(self.clock, Action::ReleaseAll);
    }

    pub fn next_event_time(&self) -> Option<f64> {
        self.queue.peek().map(|entry| entry.time)
    }

    /// Whole frames between the clock and the next queued entry; zero when
    /// it is due within the current frame or already late.
    pub fn next_event_in_frames(&self, sample_rate: f64) -> Option<usize> {
        self.next_event_time()
            .map(|time| ((time - self.clock) * sample_rate).floor().max(0.0) as usize)
    }

    /// Fire every entry due before `clock + delta`, then move the clock.
    ///
    /// Each start acquires and triggers one voice; a finite duration queues
    /// its trigger-off, which fires within the same call when it falls
    /// inside the window. A zero delta does nothing.
    pub fn advance(&mut self, delta: f64, pool: &mut VoicePool) -> Advance {
        debug_assert!(delta >= 0.0, "virtual clock cannot run backwards");
        let delta = delta.max(0.0);
        let mut report = Advance::default();
        if delta == 0.0 {
            return report;
        }

        let horizon = self.clock + delta;
        while self.queue.peek().is_some_and(|entry| entry.time < horizon) {
            let Some(entry) = self.queue.pop() else {
                break;
            };
            match entry.action {
                Action::Start { event, note } => match pool.acquire(event.voice) {
                    Ok(id) => {
                        pool.activate(id, &event.params);
                        report.started += 1;

                        if event.duration.is_finite() {
                            let off = event.time + event.duration.max(0.0);
                            self.push(off, Action::Release { voice: id });
                        }
                        if let Some(note) = note {
                            self.bind(note, id, pool);
                        }
                    }
                    Err(_) => {
                        self.dropped += 1;
                        report.dropped += 1;
                    }
                },
                Action::Release { voice } => {
                    if pool.release(voice) {
                        report.released += 1;
                    }
                }
                Action::NoteOff { note } => {
                    if let Some(position) = self.held.iter().position(|&(n, _)| n == note) {
                        let (_, voice) = self.held.swap_remove(position);
                        if pool.release(voice) {
                            report.released += 1;
                        }
                    }
                }
                Action::ReleaseAll => {
                    self.held.clear();
                    report.released += pool.release_all();
                }
            }
        }

        self.clock = horizon;
        report
    }

    fn bind(&mut self, note: NoteId, id: VoiceId, pool: &mut VoicePool) {
        // Voices that finished on their own no longer answer to a note-off.
        self.held.retain(|&(n, voice)| n == note || pool.is_active(voice));
        match self.held.iter_mut().find(|(n, _)| *n == note) {
            Some(entry) => {
                pool.release(entry.1);
                entry.1 = id;
            }
            None => self.held.push((note, id)),
        }
    }

    fn push(&mut self, time: f64, action: Action) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Entry { time, seq, action });
    }
}
