use crate::MIN_TIME;

/*
Segment Envelope
================

Every voice in the palette shapes its loudness (and sometimes its pitch,
modulation index or pan position) with the same small state machine: a
sequence of straight-line segments between four levels.

  Level
  peak  ┐     ╱╲
        │    ╱  ╲___________
  sus   │   ╱               ╲
        │  ╱                 ╲
  start └─╱                   ╲── end
         Attack Decay Sustain Release

  start   level the envelope jumps to on note_on
  peak    level reached at the end of the attack segment
  sus     level reached at the end of decay (held while the gate is high)
  end     level the release segment ramps to

An amplitude ADSR uses levels (0, 1, S, 0). The FM voice drives its
modulation index with levels (idx1, idx2, idx2, idx3), so levels are not
restricted to 0..1.

Two modes:

  sustaining   After decay the envelope holds the sustain level until
               note_off. This is the classic ADSR used by pitched voices.

  one-shot     After decay the envelope goes straight to Idle. Drums use
               this (AD) so they finish without a note_off. A note_off while
               still in attack or decay starts a release from the current
               level.

Each segment snapshots its starting level and length in samples and then
interpolates, so a segment always lands exactly on its target no matter
where it started. Releasing mid-attack therefore never clicks.

    ┌──────┐ note_on ┌────────┐ peak ┌───────┐ sus ┌─────────┐
    │ Idle │ ──────→ │ Attack │ ───→ │ Decay │ ──→ │ Sustain │
    └──────┘         └────────┘      └───────┘     └─────────┘
       ↑  ↑               │ note_off     │ (one-shot)   │ note_off
       │  └───────────────┼──────────────┘              │
       │             ┌─────────┐                        │
       └──────────── │ Release │ ←──────────────────────┘
             end     └─────────┘
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    sample_rate: f32,

    // Segment lengths in seconds
    attack_time: f32,
    decay_time: f32,
    release_time: f32,

    // Breakpoint levels
    start_level: f32,
    peak_level: f32,
    sustain_level: f32,
    end_level: f32,

    sustains: bool,

    stage: EnvelopeState,
    level: f32,

    // Current segment bookkeeping
    segment_from: f32,
    segment_to: f32,
    segment_total: u32,
    segment_elapsed: u32,
}

impl Envelope {
    /// Sustaining envelope with levels (0, 1, sustain, 0).
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            sample_rate,
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            release_time: release.max(MIN_TIME),

            start_level: 0.0,
            peak_level: 1.0,
            sustain_level: sustain.clamp(0.0, 1.0),
            end_level: 0.0,

            sustains: true,

            stage: EnvelopeState::Idle,
            level: 0.0,

            segment_from: 0.0,
            segment_to: 0.0,
            segment_total: 1,
            segment_elapsed: 0,
        }
    }

    /// One-shot attack/decay envelope that finishes on its own.
    ///
    /// A note_off during the envelope releases over the decay time.
    pub fn ad(sample_rate: f32, attack: f32, decay: f32) -> Self {
        let mut env = Self::adsr(sample_rate, attack, decay, 0.0, decay);
        env.sustains = false;
        env
    }

    /// Replace the four breakpoint levels.
    pub fn with_levels(mut self, start: f32, peak: f32, sustain: f32, end: f32) -> Self {
        self.set_levels(start, peak, sustain, end);
        self
    }

    pub fn set_levels(&mut self, start: f32, peak: f32, sustain: f32, end: f32) {
        self.start_level = start;
        self.peak_level = peak;
        self.sustain_level = sustain;
        self.end_level = end;
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack_time = seconds.max(MIN_TIME);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay_time = seconds.max(MIN_TIME);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release_time = seconds.max(MIN_TIME);
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level;
    }

    /// Gate high: jump to the start level and begin the attack.
    ///
    /// Retriggering always restarts from the start level so repeated notes
    /// stay distinct.
    pub fn note_on(&mut self) {
        self.level = self.start_level;
        self.begin(EnvelopeState::Attack, self.peak_level, self.attack_time);
    }

    /// Gate low: ramp from the current level to the end level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }
        self.begin(EnvelopeState::Release, self.end_level, self.release_time);
    }

    fn begin(&mut self, stage: EnvelopeState, target: f32, seconds: f32) {
        self.stage = stage;
        self.segment_from = self.level;
        self.segment_to = target;
        self.segment_total = (seconds * self.sample_rate).round().max(1.0) as u32;
        self.segment_elapsed = 0;
    }

    fn finish_segment(&mut self) {
        match self.stage {
            EnvelopeState::Attack => {
                self.begin(EnvelopeState::Decay, self.sustain_level, self.decay_time)
            }
            EnvelopeState::Decay if self.sustains => self.stage = EnvelopeState::Sustain,
            EnvelopeState::Decay | EnvelopeState::Release => self.stage = EnvelopeState::Idle,
            EnvelopeState::Idle | EnvelopeState::Sustain => {}
        }
    }

    /// Advance the envelope by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle | EnvelopeState::Sustain => {}
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Release => {
                self.segment_elapsed = self.segment_elapsed.saturating_add(1);
                let progress = self.segment_elapsed as f32 / self.segment_total as f32;
                self.level = self.segment_from + (self.segment_to - self.segment_from) * progress;

                if self.segment_elapsed >= self.segment_total {
                    self.level = self.segment_to;
                    self.finish_segment();
                }
            }
        }
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// True while any segment (or the sustain hold) is running.
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    /// True once the envelope has run its course and sits idle.
    pub fn is_done(&self) -> bool {
        matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = self.start_level;
        self.segment_elapsed = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}
