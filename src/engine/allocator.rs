use crate::{
    error::PoolError,
    synth::{NoteParams, ParamSet, Voice, VoiceFactory, VoiceKind, VoiceSnapshot},
};

/// What `acquire` does when a kind is at its cap and every voice is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowPolicy {
    /// Refuse the note.
    Drop,
    /// Cut off the longest-sounding voice of the same kind and reuse it.
    #[default]
    StealOldest,
}

/// Handle to a pooled voice.
///
/// The generation changes whenever the slot is retired or stolen, so a
/// handle held past that point (e.g. by a pending trigger-off) goes stale
/// instead of touching whichever note now owns the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId {
    index: u32,
    generation: u32,
}

impl VoiceId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    /// Handed out by `acquire`, not yet triggered.
    Reserved,
    Active,
}

struct Slot {
    kind: VoiceKind,
    voice: Box<dyn Voice>,
    params: ParamSet,
    generation: u32,
    state: SlotState,
    stamp: u64,
}

impl Slot {
    fn detach(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = SlotState::Reserved;
    }
}

/// Recycling voice allocator, partitioned by kind.
///
/// Every voice lives in exactly one of the free or active sets. Voices are
/// created through the registered factory and never destroyed; a retired
/// voice goes back to the free set and is reused by the next `acquire` of
/// its kind.
pub struct VoicePool {
    sample_rate: f32,
    max_voices: Option<usize>,
    overflow: OverflowPolicy,
    factories: Vec<(VoiceKind, Box<dyn VoiceFactory>)>,
    slots: Vec<Slot>,
    /// Active slot indices in activation order.
    active: Vec<usize>,
    next_stamp: u64,
}

impl VoicePool {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            max_voices: None,
            overflow: OverflowPolicy::default(),
            factories: Vec::new(),
            slots: Vec::new(),
            active: Vec::new(),
            next_stamp: 0,
        }
    }

    pub fn with_max_voices(mut self, max_voices: Option<usize>) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Associate `kind` with a factory, replacing any earlier one.
    pub fn register<F>(&mut self, kind: VoiceKind, factory: F)
    where
        F: VoiceFactory + 'static,
    {
        match self.factories.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = Box::new(factory),
            None => self.factories.push((kind, Box::new(factory))),
        }
        tracing::debug!(%kind, "registered voice kind");
    }

    pub fn kinds(&self) -> impl Iterator<Item = VoiceKind> + '_ {
        self.factories.iter().map(|(kind, _)| *kind)
    }

    pub fn is_registered(&self, kind: VoiceKind) -> bool {
        self.factories.iter().any(|(k, _)| *k == kind)
    }

    /// Create free voices of `kind` until it has `count` (or reaches its
    /// cap). Returns how many were created.
    pub fn preallocate(&mut self, kind: VoiceKind, count: usize) -> Result<usize, PoolError> {
        let target = self.max_voices.map_or(count, |cap| count.min(cap));
        let mut created = 0;
        while self.count_of(kind) < target {
            let index = self.grow(kind)?;
            self.slots[index].state = SlotState::Free;
            created += 1;
        }
        self.active.reserve(self.slots.len().saturating_sub(self.active.len()));
        tracing::debug!(%kind, created, total = self.count_of(kind), "preallocated voices");
        Ok(created)
    }

    /// Hand out a voice of `kind` for the caller to `activate`.
    ///
    /// Reuses a free voice if there is one, otherwise grows the pool. At the
    /// cap the overflow policy decides between refusing and stealing the
    /// oldest active voice of that kind.
    pub fn acquire(&mut self, kind: VoiceKind) -> Result<VoiceId, PoolError> {
        if !self.is_registered(kind) {
            return Err(PoolError::UnknownVoice(kind));
        }

        if let Some(index) = self
            .slots
            .iter()
            .position(|s| s.kind == kind && s.state == SlotState::Free)
        {
            self.slots[index].state = SlotState::Reserved;
            return Ok(self.id_of(index));
        }

        let cap = match self.max_voices {
            Some(cap) if self.count_of(kind) >= cap => cap,
            _ => {
                let index = self.grow(kind)?;
                return Ok(self.id_of(index));
            }
        };

        match self.overflow {
            OverflowPolicy::Drop => Err(PoolError::Exhausted { kind, cap }),
            OverflowPolicy::StealOldest => {
                let oldest = self
                    .active
                    .iter()
                    .enumerate()
                    .filter(|&(_, &i)| self.slots[i].kind == kind)
                    .min_by_key(|&(_, &i)| self.slots[i].stamp)
                    .map(|(position, &i)| (position, i));

                let (position, index) = oldest.ok_or(PoolError::Exhausted { kind, cap })?;
                self.active.remove(position);
                self.slots[index].detach();
                Ok(self.id_of(index))
            }
        }
    }

    /// Reset the voice's parameters to defaults, apply `overrides`, trigger
    /// it and append it to the active set.
    ///
    /// Returns `false` if `id` is stale or was not acquired.
    pub fn activate(&mut self, id: VoiceId, overrides: &NoteParams) -> bool {
        let stamp = self.next_stamp;
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.state != SlotState::Reserved {
            return false;
        }

        slot.params.reset();
        slot.params.apply(overrides);
        slot.voice.trigger_on(&slot.params);
        slot.state = SlotState::Active;
        slot.stamp = stamp;

        self.next_stamp += 1;
        self.active.push(id.index());
        true
    }

    /// Trigger-off an active voice. Stale handles are ignored.
    pub fn release(&mut self, id: VoiceId) -> bool {
        match self.slot_mut(id) {
            Some(slot) if slot.state == SlotState::Active => {
                slot.voice.trigger_off();
                true
            }
            _ => false,
        }
    }

    /// Move a finished voice back to the free set.
    pub fn retire(&mut self, id: VoiceId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if slot.state != SlotState::Active {
            return false;
        }
        debug_assert!(slot.voice.is_done(), "retired a voice that is still sounding");

        slot.state = SlotState::Free;
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(position) = self.active.iter().position(|&i| i == id.index()) {
            self.active.remove(position);
        }
        true
    }

    /// Retire every active voice that reports done. Returns the count.
    pub fn retire_finished(&mut self) -> usize {
        let slots = &mut self.slots;
        let before = self.active.len();
        self.active.retain(|&index| {
            let slot = &mut slots[index];
            if slot.voice.is_done() {
                slot.state = SlotState::Free;
                slot.generation = slot.generation.wrapping_add(1);
                false
            } else {
                true
            }
        });
        before - self.active.len()
    }

    /// Visit active voices in activation order.
    pub fn for_each_active<F>(&mut self, mut f: F)
    where
        F: FnMut(VoiceId, &mut dyn Voice),
    {
        for &index in &self.active {
            let slot = &mut self.slots[index];
            let id = VoiceId {
                index: index as u32,
                generation: slot.generation,
            };
            f(id, slot.voice.as_mut());
        }
    }

    /// Trigger-off every active voice.
    pub fn release_all(&mut self) -> usize {
        for &index in &self.active {
            self.slots[index].voice.trigger_off();
        }
        self.active.len()
    }

    pub fn active_ids(&self) -> impl Iterator<Item = VoiceId> + '_ {
        self.active.iter().map(|&index| self.id_of(index))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.state == SlotState::Free)
            .count()
    }

    /// Voices owned by the pool, in any state.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn count_of(&self, kind: VoiceKind) -> usize {
        self.slots.iter().filter(|s| s.kind == kind).count()
    }

    pub fn is_active(&self, id: VoiceId) -> bool {
        self.slot(id)
            .is_some_and(|slot| slot.state == SlotState::Active)
    }

    pub fn kind_of(&self, id: VoiceId) -> Option<VoiceKind> {
        self.slot(id).map(|slot| slot.kind)
    }

    /// Parameters latched by the voice's current note.
    pub fn params(&self, id: VoiceId) -> Option<&ParamSet> {
        self.slot(id).map(|slot| &slot.params)
    }

    pub fn voice(&self, id: VoiceId) -> Option<&dyn Voice> {
        self.slot(id).map(|slot| slot.voice.as_ref())
    }

    /// Fill `out` with one snapshot per active voice (activation order) and
    /// return how many were written.
    pub fn snapshots_into(&self, out: &mut [VoiceSnapshot]) -> usize {
        let mut written = 0;
        for (dst, &index) in out.iter_mut().zip(&self.active) {
            let slot = &self.slots[index];
            let frequency = slot
                .params
                .get("frequency")
                .or_else(|| slot.params.get("freq"))
                .map_or(0.0, |p| p.value);
            *dst = VoiceSnapshot {
                kind: slot.kind,
                frequency,
                amplitude: slot.params.value("amplitude"),
                level: slot.voice.envelope_level(),
            };
            written += 1;
        }
        written
    }

    fn grow(&mut self, kind: VoiceKind) -> Result<usize, PoolError> {
        let factory = self
            .factories
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, factory)| factory)
            .ok_or(PoolError::UnknownVoice(kind))?;

        let mut voice = factory.create_voice(self.sample_rate);
        let mut params = ParamSet::new();
        voice.init(&mut params);

        self.slots.push(Slot {
            kind,
            voice,
            params,
            generation: 0,
            state: SlotState::Reserved,
            stamp: 0,
        });
        Ok(self.slots.len() - 1)
    }

    fn id_of(&self, index: usize) -> VoiceId {
        VoiceId {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    fn slot(&self, id: VoiceId) -> Option<&Slot> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: VoiceId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{TestVoice, TEST_VOICE};

    fn pool(cap: Option<usize>, overflow: OverflowPolicy) -> VoicePool {
        let mut pool = VoicePool::new(1_000.0)
            .with_max_voices(cap)
            .with_overflow(overflow);
        pool.register(TEST_VOICE, |_sr| TestVoice::new(0));
        pool
    }

    fn start(pool: &mut VoicePool, frequency: f32) -> Result<VoiceId, PoolError> {
        let id = pool.acquire(TEST_VOICE)?;
        assert!(pool.activate(id, &NoteParams::new().with("frequency", frequency)));
        Ok(id)
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let mut pool = pool(None, OverflowPolicy::Drop);
        assert_eq!(
            pool.acquire(VoiceKind::new("Nope")),
            Err(PoolError::UnknownVoice(VoiceKind::new("Nope")))
        );
    }

    #[test]
    fn retired_voice_is_reused() {
        let mut pool = pool(None, OverflowPolicy::Drop);
        let first = start(&mut pool, 220.0).unwrap();
        assert_eq!(pool.len(), 1);

        assert!(pool.release(first));
        assert_eq!(pool.retire_finished(), 1);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 1);

        let second = start(&mut pool, 330.0).unwrap();
        assert_eq!(pool.len(), 1, "no new voice was created");
        assert_eq!(second.index(), first.index());
        assert_ne!(second, first);
        assert!(!pool.release(first), "stale handle is ignored");
        assert!(pool.is_active(second));
    }

    #[test]
    fn drop_policy_refuses_at_cap() {
        let mut pool = pool(Some(1), OverflowPolicy::Drop);
        start(&mut pool, 220.0).unwrap();
        assert_eq!(
            start(&mut pool, 330.0),
            Err(PoolError::Exhausted {
                kind: TEST_VOICE,
                cap: 1
            })
        );
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.params(pool.active_ids().next().unwrap()).unwrap().value("frequency"), 220.0);
    }

    #[test]
    fn steal_policy_takes_the_oldest() {
        let mut pool = pool(Some(2), OverflowPolicy::StealOldest);
        let a = start(&mut pool, 100.0).unwrap();
        let b = start(&mut pool, 200.0).unwrap();
        let c = start(&mut pool, 300.0).unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(c.index(), a.index());
        assert!(!pool.is_active(a));
        assert!(pool.is_active(b));

        let order: Vec<f32> = pool
            .active_ids()
            .map(|id| pool.params(id).unwrap().value("frequency"))
            .collect();
        assert_eq!(order, vec![200.0, 300.0]);
    }

    #[test]
    fn preallocate_respects_cap() {
        let mut pool = pool(Some(3), OverflowPolicy::Drop);
        assert_eq!(pool.preallocate(TEST_VOICE, 8), Ok(3));
        assert_eq!(pool.free_count(), 3);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn parameters_reset_between_notes() {
        let mut pool = pool(Some(1), OverflowPolicy::Drop);
        let id = pool.acquire(TEST_VOICE).unwrap();
        pool.activate(id, &NoteParams::new().with("amplitude", 0.9));
        pool.release(id);
        pool.retire_finished();

        let id = pool.acquire(TEST_VOICE).unwrap();
        pool.activate(id, &NoteParams::new());
        assert_eq!(pool.params(id).unwrap().value("amplitude"), 0.5);
    }

    #[test]
    fn snapshots_report_active_voices() {
        let mut pool = pool(None, OverflowPolicy::Drop);
        start(&mut pool, 440.0).unwrap();
        start(&mut pool, 880.0).unwrap();

        let mut out = [VoiceSnapshot::default(); 1];
        assert_eq!(pool.snapshots_into(&mut out), 1);
        assert_eq!(out[0].kind, TEST_VOICE);
        assert_eq!(out[0].frequency, 440.0);
        assert_eq!(out[0].amplitude, 0.5);
    }
}
