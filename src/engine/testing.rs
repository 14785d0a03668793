use crate::synth::{ParamSet, StereoBlock, Voice, VoiceKind};

pub(crate) const TEST_VOICE: VoiceKind = VoiceKind::new("Test");

/// Writes a constant `amplitude` and finishes `tail` frames after release.
pub(crate) struct TestVoice {
    amplitude: f32,
    tail: usize,
    remaining: usize,
    released: bool,
    sounding: bool,
}

impl TestVoice {
    pub(crate) fn new(tail: usize) -> Self {
        Self {
            amplitude: 0.0,
            tail,
            remaining: tail,
            released: false,
            sounding: false,
        }
    }
}

impl Voice for TestVoice {
    fn init(&mut self, params: &mut ParamSet) {
        params.declare("frequency", 440.0, 0.0, 20_000.0);
        params.declare("amplitude", 0.5, 0.0, 1.0);
    }

    fn trigger_on(&mut self, params: &ParamSet) {
        self.amplitude = params.value("amplitude");
        self.remaining = self.tail;
        self.released = false;
        self.sounding = true;
    }

    fn process(&mut self, block: &mut StereoBlock<'_>) {
        assert!(self.sounding, "processed a voice that was never triggered");
        for frame in 0..block.frames() {
            if self.released && self.remaining == 0 {
                break;
            }
            block.add(frame, self.amplitude, self.amplitude);
            if self.released {
                self.remaining -= 1;
            }
        }
    }

    fn trigger_off(&mut self) {
        self.released = true;
    }

    fn is_done(&self) -> bool {
        self.released && self.remaining == 0
    }

    fn envelope_level(&self) -> f32 {
        if self.is_done() {
            0.0
        } else {
            1.0
        }
    }
}
