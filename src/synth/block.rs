/// Mutable view over one stereo block of output.
///
/// Voices accumulate into it (`+=`), so the render graph zeroes it once and
/// every active voice adds its contribution.
pub struct StereoBlock<'a> {
    left: &'a mut [f32],
    right: &'a mut [f32],
}

impl<'a> StereoBlock<'a> {
    pub fn new(left: &'a mut [f32], right: &'a mut [f32]) -> Self {
        debug_assert_eq!(left.len(), right.len(), "channel lengths must match");
        Self { left, right }
    }

    pub fn frames(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// Add one stereo frame.
    #[inline]
    pub fn add(&mut self, frame: usize, left: f32, right: f32) {
        self.left[frame] += left;
        self.right[frame] += right;
    }

    /// Reborrow `len` frames starting at `start`.
    pub fn slice(&mut self, start: usize, len: usize) -> StereoBlock<'_> {
        StereoBlock {
            left: &mut self.left[start..start + len],
            right: &mut self.right[start..start + len],
        }
    }

    pub fn fill(&mut self, value: f32) {
        self.left.fill(value);
        self.right.fill(value);
    }

    pub fn left(&self) -> &[f32] {
        self.left
    }

    pub fn right(&self) -> &[f32] {
        self.right
    }
}
