use std::f32::consts::FRAC_PI_4;

/// Equal-power gains for a pan position in -1 (left) ..= 1 (right).
///
/// Returns `(left, right)`; at center both are ~0.707 so perceived loudness
/// stays constant across the field.
#[inline]
pub fn equal_power(position: f32) -> (f32, f32) {
    let angle = (position.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}
