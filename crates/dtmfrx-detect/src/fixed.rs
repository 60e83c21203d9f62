/// One Q31 amplitude value read from the audio channel.
pub type Sample = i32;

/// Spectrum magnitude, kept in the same Q31 domain as the samples.
pub type Magnitude = i32;

const Q31_FULL_SCALE: f64 = 2_147_483_648.0;

/// Convert a normalized amplitude in `[-1.0, 1.0]` to Q31.
///
/// Values beyond full scale saturate at the rails instead of wrapping.
pub fn q31_from_f32(x: f32) -> Sample {
    saturate_q31(f64::from(x) * Q31_FULL_SCALE)
}

/// Round to the nearest integer and clamp into the Q31 range. NaN maps to zero.
pub fn saturate_q31(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
