use num_traits::Float;

/// Round a floating point sample and clamp it into the 8-bit range.
///
/// NaN maps to 0.
///
/// # Example
///
/// ```
/// use pixelab_imgproc::core::saturate_cast;
///
/// assert_eq!(saturate_cast(-3.2f32), 0);
/// assert_eq!(saturate_cast(127.5f32), 128);
/// assert_eq!(saturate_cast(300.0f64), 255);
/// ```
#[inline]
pub fn saturate_cast<T: Float>(val: T) -> u8 {
    let max = T::from(u8::MAX).unwrap_or_else(T::max_value);
    num_traits::cast(val.round().max(T::zero()).min(max)).unwrap_or(0)
}

/// Luma of an RGB triplet with the ITU-R BT.601 weights, rounded to the nearest integer.
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    saturate_cast(luma_f32(r, g, b))
}

#[inline]
pub(crate) fn luma_f32(r: u8, g: u8, b: u8) -> f32 {
    const RW: f32 = 0.299;
    const GW: f32 = 0.587;
    const BW: f32 = 0.114;
    RW * r as f32 + GW * g as f32 + BW * b as f32
}
