/// Formats `value` with `decimals` fraction digits.
///
/// Values exactly halfway between two results round away from zero, where
/// `format!("{:.1}")` would round them to even. Every other value, including
/// non-finite ones, is formatted as usual.
///
/// ```rust
/// use common::fixed::to_fixed;
///
/// assert_eq!(to_fixed(0.25, 1), "0.3");
/// assert_eq!(to_fixed(12.34, 1), "12.3");
/// ```
pub fn to_fixed(value: f64, decimals: usize) -> String {
    let Ok(exponent) = i32::try_from(decimals) else {
        return format!("{value:.decimals$}");
    };
    let scale = 10f64.powi(exponent);
    let scaled = value * scale;
    // The product only counts as a tie if it was computed without rounding.
    let is_tie = scaled.is_finite()
        && scaled.fract().abs() == 0.5
        && value.mul_add(scale, -scaled) == 0.0;
    if is_tie {
        let rounded = (scaled.trunc() + scaled.signum()) / scale;
        return format!("{rounded:.decimals$}");
    }
    format!("{value:.decimals$}")
}
