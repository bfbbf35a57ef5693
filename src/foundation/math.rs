/// Clamp into `[0, 1]`, mapping NaN to `0`.
pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Normalized position of `x` within `[start, end]`, clamped.
///
/// Degenerate ranges (`end <= start`) behave as a step at `start`.
pub(crate) fn linear_progress(x: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if x < start { 0.0 } else { 1.0 };
    }
    clamp01((x - start) / (end - start))
}
