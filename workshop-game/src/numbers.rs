//! Numeric conversion helpers centralizing the casts used by random rolls.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the i32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let min = f64::from(i32::MIN);
    let max = f64::from(i32::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Floor a non-negative f64 into a slice index strictly below `len`.
///
/// Returns `None` for an empty range.
#[must_use]
pub fn floor_f64_to_index(value: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = if value.is_finite() && value > 0.0 {
        cast::<f64, usize>(value.floor()).unwrap_or(0)
    } else {
        0
    };
    Some(idx.min(len - 1))
}

/// Convert a length or count to f64 while allowing precision loss in one place.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}
