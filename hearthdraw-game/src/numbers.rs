//! Numeric conversion helpers centralizing saturating casts.

use num_traits::cast::cast;

/// Clamp an i64 into the i32 range.
#[must_use]
pub fn clamp_i64_to_i32(value: i64) -> i32 {
    let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    cast::<i64, i32>(clamped).unwrap_or(0)
}

/// Clamp a non-negative i64 count into the i32 range, mapping negatives to 0.
#[must_use]
pub fn saturate_count(value: i64) -> i32 {
    if value <= 0 {
        return 0;
    }
    clamp_i64_to_i32(value)
}

/// Multiply an amount by a multiplier in 64-bit space and clamp back into i32.
#[must_use]
pub fn scale_amount(amount: i32, multiplier: i32) -> i32 {
    clamp_i64_to_i32(i64::from(amount) * i64::from(multiplier))
}
