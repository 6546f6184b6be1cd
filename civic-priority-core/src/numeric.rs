//! Numeric guards shared by every scoring stage.
//!
//! Distance and score arithmetic can yield `NaN` or infinities when upstream
//! data is malformed. All such values pass through [`finite_or_zero`] before
//! they leave a component, so a non-finite score never reaches a caller.

/// Return `value` when it is finite, otherwise `0.0`.
///
/// # Examples
/// ```
/// use civic_priority_core::finite_or_zero;
///
/// assert_eq!(finite_or_zero(0.25), 0.25);
/// assert_eq!(finite_or_zero(f64::NAN), 0.0);
/// assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
/// ```
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Guard `value` and clamp it into the unit interval.
#[must_use]
pub fn unit_interval(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 1.0)
}

/// Round to two decimal places after guarding against non-finite input.
///
/// # Examples
/// ```
/// use civic_priority_core::round_hundredths;
///
/// assert_eq!(round_hundredths(0.456), 0.46);
/// assert_eq!(round_hundredths(f64::NAN), 0.0);
/// ```
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    finite_or_zero((finite_or_zero(value) * 100.0).round() / 100.0)
}
