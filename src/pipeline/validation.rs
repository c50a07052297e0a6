//! Validation helpers for pipeline configuration setters.
//!
//! These never fail: out-of-range values are replaced and a warning is logged.

use tracing::warn;

/// Validates and ensures a positive, finite float value.
///
/// # Arguments
///
/// * `value` - The value to validate
/// * `param_name` - The name of the parameter for logging purposes
/// * `default` - The value to use if validation fails
///
/// # Returns
///
/// The validated value or the default
pub fn validate_positive_f32(value: f32, param_name: &str, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("{param_name} must be a finite value > 0.0, got {value}; using {default}");
        default
    }
}

/// Validates and ensures a thread count of at least 1.
///
/// # Arguments
///
/// * `threads` - The requested thread count
/// * `param_name` - The name of the parameter for logging purposes
///
/// # Returns
///
/// The validated count (minimum 1)
pub fn validate_min_threads(threads: usize, param_name: &str) -> usize {
    if threads >= 1 {
        threads
    } else {
        warn!("{param_name} must be >= 1, got {threads}; using 1");
        1
    }
}
