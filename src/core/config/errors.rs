//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a resource limit has been exceeded.
    #[error("resource limit exceeded: {message}")]
    ResourceLimitExceeded { message: String },
}

/// A trait for validating configuration parameters.
///
/// Implementors provide [`validate`](ConfigValidator::validate) and
/// [`get_defaults`](ConfigValidator::get_defaults); the provided methods
/// cover the checks shared by the pipeline's configuration types.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a pixel distance is finite and strictly positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The distance to validate.
    /// * `field_name` - The name of the field being validated.
    fn validate_positive_distance(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be a finite value > 0.0, got {}", field_name, value),
            })
        }
    }

    /// Validates a thread count.
    ///
    /// The count must be greater than 0 and not exceed a reasonable maximum.
    fn validate_thread_count(&self, thread_count: usize) -> Result<(), ConfigError> {
        const MAX_REASONABLE_THREADS: usize = 256;

        if thread_count == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Thread count must be greater than 0".to_string(),
            })
        } else if thread_count > MAX_REASONABLE_THREADS {
            Err(ConfigError::ResourceLimitExceeded {
                message: format!(
                    "Thread count {} exceeds reasonable maximum of {}",
                    thread_count, MAX_REASONABLE_THREADS
                ),
            })
        } else {
            Ok(())
        }
    }
}

/// Extension trait that validates and hands the configuration back.
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates the configuration and wraps any error into
    /// [`ReadingOrderError::ConfigError`](crate::core::ReadingOrderError::ConfigError).
    fn validated(self) -> Result<Self, crate::core::ReadingOrderError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}
