//! Configuration for the reconstruction pipeline.
//!
//! [`ReadingOrderConfig`] carries the line-grouping threshold and the policy
//! for malformed detections. [`ConfigLoader`] reads and writes it as TOML or
//! JSON.

use super::validation::{validate_min_threads, validate_positive_f32};
use crate::core::config::{ConfigError, ConfigValidator, ParallelPolicy};
use crate::core::constants::DEFAULT_Y_THRESHOLD;
use crate::core::{ReadingOrderError, ReadingOrderResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with detections whose box cannot be normalized.
///
/// Neither policy fails the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the detection and log a warning.
    #[default]
    Skip,
    /// Drop the detection and report the skipped count and indices in the response.
    Report,
}

/// Reconstruction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingOrderConfig {
    /// Fragments whose `y_center` is strictly closer than this many pixels to a
    /// line's reference join that line.
    #[serde(default = "ReadingOrderConfig::default_y_threshold")]
    pub y_threshold: f32,

    /// Handling of malformed detections.
    #[serde(default)]
    pub malformed_policy: MalformedPolicy,

    /// Coerce confidences into `[0, 1]`.
    #[serde(default = "ReadingOrderConfig::default_clamp_confidence")]
    pub clamp_confidence: bool,

    /// Parallelism across payloads in batch reconstruction.
    #[serde(default)]
    pub parallel: ParallelPolicy,
}

impl ReadingOrderConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line-grouping threshold. Invalid values fall back to the default.
    pub fn with_y_threshold(mut self, y_threshold: f32) -> Self {
        self.y_threshold = validate_positive_f32(y_threshold, "y_threshold", DEFAULT_Y_THRESHOLD);
        self
    }

    /// Set the malformed-detection policy.
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Enable or disable confidence clamping.
    pub fn with_clamp_confidence(mut self, clamp: bool) -> Self {
        self.clamp_confidence = clamp;
        self
    }

    /// Set the parallel processing policy.
    pub fn with_parallel_policy(mut self, policy: ParallelPolicy) -> Self {
        self.parallel = policy;
        self
    }

    /// Limit batch reconstruction to `threads` worker threads.
    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.parallel.max_threads = Some(validate_min_threads(threads, "max_threads"));
        self
    }

    fn default_y_threshold() -> f32 {
        DEFAULT_Y_THRESHOLD
    }

    fn default_clamp_confidence() -> bool {
        true
    }
}

impl Default for ReadingOrderConfig {
    fn default() -> Self {
        Self {
            y_threshold: Self::default_y_threshold(),
            malformed_policy: MalformedPolicy::default(),
            clamp_confidence: Self::default_clamp_confidence(),
            parallel: ParallelPolicy::default(),
        }
    }
}

impl ConfigValidator for ReadingOrderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_distance(self.y_threshold, "y_threshold")?;
        if let Some(threads) = self.parallel.max_threads {
            self.validate_thread_count(threads)?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration file format
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration loader for the reconstruction pipeline
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension.
    ///
    /// The loaded configuration is validated before it is returned.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use oar_reading_order::pipeline::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("reading_order.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> ReadingOrderResult<ReadingOrderConfig> {
        let format = ConfigFormat::from_extension(path).ok_or_else(|| {
            ReadingOrderError::config_error(format!(
                "Unsupported config file extension: {:?}",
                path.extension()
            ))
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReadingOrderError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::load_from_string(&content, format)
    }

    /// Load and validate configuration from a string with the specified format
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> ReadingOrderResult<ReadingOrderConfig> {
        let config = match format {
            ConfigFormat::Toml => Self::load_from_toml(content)?,
            ConfigFormat::Json => Self::load_from_json(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(content: &str) -> ReadingOrderResult<ReadingOrderConfig> {
        toml::from_str(content).map_err(|e| {
            ReadingOrderError::config_error(format!("Failed to parse TOML config: {e}"))
        })
    }

    /// Load configuration from JSON string
    pub fn load_from_json(content: &str) -> ReadingOrderResult<ReadingOrderConfig> {
        serde_json::from_str(content).map_err(|e| {
            ReadingOrderError::config_error(format!("Failed to parse JSON config: {e}"))
        })
    }

    /// Save configuration to a file, auto-detecting the format from the extension
    pub fn save_to_file(config: &ReadingOrderConfig, path: &Path) -> ReadingOrderResult<()> {
        let format = ConfigFormat::from_extension(path).ok_or_else(|| {
            ReadingOrderError::config_error(format!(
                "Unsupported config file extension: {:?}",
                path.extension()
            ))
        })?;

        let content = Self::save_to_string(config, format)?;

        std::fs::write(path, content).map_err(|e| {
            ReadingOrderError::config_error(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save configuration to string with specified format
    pub fn save_to_string(
        config: &ReadingOrderConfig,
        format: ConfigFormat,
    ) -> ReadingOrderResult<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                ReadingOrderError::config_error(format!("Failed to serialize config to TOML: {e}"))
            }),
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                ReadingOrderError::config_error(format!("Failed to serialize config to JSON: {e}"))
            }),
        }
    }
}
