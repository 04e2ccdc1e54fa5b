//! Configuration for the receipt pipeline.
//!
//! Every numeric threshold used by the geometry stages lives here rather
//! than as a per-call default, so stages can be tuned and tested without
//! touching algorithm code. Each stage has its own config struct; they are
//! gathered in [`PipelineConfig`] and validated together.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
///
/// This trait provides methods for validating various configuration
/// parameters used in the receipt pipeline, such as window sizes, paddings
/// and density thresholds.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a usize value is positive.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a float value is positive.
    fn validate_positive_f32(&self, value: f32, field_name: &str) -> Result<(), ConfigError> {
        if value <= 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{} must be greater than 0, got {}", field_name, value),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a float value is within a specified range (inclusive).
    fn validate_f32_range(
        &self,
        value: f32,
        min: f32,
        max: f32,
        field_name: &str,
    ) -> Result<(), ConfigError> {
        if value < min || value > max {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "{} must be between {} and {}, got {}",
                    field_name, min, max, value
                ),
            })
        } else {
            Ok(())
        }
    }
}

impl From<ConfigError> for crate::core::ReceiptError {
    fn from(error: ConfigError) -> Self {
        crate::core::ReceiptError::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Configuration for tile binarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinarizeConfig {
    /// Number of horizontal strips binarized independently.
    pub strip_count: u32,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self { strip_count: 8 }
    }
}

impl ConfigValidator for BinarizeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.strip_count as usize, "strip_count")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration for skew correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkewConfig {
    /// Width the image is resampled to before the angle search; the
    /// projection peak metric is stable at this scale.
    pub working_width: u32,
    /// Half-width of the initial candidate window, in degrees.
    pub initial_sweep_deg: f32,
    /// Number of candidate angles tested per degree.
    pub steps_per_degree: u32,
    /// Amount the candidate window is shifted when the best angle lands on
    /// a window boundary, in degrees.
    pub widen_step_deg: f32,
    /// Hard limit on the searched angle, in degrees. Windows reaching past
    /// this limit fail the receipt.
    pub max_angle_deg: f32,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            working_width: 600,
            initial_sweep_deg: 5.0,
            steps_per_degree: 3,
            widen_step_deg: 5.0,
            max_angle_deg: 20.0,
        }
    }
}

impl ConfigValidator for SkewConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.working_width as usize, "working_width")?;
        self.validate_positive_usize(self.steps_per_degree as usize, "steps_per_degree")?;
        self.validate_positive_f32(self.initial_sweep_deg, "initial_sweep_deg")?;
        self.validate_positive_f32(self.widen_step_deg, "widen_step_deg")?;
        self.validate_f32_range(self.max_angle_deg, self.initial_sweep_deg, 90.0, "max_angle_deg")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration for edge trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Minimum projection value for a sample to start a boundary candidate.
    pub low_thresh: f32,
    /// First probe offset of the confirmation scan, in samples.
    pub probe_offset: usize,
    /// Exclusive end of the confirmation scan, in samples.
    pub probe_range: usize,
    /// Length of each confirmation window, in samples.
    pub window_len: usize,
    /// A confirmation window summing below this value marks the candidate
    /// as noise.
    pub window_min: f32,
    /// Fraction of a fully-white confirmation window above which the region
    /// counts as washed out.
    pub washout_fraction: f32,
    /// Number of samples kept outside a confirmed boundary.
    pub padding: usize,
    /// Row-profile mean above which the dense-background clamp applies.
    pub dense_mean_thresh: f32,
    /// Minimum margin kept from each edge under the dense-background clamp.
    pub dense_margin: usize,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            low_thresh: 300.0,
            probe_offset: 10,
            probe_range: 100,
            window_len: 10,
            window_min: 500.0,
            washout_fraction: 0.3,
            padding: 10,
            dense_mean_thresh: 15_000.0,
            dense_margin: 20,
        }
    }
}

impl ConfigValidator for TrimConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.window_len, "window_len")?;
        self.validate_positive_f32(self.low_thresh, "low_thresh")?;
        self.validate_positive_f32(self.window_min, "window_min")?;
        self.validate_f32_range(self.washout_fraction, 0.0, 1.0, "washout_fraction")?;
        if self.probe_offset >= self.probe_range {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "probe_offset ({}) must be below probe_range ({})",
                    self.probe_offset, self.probe_range
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration for line segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Default detection threshold over the row profile.
    pub thresh: f32,
    /// Profile mean above `adaptive_factor * thresh` switches to the
    /// interior-mean threshold.
    pub adaptive_factor: f32,
    /// Number of samples excluded at both profile ends when computing the
    /// interior mean.
    pub interior_margin: usize,
    /// Number of rows added on each side of an emitted line.
    pub padding: usize,
    /// Emitted lines must be strictly taller than this, in rows.
    pub min_height: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            thresh: 2_000.0,
            adaptive_factor: 5.0,
            interior_margin: 200,
            padding: 2,
            min_height: 15,
        }
    }
}

impl ConfigValidator for SegmentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_f32(self.thresh, "thresh")?;
        self.validate_positive_f32(self.adaptive_factor, "adaptive_factor")?;
        self.validate_positive_usize(self.min_height, "min_height")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Top-level configuration for the receipt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Tile binarization settings.
    #[serde(default)]
    pub binarize: BinarizeConfig,
    /// Skew correction settings.
    #[serde(default)]
    pub skew: SkewConfig,
    /// Edge trimming settings.
    #[serde(default)]
    pub trim: TrimConfig,
    /// Line segmentation settings.
    #[serde(default)]
    pub segment: SegmentConfig,
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.binarize.validate()?;
        self.skew.validate()?;
        self.trim.validate()?;
        self.segment.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_strip_count_rejected() {
        let config = BinarizeConfig { strip_count: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_working_width_rejected() {
        let config = SkewConfig {
            working_width: 0,
            ..SkewConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_angle_below_sweep_rejected() {
        let config = SkewConfig {
            initial_sweep_deg: 10.0,
            max_angle_deg: 5.0,
            ..SkewConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probe_window_ordering() {
        let config = TrimConfig {
            probe_offset: 100,
            probe_range: 100,
            ..TrimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_washout_fraction_range() {
        let config = TrimConfig {
            washout_fraction: 1.5,
            ..TrimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.segment.min_height, config.segment.min_height);
        assert_eq!(parsed.trim.padding, config.trim.padding);
    }

    #[test]
    fn test_partial_json_uses_stage_defaults() {
        let parsed: PipelineConfig =
            serde_json::from_str(r#"{"segment":{"thresh":900.0,"adaptive_factor":5.0,"interior_margin":200,"padding":2,"min_height":15}}"#)
                .unwrap();
        assert_eq!(parsed.segment.thresh, 900.0);
        assert_eq!(parsed.binarize.strip_count, BinarizeConfig::default().strip_count);
    }
}
