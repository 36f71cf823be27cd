//! Configuration types for the profiling engine.
//!
//! The defaults reproduce the conventional thresholds (VIF > 5, |r| > 0.9,
//! 1.5×IQR fences, 1% rare categories). Use the builder to tune them.

use serde::{Deserialize, Serialize};

/// Configuration for a profiling run.
///
/// Use [`ProfilerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use dq_profiler::config::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .vif_threshold(10.0)
///     .correlation_threshold(0.95)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Categorical columns with at most this many distinct values are checked
    /// for case/whitespace inconsistencies.
    /// Default: 10
    pub low_cardinality_limit: usize,

    /// Values occurring in fewer than this fraction of rows are rare (0.0 - 1.0).
    /// Default: 0.01 (1%)
    pub rare_category_threshold: f64,

    /// Features with a VIF strictly above this value are reported.
    /// Default: 5.0
    pub vif_threshold: f64,

    /// Column pairs with an absolute correlation strictly above this value are
    /// flagged (0.0 - 1.0).
    /// Default: 0.9
    pub correlation_threshold: f64,

    /// IQR multiplier used by the extreme value report.
    /// Default: 1.5
    pub outlier_iqr_multiplier: f64,

    /// IQR multiplier used by the accuracy sub-score.
    /// Default: 3.0
    pub accuracy_iqr_multiplier: f64,

    /// Number of leading rows included in the anonymized sample.
    /// Default: 5
    pub anonymized_sample_rows: usize,

    /// Name of the column that enables the timeliness sub-score.
    /// Default: "date"
    pub date_column: String,

    /// Rows older than this many days before the newest date count as stale.
    /// Default: 365
    pub staleness_days: u32,

    /// Leave the target column out of the VIF and correlation analyses.
    /// Default: true
    pub exclude_target_from_feature_checks: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            low_cardinality_limit: 10,
            rare_category_threshold: 0.01,
            vif_threshold: 5.0,
            correlation_threshold: 0.9,
            outlier_iqr_multiplier: 1.5,
            accuracy_iqr_multiplier: 3.0,
            anonymized_sample_rows: 5,
            date_column: "date".to_string(),
            staleness_days: 365,
            exclude_target_from_feature_checks: true,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.rare_category_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "rare_category_threshold".to_string(),
                value: self.rare_category_threshold,
            });
        }

        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "correlation_threshold".to_string(),
                value: self.correlation_threshold,
            });
        }

        for (field, value) in [
            ("vif_threshold", self.vif_threshold),
            ("outlier_iqr_multiplier", self.outlier_iqr_multiplier),
            ("accuracy_iqr_multiplier", self.accuracy_iqr_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigValidationError::NonPositive {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.date_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDateColumn);
        }

        if self.staleness_days == 0 {
            return Err(ConfigValidationError::InvalidStaleness(self.staleness_days));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be a positive number)")]
    NonPositive { field: String, value: f64 },

    #[error("Date column name must not be empty")]
    EmptyDateColumn,

    #[error("Invalid staleness window: {0} days (must be at least 1)")]
    InvalidStaleness(u32),
}

impl From<ConfigValidationError> for crate::error::ProfilingError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProfilingError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    low_cardinality_limit: Option<usize>,
    rare_category_threshold: Option<f64>,
    vif_threshold: Option<f64>,
    correlation_threshold: Option<f64>,
    outlier_iqr_multiplier: Option<f64>,
    accuracy_iqr_multiplier: Option<f64>,
    anonymized_sample_rows: Option<usize>,
    date_column: Option<String>,
    staleness_days: Option<u32>,
    exclude_target_from_feature_checks: Option<bool>,
}

impl ProfilerConfigBuilder {
    /// Set the distinct-value limit for the categorical consistency check.
    pub fn low_cardinality_limit(mut self, limit: usize) -> Self {
        self.low_cardinality_limit = Some(limit);
        self
    }

    /// Set the rare category threshold.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.01 = 1%)
    pub fn rare_category_threshold(mut self, threshold: f64) -> Self {
        self.rare_category_threshold = Some(threshold);
        self
    }

    /// Set the VIF reporting threshold.
    pub fn vif_threshold(mut self, threshold: f64) -> Self {
        self.vif_threshold = Some(threshold);
        self
    }

    /// Set the absolute correlation threshold.
    pub fn correlation_threshold(mut self, threshold: f64) -> Self {
        self.correlation_threshold = Some(threshold);
        self
    }

    /// Set the IQR multiplier for the extreme value report.
    pub fn outlier_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.outlier_iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the IQR multiplier for the accuracy sub-score.
    pub fn accuracy_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.accuracy_iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the number of rows in the anonymized preview.
    pub fn anonymized_sample_rows(mut self, rows: usize) -> Self {
        self.anonymized_sample_rows = Some(rows);
        self
    }

    /// Set the column that drives the timeliness sub-score.
    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    /// Set the staleness window in days.
    pub fn staleness_days(mut self, days: u32) -> Self {
        self.staleness_days = Some(days);
        self
    }

    /// Include or exclude the target column from VIF and correlation checks.
    pub fn exclude_target_from_feature_checks(mut self, exclude: bool) -> Self {
        self.exclude_target_from_feature_checks = Some(exclude);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let defaults = ProfilerConfig::default();
        let config = ProfilerConfig {
            low_cardinality_limit: self
                .low_cardinality_limit
                .unwrap_or(defaults.low_cardinality_limit),
            rare_category_threshold: self
                .rare_category_threshold
                .unwrap_or(defaults.rare_category_threshold),
            vif_threshold: self.vif_threshold.unwrap_or(defaults.vif_threshold),
            correlation_threshold: self
                .correlation_threshold
                .unwrap_or(defaults.correlation_threshold),
            outlier_iqr_multiplier: self
                .outlier_iqr_multiplier
                .unwrap_or(defaults.outlier_iqr_multiplier),
            accuracy_iqr_multiplier: self
                .accuracy_iqr_multiplier
                .unwrap_or(defaults.accuracy_iqr_multiplier),
            anonymized_sample_rows: self
                .anonymized_sample_rows
                .unwrap_or(defaults.anonymized_sample_rows),
            date_column: self.date_column.unwrap_or(defaults.date_column),
            staleness_days: self.staleness_days.unwrap_or(defaults.staleness_days),
            exclude_target_from_feature_checks: self
                .exclude_target_from_feature_checks
                .unwrap_or(defaults.exclude_target_from_feature_checks),
        };

        config.validate()?;
        Ok(config)
    }
}
