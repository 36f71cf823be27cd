use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::profiler::DataTypeHandler;
use crate::profiler::statistics::iqr_fences;
use crate::types::OutlierSummary;
use crate::utils::finite_values;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// IQR based extreme value detection for numeric columns.
pub struct OutlierDetector;

impl OutlierDetector {
    /// Numeric columns with at least one value outside the Tukey fences.
    pub fn analyze(
        df: &DataFrame,
        config: &ProfilerConfig,
    ) -> Result<BTreeMap<String, OutlierSummary>> {
        let mut report = BTreeMap::new();

        for name in DataTypeHandler::numerical_columns(df) {
            let values = finite_values(df.column(&name)?.as_materialized_series())?;
            if let Some(summary) = Self::summarize(&values, config.outlier_iqr_multiplier) {
                debug!("'{}': {} outliers", name, summary.count);
                report.insert(name, summary);
            }
        }

        Ok(report)
    }

    /// Outlier summary of one column, `None` when every value is inside the fences.
    pub(crate) fn summarize(values: &[f64], multiplier: f64) -> Option<OutlierSummary> {
        let (lower_bound, upper_bound) = iqr_fences(values, multiplier)?;

        let outliers: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| *v < lower_bound || *v > upper_bound)
            .collect();
        if outliers.is_empty() {
            return None;
        }

        Some(OutlierSummary {
            count: outliers.len(),
            lower_bound,
            upper_bound,
            min_outlier: outliers.iter().copied().fold(f64::INFINITY, f64::min),
            max_outlier: outliers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// Number of values outside the fences.
    pub(crate) fn count_outliers(values: &[f64], multiplier: f64) -> usize {
        Self::summarize(values, multiplier).map_or(0, |s| s.count)
    }
}
