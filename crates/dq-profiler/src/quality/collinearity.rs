use crate::config::ProfilerConfig;
use crate::error::{ProfilingError, Result};
use crate::profiler::DataTypeHandler;
use crate::profiler::statistics::variance_inflation_factors;
use crate::types::{SectionOutcome, VifEntry, VifReport};
use polars::prelude::*;
use tracing::debug;

/// Variance inflation factors over the numeric view of a frame.
pub struct MulticollinearityChecker;

impl MulticollinearityChecker {
    /// Features whose VIF exceeds `vif_threshold`.
    ///
    /// Columns that are not fully numeric after coercion are skipped. Fewer
    /// than two usable columns yields an `INSUFFICIENT_DATA` marker.
    pub fn analyze(
        df: &DataFrame,
        target: Option<&str>,
        config: &ProfilerConfig,
    ) -> Result<SectionOutcome<VifReport>> {
        let exclude = target.filter(|_| config.exclude_target_from_feature_checks);
        let coerced = DataTypeHandler::coerce_numeric(df, exclude)?;

        let mut names = Vec::new();
        let mut columns: Vec<Column> = Vec::new();
        let mut skipped_columns = Vec::new();

        for (name, cells) in coerced {
            match cells.into_iter().collect::<Option<Vec<f64>>>() {
                Some(values) => {
                    columns.push(Column::new(name.as_str().into(), values));
                    names.push(name);
                }
                None => {
                    debug!("VIF: skipping '{}' (missing or non-numeric cells)", name);
                    skipped_columns.push(name);
                }
            }
        }

        if columns.len() < 2 {
            let err = ProfilingError::InsufficientData {
                analysis: "VIF".to_string(),
                required: 2,
                found: columns.len(),
            };
            return Ok(SectionOutcome::unavailable(&err));
        }

        let features = DataFrame::new(columns)?.to_ndarray::<Float64Type>(IndexOrder::C)?;
        let vifs = variance_inflation_factors(&features);
        let high_vif = names
            .into_iter()
            .zip(vifs)
            .filter(|(_, vif)| *vif > config.vif_threshold)
            .map(|(feature, vif)| VifEntry { feature, vif })
            .collect();

        Ok(SectionOutcome::Ready(VifReport {
            high_vif,
            skipped_columns,
        }))
    }
}
