use crate::config::ProfilerConfig;
use crate::error::{ProfilingError, Result};
use crate::profiler::DataTypeHandler;
use crate::profiler::statistics::pearson_pairwise;
use crate::types::{CorrelatedPair, CorrelationReport, SectionOutcome};
use polars::prelude::DataFrame;
use tracing::debug;

/// Flags strongly correlated feature pairs as drop candidates.
pub struct CorrelationHandler;

impl CorrelationHandler {
    /// Columns in any pair whose absolute Pearson correlation exceeds
    /// `correlation_threshold`, listed in frame order.
    pub fn analyze(
        df: &DataFrame,
        target: Option<&str>,
        config: &ProfilerConfig,
    ) -> Result<SectionOutcome<CorrelationReport>> {
        let exclude = target.filter(|_| config.exclude_target_from_feature_checks);

        let mut usable = Vec::new();
        let mut skipped_columns = Vec::new();
        for (name, cells) in DataTypeHandler::coerce_numeric(df, exclude)? {
            if cells.iter().all(Option::is_none) {
                debug!("Correlation: skipping '{}' (no numeric cells)", name);
                skipped_columns.push(name);
            } else {
                usable.push((name, cells));
            }
        }

        if usable.len() < 2 {
            let err = ProfilingError::InsufficientData {
                analysis: "Correlation".to_string(),
                required: 2,
                found: usable.len(),
            };
            return Ok(SectionOutcome::unavailable(&err));
        }

        let mut flagged = vec![false; usable.len()];
        let mut pairs = Vec::new();

        for i in 0..usable.len() {
            for j in (i + 1)..usable.len() {
                let Some(r) = pearson_pairwise(&usable[i].1, &usable[j].1) else {
                    continue;
                };
                if r.abs() > config.correlation_threshold {
                    flagged[i] = true;
                    flagged[j] = true;
                    pairs.push(CorrelatedPair {
                        left: usable[i].0.clone(),
                        right: usable[j].0.clone(),
                        correlation: r,
                    });
                }
            }
        }

        let features = usable
            .into_iter()
            .zip(flagged)
            .filter(|(_, hit)| *hit)
            .map(|((name, _), _)| name)
            .collect();

        Ok(SectionOutcome::Ready(CorrelationReport {
            features,
            pairs,
            skipped_columns,
        }))
    }
}
