use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::profiler::DataTypeHandler;
use crate::types::CategoricalIssue;
use crate::utils::as_string_series;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Casing/whitespace consistency and rare values in categorical columns.
pub struct CategoricalValueChecker;

impl CategoricalValueChecker {
    /// Canonical value sets for low-cardinality categorical columns.
    pub fn check_consistency(
        df: &DataFrame,
        config: &ProfilerConfig,
    ) -> Result<BTreeMap<String, CategoricalIssue>> {
        let mut report = BTreeMap::new();

        for name in DataTypeHandler::categorical_columns(df) {
            let counts = Self::value_counts(df, &name)?;
            if counts.is_empty() || counts.len() > config.low_cardinality_limit {
                debug!(
                    "Skipping consistency check for '{}' ({} distinct values)",
                    name,
                    counts.len()
                );
                continue;
            }

            let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
            for raw in counts.keys() {
                groups
                    .entry(raw.trim().to_lowercase())
                    .or_default()
                    .insert(raw.clone());
            }

            let canonical_values = groups.keys().cloned().collect();
            let variants = groups
                .into_iter()
                .filter(|(_, raws)| raws.len() > 1)
                .map(|(canonical, raws)| (canonical, raws.into_iter().collect()))
                .collect();

            report.insert(
                name,
                CategoricalIssue {
                    canonical_values,
                    variants,
                },
            );
        }

        Ok(report)
    }

    /// Values present in fewer than `rare_category_threshold` of all rows.
    pub fn rare_categories(
        df: &DataFrame,
        config: &ProfilerConfig,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        let cutoff = config.rare_category_threshold * df.height() as f64;
        let mut report = BTreeMap::new();

        for name in DataTypeHandler::categorical_columns(df) {
            let mut rare: Vec<String> = Self::value_counts(df, &name)?
                .into_iter()
                .filter(|(_, count)| (*count as f64) < cutoff)
                .map(|(value, _)| value)
                .collect();

            if !rare.is_empty() {
                rare.sort();
                report.insert(name, rare);
            }
        }

        Ok(report)
    }

    /// Occurrences of each non-null value, compared as text.
    fn value_counts(df: &DataFrame, name: &str) -> Result<HashMap<String, usize>> {
        let series = df.column(name)?.as_materialized_series();
        let as_text = as_string_series(series)?;

        let mut counts = HashMap::new();
        for value in as_text.str()?.into_iter().flatten() {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }

        Ok(counts)
    }
}
