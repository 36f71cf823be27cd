use crate::error::{ProfilingError, Result};
use crate::types::ClassShare;
use crate::utils::as_string_series;
use polars::prelude::*;
use std::collections::HashMap;

/// Label used for rows whose target cell is null.
pub const MISSING_CLASS_LABEL: &str = "<missing>";

/// Class distribution of a target column.
pub struct ClassImbalanceAnalyzer;

impl ClassImbalanceAnalyzer {
    /// One entry per class, most frequent first. Ties are ordered by label.
    pub fn analyze(df: &DataFrame, target: &str) -> Result<Vec<ClassShare>> {
        let column = df
            .column(target)
            .map_err(|_| ProfilingError::ColumnNotFound(target.to_string()))?;
        let as_text = as_string_series(column.as_materialized_series())?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in as_text.str()?.into_iter() {
            let label = value.unwrap_or(MISSING_CLASS_LABEL).to_string();
            *counts.entry(label).or_insert(0) += 1;
        }

        let rows = df.height() as f64;
        let mut shares: Vec<ClassShare> = counts
            .into_iter()
            .map(|(class, count)| ClassShare {
                percentage: count as f64 / rows * 100.0,
                class,
                count,
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.class.cmp(&b.class)));

        Ok(shares)
    }
}
