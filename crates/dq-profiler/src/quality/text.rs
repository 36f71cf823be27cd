use crate::error::Result;
use crate::profiler::statistics::describe;
use crate::types::DescriptiveStats;
use crate::utils::{as_string_series, is_text_series};
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Length distribution and casing checks for text columns.
pub struct TextColumnHandler;

impl TextColumnHandler {
    /// Character-length summary of every text column.
    pub fn long_tail_distribution(df: &DataFrame) -> Result<BTreeMap<String, DescriptiveStats>> {
        let mut report = BTreeMap::new();

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if !is_text_series(series) {
                continue;
            }

            let as_text = as_string_series(series)?;
            let lengths: Vec<f64> = as_text
                .str()?
                .into_iter()
                .flatten()
                .map(|v| v.chars().count() as f64)
                .collect();

            report.insert(series.name().to_string(), describe(&lengths));
        }

        Ok(report)
    }

    /// `true` for text columns where lower-casing merges distinct values.
    pub fn case_variations(df: &DataFrame) -> Result<BTreeMap<String, bool>> {
        let mut report = BTreeMap::new();

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if !is_text_series(series) || series.null_count() == series.len() {
                continue;
            }

            let as_text = as_string_series(series)?;
            let raw: HashSet<&str> = as_text.str()?.into_iter().flatten().collect();
            let lowered: HashSet<String> = raw.iter().map(|v| v.to_lowercase()).collect();

            report.insert(series.name().to_string(), lowered.len() < raw.len());
        }

        Ok(report)
    }
}
