//! Statistical imputation methods.
//!
//! Provides mean, median, mode and constant fills. Each method replaces the
//! column in place and records a human-readable action.

use crate::error::{ProfilingError, Result};
use crate::profiler::statistics::{mean, quantile_sorted, sorted_copy};
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, finite_values, is_numeric_dtype, string_mode,
};
use polars::prelude::*;
use std::collections::HashMap;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill nulls of a numeric column with its mean.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<String>,
    ) -> Result<()> {
        let values = Self::numeric_values(df, col_name, "mean")?;
        match mean(&values) {
            Some(mean_val) => Self::fill_with_value(df, col_name, mean_val, actions, "mean"),
            None => Self::nothing_to_fill(col_name, actions, "mean"),
        }
    }

    /// Fill nulls of a numeric column with its median.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<String>,
    ) -> Result<()> {
        let values = Self::numeric_values(df, col_name, "median")?;
        match quantile_sorted(&sorted_copy(&values), 0.5) {
            Some(median_val) => Self::fill_with_value(df, col_name, median_val, actions, "median"),
            None => Self::nothing_to_fill(col_name, actions, "median"),
        }
    }

    /// Fill nulls with the most frequent value. Ties take the smallest value.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();

        if is_numeric_dtype(series.dtype()) {
            let values = finite_values(&series)?;
            let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
            for v in values {
                counts.entry(v.to_bits()).or_insert((v, 0)).1 += 1;
            }
            let mode = counts
                .into_values()
                .max_by(|(a, a_count), (b, b_count)| {
                    a_count.cmp(b_count).then_with(|| b.total_cmp(a))
                })
                .map(|(v, _)| v);

            return match mode {
                Some(mode_val) => Self::fill_with_value(df, col_name, mode_val, actions, "mode"),
                None => Self::nothing_to_fill(col_name, actions, "mode"),
            };
        }

        match string_mode(&series) {
            Some(mode_val) => {
                let filled = fill_string_nulls(&series, &mode_val)?;
                df.replace(col_name, filled)?;
                actions.push(format!("Filled '{}' with mode: '{}'", col_name, mode_val));
                Ok(())
            }
            None => Self::nothing_to_fill(col_name, actions, "mode"),
        }
    }

    /// Fill nulls with a constant.
    ///
    /// Numeric columns keep their numeric type when the constant parses as a
    /// number; otherwise the column becomes text.
    pub fn apply_constant_imputation(
        df: &mut DataFrame,
        col_name: &str,
        value: &str,
        actions: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();

        let filled = match value.trim().parse::<f64>() {
            Ok(number) if is_numeric_dtype(series.dtype()) && number.is_finite() => {
                fill_numeric_nulls(&series, number)?
            }
            _ => fill_string_nulls(&series, value)?,
        };
        df.replace(col_name, filled)?;

        actions.push(format!(
            "Filled '{}' with constant value: '{}'",
            col_name, value
        ));
        Ok(())
    }

    fn numeric_values(df: &DataFrame, col_name: &str, method: &str) -> Result<Vec<f64>> {
        let series = df.column(col_name)?.as_materialized_series();
        if !is_numeric_dtype(series.dtype()) {
            return Err(ProfilingError::InvalidConfig(format!(
                "Cannot apply {} imputation to non-numeric column '{}' ({})",
                method,
                col_name,
                series.dtype()
            )));
        }
        Ok(finite_values(series)?)
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: f64,
        actions: &mut Vec<String>,
        method: &str,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let filled = fill_numeric_nulls(&series, fill_value)?;
        df.replace(col_name, filled)?;

        actions.push(format!(
            "Filled '{}' with {}: {:.2}",
            col_name, method, fill_value
        ));
        Ok(())
    }

    fn nothing_to_fill(col_name: &str, actions: &mut Vec<String>, method: &str) -> Result<()> {
        actions.push(format!(
            "Skipped {} fill for '{}' (no observed values)",
            method, col_name
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_mean_imputation() {
        let mut df = df! { "age" => [Some(20i64), None, Some(40)] }.unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_mean(&mut df, "age", &mut actions).unwrap();

        assert_eq!(f64_values(&df, "age"), vec![Some(20.0), Some(30.0), Some(40.0)]);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_median_imputation() {
        let mut df = df! { "v" => [Some(1.0f64), Some(2.0), None, Some(100.0)] }.unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "v", &mut actions).unwrap();

        assert_eq!(f64_values(&df, "v")[2], Some(2.0));
    }

    #[test]
    fn test_mean_rejects_text_column() {
        let mut df = df! { "name" => [Some("a"), None] }.unwrap();
        let mut actions = Vec::new();

        let err =
            StatisticalImputer::apply_numeric_mean(&mut df, "name", &mut actions).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_mode_imputation_text() {
        let mut df = df! { "g" => [Some("F"), Some("M"), Some("F"), None] }.unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_mode_imputation(&mut df, "g", &mut actions).unwrap();

        let column = df.column("g").unwrap().as_materialized_series();
        let values: Vec<Option<&str>> = column.str().unwrap().into_iter().collect();
        assert_eq!(values[3], Some("F"));
    }

    #[test]
    fn test_mode_imputation_numeric() {
        let mut df = df! { "n" => [Some(3i64), Some(5), Some(5), None] }.unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_mode_imputation(&mut df, "n", &mut actions).unwrap();

        assert_eq!(f64_values(&df, "n")[3], Some(5.0));
    }

    #[test]
    fn test_constant_imputation_numeric_and_text() {
        let mut df = df! {
            "n" => [Some(1.0f64), None],
            "t" => [Some("x"), None],
        }
        .unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_constant_imputation(&mut df, "n", "0", &mut actions).unwrap();
        StatisticalImputer::apply_constant_imputation(&mut df, "t", "Unknown", &mut actions)
            .unwrap();

        assert_eq!(f64_values(&df, "n"), vec![Some(1.0), Some(0.0)]);
        assert_eq!(df.column("t").unwrap().null_count(), 0);
        assert_eq!(actions.len(), 2);
    }
}
