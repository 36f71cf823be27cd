//! Remediation helpers applied between profiling runs.
//!
//! This module provides functionality for:
//! - Recommending a fill strategy per column with missing values
//! - Filling or dropping columns according to a user plan
//! - Renaming and deleting columns
//! - Anonymizing emails and names

mod anonymizer;

pub use anonymizer::{DataAnonymizer, EMAIL_MASK, NAME_PLACEHOLDER};

use crate::error::{ProfilingError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::profiler::statistics::calculate_skewness;
use crate::types::{FillStrategy, NullFillRecommendation};
use crate::utils::{finite_values, is_numeric_dtype};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Columns missing more than this share of rows are recommended for removal.
const DROP_COLUMN_MISSING_PCT: f64 = 40.0;

/// Skewness above which the median is preferred over the mean.
const SKEWED_THRESHOLD: f64 = 1.0;

/// Data cleaner for user driven remediation.
pub struct DataCleaner;

impl DataCleaner {
    /// Suggest a fill strategy for every column containing nulls.
    pub fn recommend_null_filling(df: &DataFrame) -> Result<Vec<NullFillRecommendation>> {
        let rows = df.height();
        let mut recommendations = Vec::new();

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let null_count = series.null_count();
            if null_count == 0 {
                continue;
            }

            let missing_percentage = null_count as f64 / rows as f64 * 100.0;
            let (strategy, reason) = if missing_percentage > DROP_COLUMN_MISSING_PCT {
                (
                    FillStrategy::DropColumn,
                    format!("{:.1}% of values are missing", missing_percentage),
                )
            } else if !is_numeric_dtype(series.dtype()) {
                (
                    FillStrategy::Mode,
                    "Most frequent category for non-numeric data".to_string(),
                )
            } else {
                let skewness = calculate_skewness(&finite_values(series)?);
                if skewness > SKEWED_THRESHOLD {
                    (
                        FillStrategy::Median,
                        format!("Skewed distribution (skewness {:.2})", skewness),
                    )
                } else {
                    (
                        FillStrategy::Mean,
                        format!("Roughly symmetric distribution (skewness {:.2})", skewness),
                    )
                }
            };

            debug!("Recommend {} for '{}'", strategy, series.name());
            recommendations.push(NullFillRecommendation {
                column: series.name().to_string(),
                missing_percentage,
                strategy,
                reason,
            });
        }

        Ok(recommendations)
    }

    /// Apply a fill plan, returning the new frame and the actions taken.
    ///
    /// Columns marked [`FillStrategy::DropColumn`] are removed after all
    /// fills. An unknown column fails the whole plan; a strategy that does
    /// not fit a column's type is skipped with a warning.
    pub fn fill_missing_values(
        df: &DataFrame,
        plan: &[(String, FillStrategy)],
    ) -> Result<(DataFrame, Vec<String>)> {
        for (column, _) in plan {
            if df.column(column).is_err() {
                return Err(ProfilingError::ColumnNotFound(column.clone()));
            }
        }

        let mut df = df.clone();
        let mut actions = Vec::new();
        let mut columns_to_drop: Vec<PlSmallStr> = Vec::new();

        info!("Applying fill plan to {} columns", plan.len());

        for (column, strategy) in plan {
            let result = match strategy {
                FillStrategy::Mean => {
                    StatisticalImputer::apply_numeric_mean(&mut df, column, &mut actions)
                }
                FillStrategy::Median => {
                    StatisticalImputer::apply_numeric_median(&mut df, column, &mut actions)
                }
                FillStrategy::Mode => {
                    StatisticalImputer::apply_mode_imputation(&mut df, column, &mut actions)
                }
                FillStrategy::Unknown => StatisticalImputer::apply_constant_imputation(
                    &mut df,
                    column,
                    "Unknown",
                    &mut actions,
                ),
                FillStrategy::Custom(value) => StatisticalImputer::apply_constant_imputation(
                    &mut df,
                    column,
                    value,
                    &mut actions,
                ),
                FillStrategy::DropColumn => {
                    columns_to_drop.push(column.as_str().into());
                    Ok(())
                }
            };

            if let Err(e) = result {
                warn!("Failed to fill missing values for '{}': {}", column, e);
                actions.push(format!("Could not fill '{}': {}", column, e));
            }
        }

        if !columns_to_drop.is_empty() {
            actions.push(format!(
                "Dropped columns: {}",
                columns_to_drop
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            df = df.drop_many(columns_to_drop);
        }

        Ok((df, actions))
    }

    /// Rename one column.
    pub fn rename_column(df: &DataFrame, old: &str, new: &str) -> Result<DataFrame> {
        if df.column(old).is_err() {
            return Err(ProfilingError::ColumnNotFound(old.to_string()));
        }

        let mut df = df.clone();
        df.rename(old, new.into())
            .context(format!("Renaming '{}' to '{}'", old, new))?;
        debug!("Renamed column '{}' to '{}'", old, new);
        Ok(df)
    }

    /// Remove the given columns.
    pub fn drop_columns(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        if let Some(missing) = columns.iter().find(|c| df.column(c.as_str()).is_err()) {
            return Err(ProfilingError::ColumnNotFound(missing.clone()));
        }

        let cols_ref: Vec<PlSmallStr> = columns.iter().map(|s| s.as_str().into()).collect();
        debug!("Dropping {} columns", cols_ref.len());
        Ok(df.drop_many(cols_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "age" => [Some(25i64), Some(30), None, Some(25), Some(40)],
            "income" => [Some(1.0f64), Some(1.0), Some(1.0), Some(2.0), None],
            "gender" => [Some("F"), None, Some("M"), Some("F"), Some("F")],
            "notes" => [None::<&str>, None, None, Some("x"), None],
            "id" => [1i64, 2, 3, 4, 5],
        }
        .unwrap()
    }

    #[test]
    fn test_recommendations() {
        let recs = DataCleaner::recommend_null_filling(&sample()).unwrap();
        let by_col = |name: &str| recs.iter().find(|r| r.column == name).unwrap();

        assert_eq!(recs.len(), 4);
        assert_eq!(by_col("age").strategy, FillStrategy::Mean);
        assert_eq!(by_col("gender").strategy, FillStrategy::Mode);
        assert_eq!(by_col("notes").strategy, FillStrategy::DropColumn);
        assert_eq!(by_col("notes").missing_percentage, 80.0);
    }

    #[test]
    fn test_skewed_column_recommends_median() {
        let df = df! {
            "v" => [Some(1.0f64), Some(1.0), Some(1.0), Some(1.0), Some(1.0),
                    Some(1.0), Some(1.0), Some(1.0), Some(50.0), None],
        }
        .unwrap();
        let recs = DataCleaner::recommend_null_filling(&df).unwrap();
        assert_eq!(recs[0].strategy, FillStrategy::Median);
    }

    #[test]
    fn test_fill_plan_applies_and_drops() {
        let plan = vec![
            ("age".to_string(), FillStrategy::Median),
            ("gender".to_string(), FillStrategy::Unknown),
            ("notes".to_string(), FillStrategy::DropColumn),
        ];

        let (filled, actions) = DataCleaner::fill_missing_values(&sample(), &plan).unwrap();

        assert_eq!(filled.width(), 4);
        assert_eq!(filled.column("age").unwrap().null_count(), 0);
        assert_eq!(filled.column("gender").unwrap().null_count(), 0);
        assert!(actions.iter().any(|a| a.contains("Dropped columns: notes")));
    }

    #[test]
    fn test_fill_plan_unknown_column() {
        let plan = vec![("missing".to_string(), FillStrategy::Mean)];
        let err = DataCleaner::fill_missing_values(&sample(), &plan).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_type_mismatch_is_reported_not_fatal() {
        let plan = vec![("gender".to_string(), FillStrategy::Mean)];
        let (filled, actions) = DataCleaner::fill_missing_values(&sample(), &plan).unwrap();

        assert_eq!(filled.column("gender").unwrap().null_count(), 1);
        assert!(actions[0].starts_with("Could not fill 'gender'"));
    }

    #[test]
    fn test_rename_and_drop() {
        let renamed = DataCleaner::rename_column(&sample(), "age", "years").unwrap();
        assert!(renamed.column("years").is_ok());
        assert!(renamed.column("age").is_err());

        let dropped = DataCleaner::drop_columns(&renamed, &["id".to_string()]).unwrap();
        assert_eq!(dropped.width(), 4);

        assert!(DataCleaner::rename_column(&sample(), "nope", "x").is_err());
        assert!(DataCleaner::drop_columns(&sample(), &["nope".to_string()]).is_err());
    }
}
