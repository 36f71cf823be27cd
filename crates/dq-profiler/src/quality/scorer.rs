//! Composite data quality score.
//!
//! Five sub-scores always apply; Timeliness joins them when the frame has
//! the configured date column. Each sub-score is `100 - violations / base * 100`
//! clamped to `[0, 100]`.

use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::profiler::DataTypeHandler;
use crate::quality::{DuplicateAnalyzer, MissingValueAnalyzer, OutlierDetector};
use crate::types::{DataQualityScore, QualityBreakdown};
use crate::utils::{as_string_series, finite_values, is_text_series, nested_as_text};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Weights (Completeness, Uniqueness, Validity, Accuracy, Consistency, Timeliness).
const WEIGHTS_WITH_TIMELINESS: [f64; 6] = [0.30, 0.20, 0.15, 0.15, 0.10, 0.10];

/// Weights (Completeness, Uniqueness, Validity, Accuracy, Consistency).
const WEIGHTS_WITHOUT_TIMELINESS: [f64; 5] = [0.33, 0.22, 0.17, 0.17, 0.11];

/// Any character outside ASCII letters, digits and space.
static INVALID_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 ]").expect("Invalid regex: invalid char"));

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Computes the weighted quality score.
pub struct DataQualityScorer;

impl DataQualityScorer {
    pub fn score(df: &DataFrame, config: &ProfilerConfig) -> Result<DataQualityScore> {
        let breakdown = QualityBreakdown {
            completeness: Self::completeness(df)?,
            uniqueness: Self::uniqueness(df)?,
            validity: Self::validity(df)?,
            accuracy: Self::accuracy(df, config)?,
            consistency: Self::consistency(df)?,
            timeliness: Self::timeliness(df, config)?,
        };

        let overall = Self::overall(&breakdown);
        debug!("Quality score {:.2}: {:?}", overall, breakdown);

        Ok(DataQualityScore(overall, breakdown))
    }

    /// Weighted sum of the sub-scores, rounded to two decimals.
    pub fn overall(breakdown: &QualityBreakdown) -> f64 {
        let base = [
            breakdown.completeness,
            breakdown.uniqueness,
            breakdown.validity,
            breakdown.accuracy,
            breakdown.consistency,
        ];

        let weighted: f64 = match breakdown.timeliness {
            Some(timeliness) => base
                .iter()
                .chain(std::iter::once(&timeliness))
                .zip(WEIGHTS_WITH_TIMELINESS)
                .map(|(score, weight)| score * weight)
                .sum(),
            None => base
                .iter()
                .zip(WEIGHTS_WITHOUT_TIMELINESS)
                .map(|(score, weight)| score * weight)
                .sum(),
        };

        (weighted.clamp(0.0, 100.0) * 100.0).round() / 100.0
    }

    /// Share of cells that are neither null nor empty text.
    pub fn completeness(df: &DataFrame) -> Result<f64> {
        let total = df.height() * df.width();
        let mut missing = 0;
        for column in df.get_columns() {
            missing += MissingValueAnalyzer::missing_cells(column.as_materialized_series())?;
        }
        Ok(penalty_score(missing, total))
    }

    /// Duplicate rows over the columns that hold more than one distinct value.
    pub fn uniqueness(df: &DataFrame) -> Result<f64> {
        let flat = nested_as_text(df)?;
        let mut varying = Vec::new();
        for column in flat.get_columns() {
            if column.as_materialized_series().drop_nulls().n_unique()? > 1 {
                varying.push(column.name().clone());
            }
        }

        let duplicates = if varying.is_empty() {
            0
        } else {
            DuplicateAnalyzer::count_duplicate_rows(&flat.select(varying)?)?
        };
        Ok(penalty_score(duplicates, df.height()))
    }

    /// Text cells containing a character outside `[a-zA-Z0-9 ]`.
    pub fn validity(df: &DataFrame) -> Result<f64> {
        let total = df.height() * df.width();
        let mut invalid = 0;

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if !is_text_series(series) {
                continue;
            }
            let as_text = as_string_series(series)?;
            invalid += as_text
                .str()?
                .into_iter()
                .flatten()
                .filter(|v| INVALID_CHAR.is_match(v))
                .count();
        }

        Ok(penalty_score(invalid, total))
    }

    /// Numeric values beyond the wide (3 x IQR by default) fences.
    pub fn accuracy(df: &DataFrame, config: &ProfilerConfig) -> Result<f64> {
        let mut extreme = 0;
        for name in DataTypeHandler::numerical_columns(df) {
            let values = finite_values(df.column(&name)?.as_materialized_series())?;
            extreme += OutlierDetector::count_outliers(&values, config.accuracy_iqr_multiplier);
        }
        Ok(penalty_score(extreme, df.height()))
    }

    /// Distinct text values that only differ from another by surrounding whitespace.
    pub fn consistency(df: &DataFrame) -> Result<f64> {
        let mut variants = 0;

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if !is_text_series(series) {
                continue;
            }
            let as_text = as_string_series(series)?;
            let raw: HashSet<&str> = as_text.str()?.into_iter().flatten().collect();
            let trimmed: HashSet<&str> = raw.iter().map(|v| v.trim()).collect();
            variants += raw.len() - trimmed.len();
        }

        Ok(penalty_score(variants, df.height()))
    }

    /// Rows older than `staleness_days` before the newest date.
    ///
    /// `None` when the frame has no date column. Unparseable cells are
    /// treated as missing and never count as stale.
    pub fn timeliness(df: &DataFrame, config: &ProfilerConfig) -> Result<Option<f64>> {
        let Ok(column) = df.column(&config.date_column) else {
            return Ok(None);
        };

        let dates = parse_datetimes(column.as_materialized_series())?;
        let Some(newest) = dates.iter().flatten().max().copied() else {
            debug!("No parseable values in '{}'", config.date_column);
            return Ok(Some(100.0));
        };

        let cutoff = newest - Duration::days(i64::from(config.staleness_days));
        let stale = dates.iter().flatten().filter(|d| **d < cutoff).count();

        Ok(Some(penalty_score(stale, df.height())))
    }
}

/// `100 - violations / base * 100`, clamped; an empty base scores 100.
fn penalty_score(violations: usize, base: usize) -> f64 {
    if base == 0 {
        return 100.0;
    }
    (100.0 - violations as f64 / base as f64 * 100.0).clamp(0.0, 100.0)
}

/// Read a column as timestamps; cells that cannot be interpreted become `None`.
pub(crate) fn parse_datetimes(series: &Series) -> Result<Vec<Option<NaiveDateTime>>> {
    let parsed = match series.dtype() {
        DataType::Date => series
            .date()?
            .as_date_iter()
            .map(|date| date.and_then(|d| d.and_hms_opt(0, 0, 0)))
            .collect(),
        DataType::Datetime(_, _) => series.datetime()?.as_datetime_iter().collect(),
        _ => {
            let as_text = as_string_series(series)?;
            as_text
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_datetime_str))
                .collect()
        }
    };

    Ok(parsed)
}

fn parse_datetime_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
