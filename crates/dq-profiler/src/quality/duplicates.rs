use crate::error::Result;
use crate::types::DuplicateReport;
use crate::utils::{as_string_series, is_text_series, nested_as_text};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Exact duplicate rows and per-column near-duplicates.
pub struct DuplicateAnalyzer;

impl DuplicateAnalyzer {
    pub fn analyze(df: &DataFrame) -> Result<DuplicateReport> {
        Ok(DuplicateReport {
            total_duplicates: Self::count_duplicate_rows(df)?,
        })
    }

    /// Rows identical to an earlier row across all columns.
    pub fn count_duplicate_rows(df: &DataFrame) -> Result<usize> {
        if df.width() == 0 || df.height() == 0 {
            return Ok(0);
        }

        let unique =
            nested_as_text(df)?.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - unique.height())
    }

    /// For each text column, the number of rows whose value also appears in
    /// another row of that column. Nulls are compared like any other value.
    pub fn near_duplicates(df: &DataFrame) -> Result<BTreeMap<String, usize>> {
        let mut report = BTreeMap::new();

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            if !is_text_series(series) {
                continue;
            }

            let as_text = as_string_series(series)?;
            let values: Vec<Option<&str>> = as_text.str()?.into_iter().collect();

            let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
            for value in &values {
                *counts.entry(*value).or_insert(0) += 1;
            }

            let shared = values.iter().filter(|v| counts[*v] > 1).count();
            report.insert(series.name().to_string(), shared);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_duplicates_ignore_first_occurrence() {
        let df = df! {
            "a" => [1i64, 1, 2, 1],
            "b" => ["x", "x", "y", "x"],
        }
        .unwrap();

        assert_eq!(DuplicateAnalyzer::analyze(&df).unwrap().total_duplicates, 2);
    }

    #[test]
    fn test_duplicate_count_invariant_under_permutation() {
        let df = df! {
            "a" => [3i64, 1, 3, 2, 1],
            "b" => ["c", "a", "c", "b", "z"],
        }
        .unwrap();
        let permuted = df! {
            "a" => [1i64, 2, 3, 1, 3],
            "b" => ["z", "b", "c", "a", "c"],
        }
        .unwrap();

        assert_eq!(
            DuplicateAnalyzer::count_duplicate_rows(&df).unwrap(),
            DuplicateAnalyzer::count_duplicate_rows(&permuted).unwrap()
        );
    }

    #[test]
    fn test_near_duplicates_per_text_column() {
        let df = df! {
            "city" => [Some("Paris"), Some("Rome"), Some("Paris"), None, None],
            "code" => ["a", "b", "c", "d", "e"],
            "n" => [1i64, 1, 1, 1, 1],
        }
        .unwrap();

        let report = DuplicateAnalyzer::near_duplicates(&df).unwrap();
        // Two "Paris" rows and two null rows
        assert_eq!(report["city"], 4);
        assert_eq!(report["code"], 0);
        assert!(!report.contains_key("n"));
    }

    #[test]
    fn test_empty_frame_has_no_duplicates() {
        assert_eq!(
            DuplicateAnalyzer::count_duplicate_rows(&DataFrame::empty()).unwrap(),
            0
        );
    }
}
