use crate::cleaner::DataAnonymizer;
use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::profiler::DataTypeHandler;
use crate::quality::{
    CategoricalValueChecker, ClassImbalanceAnalyzer, CorrelationHandler, DataQualityScorer,
    DuplicateAnalyzer, MissingValueAnalyzer, MulticollinearityChecker, OutlierDetector,
    TextColumnHandler,
};
use crate::types::{ClassShare, QualityReport, SectionOutcome};
use polars::prelude::DataFrame;
use std::time::Instant;
use tracing::{info, warn};

/// Runs every analyzer over one frame and assembles the report.
#[derive(Debug, Clone, Default)]
pub struct DataSummary {
    config: ProfilerConfig,
}

impl DataSummary {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Build the full report.
    ///
    /// Only an invalid configuration fails the call. A section that cannot
    /// be computed holds an error marker and the remaining sections are
    /// still filled in.
    pub fn generate_report(&self, df: &DataFrame, target: Option<&str>) -> Result<QualityReport> {
        self.config.validate()?;

        let start = Instant::now();
        let config = &self.config;
        info!(
            "Profiling {} rows x {} columns{}",
            df.height(),
            df.width(),
            target.map(|t| format!(" (target '{}')", t)).unwrap_or_default()
        );

        let (numerical, categorical) = DataTypeHandler::partition(df);

        let report = QualityReport {
            missing_values: section("Missing Values Report", MissingValueAnalyzer::analyze(df)),
            duplicates: section("Duplicate Report", DuplicateAnalyzer::analyze(df)),
            near_duplicates: section(
                "Near Duplicates in Text Columns",
                DuplicateAnalyzer::near_duplicates(df),
            ),
            anonymized_sample: section(
                "Anonymized Data Sample",
                DataAnonymizer::sample(df, config.anonymized_sample_rows),
            ),
            numerical_columns: SectionOutcome::Ready(numerical),
            categorical_columns: SectionOutcome::Ready(categorical),
            categorical_issues: section(
                "Categorical Value Issues",
                CategoricalValueChecker::check_consistency(df, config),
            ),
            rare_categories: section(
                "Rare Categories (<1%)",
                CategoricalValueChecker::rare_categories(df, config),
            ),
            multicollinearity: nested_section(
                "Multicollinearity (High VIF Features)",
                MulticollinearityChecker::analyze(df, target, config),
            ),
            correlated_features: nested_section(
                "Highly Correlated Features",
                CorrelationHandler::analyze(df, target, config),
            ),
            extreme_values: section("Extreme Value Report", OutlierDetector::analyze(df, config)),
            text_lengths: section(
                "Long-Tail Text Distribution",
                TextColumnHandler::long_tail_distribution(df),
            ),
            case_variations: section(
                "Case Variations in Text Columns",
                TextColumnHandler::case_variations(df),
            ),
            quality_score: section("Data Quality Score", DataQualityScorer::score(df, config)),
            class_imbalance: target.map(|t| {
                section("Class Imbalance Report", ClassImbalanceAnalyzer::analyze(df, t))
            }),
        };

        info!(
            "Profiling finished in {}ms ({} sections unavailable)",
            start.elapsed().as_millis(),
            report.failed_sections().len()
        );

        Ok(report)
    }
}

fn section<T>(name: &str, result: Result<T>) -> SectionOutcome<T> {
    match result {
        Ok(value) => SectionOutcome::Ready(value),
        Err(e) => {
            warn!("Section '{}' failed: {}", name, e);
            SectionOutcome::unavailable(&e)
        }
    }
}

fn nested_section<T>(name: &str, result: Result<SectionOutcome<T>>) -> SectionOutcome<T> {
    match section(name, result) {
        SectionOutcome::Ready(inner) => inner,
        SectionOutcome::Unavailable(err) => SectionOutcome::Unavailable(err),
    }
}

/// Profile a frame with the default thresholds.
pub fn generate_report(df: &DataFrame, target: Option<&str>) -> Result<QualityReport> {
    DataSummary::default().generate_report(df, target)
}

/// Class distribution of `target`, most frequent class first.
pub fn analyze_class_imbalance(df: &DataFrame, target: &str) -> Result<Vec<ClassShare>> {
    ClassImbalanceAnalyzer::analyze(df, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        df! {
            "Name" => ["Alice", "Bob", "Cara"],
            "Age" => [Some(30i64), None, Some(41)],
            "Score" => [1.0f64, 2.0, 3.0],
        }
        .unwrap()
    }

    #[test]
    fn test_all_fixed_keys_present() {
        let report = generate_report(&frame(), None).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        for key in [
            "Missing Values Report",
            "Duplicate Report",
            "Near Duplicates in Text Columns",
            "Anonymized Data Sample",
            "Numerical Columns",
            "Categorical Columns",
            "Categorical Value Issues",
            "Rare Categories (<1%)",
            "Multicollinearity (High VIF Features)",
            "Highly Correlated Features",
            "Extreme Value Report",
            "Long-Tail Text Distribution",
            "Case Variations in Text Columns",
            "Data Quality Score",
        ] {
            assert!(keys.contains(&key), "missing key {}", key);
        }
        assert!(!keys.contains(&"Class Imbalance Report"));
    }

    #[test]
    fn test_missing_target_is_isolated() {
        let report = generate_report(&frame(), Some("Target")).unwrap();

        let class_section = report.class_imbalance.as_ref().unwrap();
        assert_eq!(class_section.error().unwrap().code, "COLUMN_NOT_FOUND");
        assert_eq!(report.failed_sections(), vec!["Class Imbalance Report"]);
        assert!(report.missing_values.is_ready());
    }

    #[test]
    fn test_insufficient_numeric_columns_marked() {
        let df = df! { "t" => ["a", "b"], "n" => [1i64, 2] }.unwrap();
        let report = generate_report(&df, None).unwrap();

        assert_eq!(
            report.multicollinearity.error().unwrap().code,
            "INSUFFICIENT_DATA"
        );
        assert!(report.quality_score.is_ready());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ProfilerConfig {
            correlation_threshold: 2.0,
            ..ProfilerConfig::default()
        };
        let err = DataSummary::new(config).generate_report(&frame(), None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
