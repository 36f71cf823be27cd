use crate::error::Result;
use crate::types::{NullFillRecommendation, QualityReport};
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report envelope
// ============================================================================

/// A quality report together with the run metadata.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileEnvelope {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Shape (rows, columns) as loaded
    pub original_shape: (usize, usize),
    /// Shape after remediation steps
    pub final_shape: (usize, usize),
    /// Remediation steps applied before profiling
    pub remediation_actions: Vec<String>,
    /// Suggested fill strategies for the profiled frame
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<NullFillRecommendation>,
    pub report: QualityReport,
}

/// Writes reports and cleaned datasets to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Wrap a report with timestamp and shape metadata.
    pub fn build_envelope(
        input_file: &str,
        original_df: &DataFrame,
        final_df: &DataFrame,
        remediation_actions: Vec<String>,
        recommendations: Vec<NullFillRecommendation>,
        report: QualityReport,
    ) -> ProfileEnvelope {
        ProfileEnvelope {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            original_shape: original_df.shape(),
            final_shape: final_df.shape(),
            remediation_actions,
            recommendations,
            report,
        }
    }

    /// Write `<stem>.csv` and `<stem>.json` (array of records).
    pub fn export_dataset(&self, df: &DataFrame, stem: &str) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.output_dir)?;
        let mut df = df.clone();

        let csv_path = self.output_dir.join(format!("{}.csv", stem));
        let mut csv_file = File::create(&csv_path)?;
        CsvWriter::new(&mut csv_file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)?;
        info!("Dataset saved: {}", csv_path.display());

        let json_path = self.output_dir.join(format!("{}.json", stem));
        let mut json_file = File::create(&json_path)?;
        JsonWriter::new(&mut json_file)
            .with_json_format(JsonFormat::Json)
            .finish(&mut df)?;
        info!("Dataset saved: {}", json_path.display());

        Ok((csv_path, json_path))
    }

    /// Write a report envelope to `<stem>_report.json`.
    pub fn write_report_to_file(&self, envelope: &ProfileEnvelope, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(envelope)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::generate_report;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dq_profiler_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_export_dataset_writes_both_formats() {
        let dir = temp_dir("export");
        let df = df! { "a" => [1i64, 2], "b" => ["x", "y"] }.unwrap();

        let (csv_path, json_path) = ReportGenerator::new(dir.clone())
            .export_dataset(&df, "clean")
            .unwrap();

        let csv = fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("a,b"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["b"], serde_json::json!("y"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = temp_dir("report");
        let df = df! { "a" => [1i64, 2, 2] }.unwrap();
        let report = generate_report(&df, None).unwrap();
        let envelope =
            ReportGenerator::build_envelope("in.csv", &df, &df, Vec::new(), Vec::new(), report);

        let path = ReportGenerator::new(dir.clone())
            .write_report_to_file(&envelope, "in")
            .unwrap();
        assert!(path.ends_with("in_report.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input_file"], serde_json::json!("in.csv"));
        assert_eq!(json["original_shape"], serde_json::json!([3, 1]));
        assert_eq!(
            json["report"]["Duplicate Report"]["Total Duplicates"],
            serde_json::json!(1)
        );
        assert!(json.get("recommendations").is_none());

        fs::remove_dir_all(&dir).ok();
    }
}
