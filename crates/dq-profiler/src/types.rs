use crate::error::ProfilingError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Section payloads
// ============================================================================

/// Missing cells of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueRow {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    #[serde(rename = "Total Duplicates")]
    pub total_duplicates: usize,
}

/// One class of the target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub class: String,
    pub count: usize,
    pub percentage: f64,
}

/// A small table rendered row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSample {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Case/whitespace inconsistencies in a low-cardinality column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalIssue {
    /// Sorted set of lower-cased, trimmed values.
    pub canonical_values: Vec<String>,
    /// Canonical value -> raw spellings, only where several spellings collapse.
    pub variants: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VifEntry {
    pub feature: String,
    #[serde(serialize_with = "serialize_unbounded")]
    pub vif: f64,
}

/// Features whose VIF exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VifReport {
    pub high_vif: Vec<VifEntry>,
    pub skipped_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub left: String,
    pub right: String,
    pub correlation: f64,
}

/// Columns taking part in at least one strongly correlated pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub features: Vec<String>,
    pub pairs: Vec<CorrelatedPair>,
    pub skipped_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub count: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub min_outlier: f64,
    pub max_outlier: f64,
}

/// Distribution summary, shaped like a `describe()` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Sub-scores of the composite quality score, each in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    #[serde(rename = "Completeness")]
    pub completeness: f64,
    #[serde(rename = "Uniqueness")]
    pub uniqueness: f64,
    #[serde(rename = "Validity")]
    pub validity: f64,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Consistency")]
    pub consistency: f64,
    #[serde(rename = "Timeliness", skip_serializing_if = "Option::is_none", default)]
    pub timeliness: Option<f64>,
}

/// Overall score (two decimals) and its breakdown; serializes as `[overall, breakdown]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityScore(pub f64, pub QualityBreakdown);

impl DataQualityScore {
    pub fn overall(&self) -> f64 {
        self.0
    }

    pub fn breakdown(&self) -> &QualityBreakdown {
        &self.1
    }
}

fn serialize_unbounded<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
    } else {
        serializer.serialize_f64(*value)
    }
}

// ============================================================================
// Report sections
// ============================================================================

/// Structured marker stored in place of a section that could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionError {
    pub code: String,
    pub message: String,
}

impl From<&ProfilingError> for SectionError {
    fn from(err: &ProfilingError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Either the payload of a report section or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionOutcome<T> {
    Ready(T),
    Unavailable(SectionError),
}

impl<T> SectionOutcome<T> {
    pub fn unavailable(err: &ProfilingError) -> Self {
        Self::Unavailable(err.into())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SectionError> {
        match self {
            Self::Ready(_) => None,
            Self::Unavailable(err) => Some(err),
        }
    }
}

/// The full profiling report. Every field maps to one fixed JSON key.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    #[serde(rename = "Missing Values Report")]
    pub missing_values: SectionOutcome<Vec<MissingValueRow>>,
    #[serde(rename = "Duplicate Report")]
    pub duplicates: SectionOutcome<DuplicateReport>,
    #[serde(rename = "Near Duplicates in Text Columns")]
    pub near_duplicates: SectionOutcome<BTreeMap<String, usize>>,
    #[serde(rename = "Anonymized Data Sample")]
    pub anonymized_sample: SectionOutcome<TableSample>,
    #[serde(rename = "Numerical Columns")]
    pub numerical_columns: SectionOutcome<Vec<String>>,
    #[serde(rename = "Categorical Columns")]
    pub categorical_columns: SectionOutcome<Vec<String>>,
    #[serde(rename = "Categorical Value Issues")]
    pub categorical_issues: SectionOutcome<BTreeMap<String, CategoricalIssue>>,
    #[serde(rename = "Rare Categories (<1%)")]
    pub rare_categories: SectionOutcome<BTreeMap<String, Vec<String>>>,
    #[serde(rename = "Multicollinearity (High VIF Features)")]
    pub multicollinearity: SectionOutcome<VifReport>,
    #[serde(rename = "Highly Correlated Features")]
    pub correlated_features: SectionOutcome<CorrelationReport>,
    #[serde(rename = "Extreme Value Report")]
    pub extreme_values: SectionOutcome<BTreeMap<String, OutlierSummary>>,
    #[serde(rename = "Long-Tail Text Distribution")]
    pub text_lengths: SectionOutcome<BTreeMap<String, DescriptiveStats>>,
    #[serde(rename = "Case Variations in Text Columns")]
    pub case_variations: SectionOutcome<BTreeMap<String, bool>>,
    #[serde(rename = "Data Quality Score")]
    pub quality_score: SectionOutcome<DataQualityScore>,
    #[serde(rename = "Class Imbalance Report", skip_serializing_if = "Option::is_none")]
    pub class_imbalance: Option<SectionOutcome<Vec<ClassShare>>>,
}

impl QualityReport {
    /// Section names whose computation failed.
    pub fn failed_sections(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        let mut check = |name: &'static str, ok: bool| {
            if !ok {
                failed.push(name);
            }
        };

        check("Missing Values Report", self.missing_values.is_ready());
        check("Duplicate Report", self.duplicates.is_ready());
        check("Near Duplicates in Text Columns", self.near_duplicates.is_ready());
        check("Anonymized Data Sample", self.anonymized_sample.is_ready());
        check("Numerical Columns", self.numerical_columns.is_ready());
        check("Categorical Columns", self.categorical_columns.is_ready());
        check("Categorical Value Issues", self.categorical_issues.is_ready());
        check("Rare Categories (<1%)", self.rare_categories.is_ready());
        check(
            "Multicollinearity (High VIF Features)",
            self.multicollinearity.is_ready(),
        );
        check("Highly Correlated Features", self.correlated_features.is_ready());
        check("Extreme Value Report", self.extreme_values.is_ready());
        check("Long-Tail Text Distribution", self.text_lengths.is_ready());
        check("Case Variations in Text Columns", self.case_variations.is_ready());
        check("Data Quality Score", self.quality_score.is_ready());
        if let Some(class_imbalance) = &self.class_imbalance {
            check("Class Imbalance Report", class_imbalance.is_ready());
        }

        failed
    }
}

// ============================================================================
// Remediation types
// ============================================================================

/// How to treat the missing cells of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    Mean,
    Median,
    Mode,
    /// Fill with the literal `"Unknown"`.
    Unknown,
    /// Fill with a user supplied value.
    Custom(String),
    DropColumn,
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Median => write!(f, "median"),
            Self::Mode => write!(f, "mode"),
            Self::Unknown => write!(f, "unknown"),
            Self::Custom(value) => write!(f, "custom:{}", value),
            Self::DropColumn => write!(f, "drop"),
        }
    }
}

impl FromStr for FillStrategy {
    type Err = ProfilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(value) = s.strip_prefix("custom:") {
            return Ok(Self::Custom(value.to_string()));
        }

        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "unknown" => Ok(Self::Unknown),
            "drop" | "drop_column" => Ok(Self::DropColumn),
            other => Err(ProfilingError::InvalidConfig(format!(
                "Unknown fill strategy '{}' (expected mean, median, mode, unknown, drop or custom:<value>)",
                other
            ))),
        }
    }
}

/// Suggested treatment for a column with missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullFillRecommendation {
    pub column: String,
    pub missing_percentage: f64,
    pub strategy: FillStrategy,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_score_serializes_as_pair() {
        let score = DataQualityScore(
            87.5,
            QualityBreakdown {
                completeness: 90.0,
                uniqueness: 100.0,
                validity: 80.0,
                accuracy: 100.0,
                consistency: 50.0,
                timeliness: None,
            },
        );

        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json[0], serde_json::json!(87.5));
        assert_eq!(json[1]["Completeness"], serde_json::json!(90.0));
        assert!(json[1].get("Timeliness").is_none());
    }

    #[test]
    fn test_infinite_vif_serializes_as_string() {
        let entry = VifEntry {
            feature: "x".to_string(),
            vif: f64::INFINITY,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["vif"], serde_json::json!("inf"));
    }

    #[test]
    fn test_section_outcome_untagged() {
        let ready: SectionOutcome<Vec<String>> = SectionOutcome::Ready(vec!["Age".to_string()]);
        assert_eq!(serde_json::to_value(&ready).unwrap(), serde_json::json!(["Age"]));

        let err = ProfilingError::InsufficientData {
            analysis: "VIF".to_string(),
            required: 2,
            found: 1,
        };
        let unavailable: SectionOutcome<Vec<String>> = SectionOutcome::unavailable(&err);
        let json = serde_json::to_value(&unavailable).unwrap();
        assert_eq!(json["code"], serde_json::json!("INSUFFICIENT_DATA"));
        assert!(unavailable.ready().is_none());
    }

    #[test]
    fn test_fill_strategy_parse() {
        assert_eq!("mean".parse::<FillStrategy>().unwrap(), FillStrategy::Mean);
        assert_eq!(" Median ".parse::<FillStrategy>().unwrap(), FillStrategy::Median);
        assert_eq!("drop".parse::<FillStrategy>().unwrap(), FillStrategy::DropColumn);
        assert_eq!(
            "custom:N/A".parse::<FillStrategy>().unwrap(),
            FillStrategy::Custom("N/A".to_string())
        );
        assert!("interpolate".parse::<FillStrategy>().is_err());
    }

    #[test]
    fn test_fill_strategy_display_round_trip() {
        let strategy = FillStrategy::Custom("none".to_string());
        assert_eq!(strategy.to_string().parse::<FillStrategy>().unwrap(), strategy);
    }
}
