//! Data Quality Profiling Library
//!
//! Profiles a tabular dataset held in a Polars [`DataFrame`](polars::prelude::DataFrame)
//! and returns one structured quality report.
//!
//! # Overview
//!
//! The report covers:
//!
//! - **Completeness**: missing and empty cells per column
//! - **Duplicates**: exact duplicate rows and shared values in text columns
//! - **Class Balance**: distribution of an optional target column
//! - **Anonymization**: a masked preview of the first rows
//! - **Categorical Hygiene**: casing/whitespace variants and rare values
//! - **Feature Redundancy**: variance inflation factors and strong correlations
//! - **Extreme Values**: IQR fences per numeric column
//! - **Text Shape**: length distribution and case variations
//! - **Quality Score**: a weighted score over six sub-dimensions
//!
//! Every analyzer is a pure function of the frame. A section that cannot be
//! computed holds an error marker instead of failing the whole report.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dq_profiler::{generate_report, load_dataset};
//!
//! let df = load_dataset("data.csv")?;
//! let report = generate_report(&df, Some("Target"))?;
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! # Configuration
//!
//! Use [`ProfilerConfig`] to tune the thresholds:
//!
//! ```rust,ignore
//! use dq_profiler::{DataSummary, ProfilerConfig};
//!
//! let config = ProfilerConfig::builder()
//!     .vif_threshold(10.0)
//!     .correlation_threshold(0.95)
//!     .date_column("created_at")
//!     .build()?;
//!
//! let report = DataSummary::new(config).generate_report(&df, None)?;
//! ```
//!
//! # Remediation
//!
//! ```rust,ignore
//! use dq_profiler::{DataCleaner, FillStrategy};
//!
//! let plan = vec![("Age".to_string(), FillStrategy::Median)];
//! let (filled, actions) = DataCleaner::fill_missing_values(&df, &plan)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataAnonymizer, DataCleaner, EMAIL_MASK, NAME_PLACEHOLDER};
pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use error::{ProfilingError, Result as ProfilingResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::load_dataset;
pub use profiler::DataTypeHandler;
pub use quality::{
    CategoricalValueChecker, ClassImbalanceAnalyzer, CorrelationHandler, DataQualityScorer,
    DuplicateAnalyzer, MissingValueAnalyzer, MulticollinearityChecker, OutlierDetector,
    TextColumnHandler,
};
pub use reporting::{
    DataSummary, ProfileEnvelope, ReportGenerator, analyze_class_imbalance, generate_report,
};
pub use types::{
    CategoricalIssue, ClassShare, CorrelatedPair, CorrelationReport, DataQualityScore,
    DescriptiveStats, DuplicateReport, FillStrategy, MissingValueRow, NullFillRecommendation,
    OutlierSummary, QualityBreakdown, QualityReport, SectionError, SectionOutcome, TableSample,
    VifEntry, VifReport,
};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};

// Reports and configuration may be built on a worker thread and handed back.
static_assertions::assert_impl_all!(QualityReport: Send, Sync);
static_assertions::assert_impl_all!(ProfilerConfig: Send, Sync);
static_assertions::assert_impl_all!(DataSummary: Send, Sync);
static_assertions::assert_impl_all!(ProfilingError: Send, Sync);
