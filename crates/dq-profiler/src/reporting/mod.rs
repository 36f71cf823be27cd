//! Report assembly and output.
//!
//! [`DataSummary`] runs every analyzer over a frame and returns a
//! [`QualityReport`](crate::types::QualityReport). [`ReportGenerator`]
//! writes reports and cleaned datasets to disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use dq_profiler::reporting::{DataSummary, ReportGenerator};
//!
//! let report = DataSummary::default().generate_report(&df, Some("Target"))?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let envelope = ReportGenerator::build_envelope("data.csv", &df, &df, vec![], vec![], report);
//! ReportGenerator::new("outputs".into()).write_report_to_file(&envelope, "data")?;
//! ```

mod generator;
mod summary;

pub use generator::{ProfileEnvelope, ReportGenerator};
pub use summary::{DataSummary, analyze_class_imbalance, generate_report};
