//! Data quality analyzers.
//!
//! Each analyzer is a stateless unit struct whose associated functions take
//! the frame by reference and return an owned payload. They share no state,
//! so the orchestrator can call them in any order.

mod categorical;
mod class_balance;
mod collinearity;
mod correlation;
mod duplicates;
mod missing;
mod outliers;
mod scorer;
mod text;

pub use categorical::CategoricalValueChecker;
pub use class_balance::{ClassImbalanceAnalyzer, MISSING_CLASS_LABEL};
pub use collinearity::MulticollinearityChecker;
pub use correlation::CorrelationHandler;
pub use duplicates::DuplicateAnalyzer;
pub use missing::MissingValueAnalyzer;
pub use outliers::OutlierDetector;
pub use scorer::DataQualityScorer;
pub use text::TextColumnHandler;
