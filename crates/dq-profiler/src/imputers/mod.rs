//! Imputation module for handling missing values.
//!
//! Statistical strategies only: mean, median, mode and constant fills.

mod statistical;

pub use statistical::StatisticalImputer;
