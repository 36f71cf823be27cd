//! Column classification and numeric coercion.
//!
//! Every analyzer decides numeric vs categorical through [`DataTypeHandler`]
//! so the partition is consistent across the report.

pub(crate) mod statistics;

use crate::error::Result;
use crate::utils::{column_names, is_numeric_dtype, numeric_cells};
use polars::prelude::*;
use tracing::debug;

/// A column coerced to optional floats, in frame order.
pub(crate) type CoercedColumn = (String, Vec<Option<f64>>);

/// Partitions columns into numerical and categorical.
pub struct DataTypeHandler;

impl DataTypeHandler {
    /// Split the columns into `(numerical, categorical)`, preserving order.
    ///
    /// Only integer and float dtypes are numerical; booleans, strings and
    /// temporal columns are categorical.
    pub fn partition(df: &DataFrame) -> (Vec<String>, Vec<String>) {
        let mut numerical = Vec::new();
        let mut categorical = Vec::new();

        for column in df.get_columns() {
            let name = column.name().to_string();
            if is_numeric_dtype(column.dtype()) {
                numerical.push(name);
            } else {
                categorical.push(name);
            }
        }

        (numerical, categorical)
    }

    pub fn numerical_columns(df: &DataFrame) -> Vec<String> {
        Self::partition(df).0
    }

    pub fn categorical_columns(df: &DataFrame) -> Vec<String> {
        Self::partition(df).1
    }

    /// Coerce every column (except `exclude`) to optional floats.
    pub(crate) fn coerce_numeric(
        df: &DataFrame,
        exclude: Option<&str>,
    ) -> Result<Vec<CoercedColumn>> {
        let mut coerced = Vec::new();

        for name in column_names(df) {
            if exclude == Some(name.as_str()) {
                debug!("Excluding target column '{}' from numeric coercion", name);
                continue;
            }
            let series = df.column(&name)?.as_materialized_series();
            coerced.push((name, numeric_cells(series)?));
        }

        Ok(coerced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_preserves_order() {
        let df = df! {
            "name" => ["a", "b"],
            "age" => [30i64, 40],
            "active" => [true, false],
            "score" => [1.5f64, 2.5],
        }
        .unwrap();

        let (numerical, categorical) = DataTypeHandler::partition(&df);
        assert_eq!(numerical, vec!["age", "score"]);
        assert_eq!(categorical, vec!["name", "active"]);
    }

    #[test]
    fn test_partition_is_exhaustive() {
        let df = df! {
            "a" => [1i32],
            "b" => ["x"],
            "c" => [0.5f32],
        }
        .unwrap();

        let (numerical, categorical) = DataTypeHandler::partition(&df);
        assert_eq!(numerical.len() + categorical.len(), df.width());
    }

    #[test]
    fn test_coerce_numeric_excludes_target() {
        let df = df! {
            "x" => ["1", "2"],
            "Target" => [0i64, 1],
        }
        .unwrap();

        let coerced = DataTypeHandler::coerce_numeric(&df, Some("Target")).unwrap();
        assert_eq!(coerced.len(), 1);
        assert_eq!(coerced[0].0, "x");
        assert_eq!(coerced[0].1, vec![Some(1.0), Some(2.0)]);
    }
}
