use crate::error::Result;
use crate::types::MissingValueRow;
use crate::utils::{as_string_series, is_numeric_dtype};
use polars::prelude::*;

/// Counts missing cells per column.
///
/// A cell is missing when it is null or, outside numeric columns, an empty
/// string.
pub struct MissingValueAnalyzer;

impl MissingValueAnalyzer {
    /// Columns with at least one missing cell, in frame order.
    pub fn analyze(df: &DataFrame) -> Result<Vec<MissingValueRow>> {
        let rows = df.height();
        if rows == 0 {
            return Ok(Vec::new());
        }

        let mut report = Vec::new();
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let count = Self::missing_cells(series)?;
            if count > 0 {
                report.push(MissingValueRow {
                    column: series.name().to_string(),
                    count,
                    percentage: count as f64 / rows as f64 * 100.0,
                });
            }
        }

        Ok(report)
    }

    /// Null cells plus empty strings in non-numeric columns.
    pub(crate) fn missing_cells(series: &Series) -> Result<usize> {
        let nulls = series.null_count();
        if is_numeric_dtype(series.dtype()) {
            return Ok(nulls);
        }

        let as_text = as_string_series(series)?;
        let empty = as_text
            .str()?
            .into_iter()
            .filter(|v| matches!(v, Some("")))
            .count();

        Ok(nulls + empty)
    }
}
