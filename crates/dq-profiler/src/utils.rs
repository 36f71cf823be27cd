//! Shared utilities for the profiling engine.
//!
//! This module contains common helper functions used across multiple analyzers
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for profiling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if is_boolean_dtype(dtype) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category of a Series.
pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

/// Text columns are the ones holding string cells.
#[inline]
pub fn is_text_series(series: &Series) -> bool {
    series_dtype_category(series) == DtypeCategory::String
}

/// Owned column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Cell Access Utilities
// =============================================================================

/// View a Series as strings, casting when it is not already a String column.
///
/// List, array and struct cells cannot be cast and are rendered as JSON text.
pub fn as_string_series(series: &Series) -> PolarsResult<Series> {
    match series.dtype() {
        DataType::String => Ok(series.clone()),
        dtype if dtype.is_nested() => {
            let rendered: Vec<Option<String>> = nested_cells_as_json(series)?
                .into_iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            Ok(Series::new(series.name().clone(), rendered))
        }
        _ => series.cast(&DataType::String),
    }
}

/// Cells of a (possibly nested) Series as JSON values.
fn nested_cells_as_json(series: &Series) -> PolarsResult<Vec<serde_json::Value>> {
    match series.dtype() {
        DataType::List(_) => series
            .list()?
            .into_iter()
            .map(|cell| match cell {
                Some(inner) => Ok(serde_json::Value::Array(nested_cells_as_json(&inner)?)),
                None => Ok(serde_json::Value::Null),
            })
            .collect(),
        DataType::Array(inner, _) => {
            nested_cells_as_json(&series.cast(&DataType::List(inner.clone()))?)
        }
        DataType::Struct(_) => {
            let fields = series.struct_()?.fields_as_series();
            let mut field_values = Vec::with_capacity(fields.len());
            for field in &fields {
                field_values.push((field.name().to_string(), nested_cells_as_json(field)?));
            }

            let nulls = series.is_null();
            Ok((0..series.len())
                .map(|idx| {
                    if nulls.get(idx).unwrap_or(false) {
                        return serde_json::Value::Null;
                    }
                    let object = field_values
                        .iter()
                        .map(|(name, values)| (name.clone(), values[idx].clone()))
                        .collect();
                    serde_json::Value::Object(object)
                })
                .collect())
        }
        _ => (0..series.len())
            .map(|idx| Ok(any_value_to_json(&series.get(idx)?)))
            .collect(),
    }
}

/// Replace nested columns by their JSON text so row-wise operations apply.
pub fn nested_as_text(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        if column.dtype().is_nested() {
            let rendered = as_string_series(column.as_materialized_series())?;
            out.replace(column.name().as_str(), rendered)?;
        }
    }
    Ok(out)
}

/// Parse one text cell as a number.
///
/// Surrounding whitespace is ignored; anything else that is not a plain
/// finite float literal is unconvertible.
pub fn parse_numeric_cell(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a Series to optional floats.
///
/// Numeric and boolean columns are cast; text columns are parsed cell by
/// cell; every other dtype is entirely unconvertible. NaN becomes `None`.
pub fn numeric_cells(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    match series_dtype_category(series) {
        DtypeCategory::Numeric | DtypeCategory::Boolean => {
            let float_series = series.cast(&DataType::Float64)?;
            Ok(float_series
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect())
        }
        DtypeCategory::String => {
            let str_series = as_string_series(series)?;
            Ok(str_series
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_numeric_cell))
                .collect())
        }
        DtypeCategory::Datetime | DtypeCategory::Other => Ok(vec![None; series.len()]),
    }
}

/// Non-missing values of a numeric Series as floats.
pub fn finite_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_cells(series)?.into_iter().flatten().collect())
}

/// Convert a single cell into a JSON value for report tables.
pub fn any_value_to_json(value: &AnyValue<'_>) -> serde_json::Value {
    match value {
        AnyValue::Null => serde_json::Value::Null,
        AnyValue::Boolean(b) => serde_json::json!(b),
        AnyValue::String(s) => serde_json::json!(s),
        AnyValue::StringOwned(s) => serde_json::json!(s.as_str()),
        AnyValue::Int8(v) => serde_json::json!(v),
        AnyValue::Int16(v) => serde_json::json!(v),
        AnyValue::Int32(v) => serde_json::json!(v),
        AnyValue::Int64(v) => serde_json::json!(v),
        AnyValue::UInt8(v) => serde_json::json!(v),
        AnyValue::UInt16(v) => serde_json::json!(v),
        AnyValue::UInt32(v) => serde_json::json!(v),
        AnyValue::UInt64(v) => serde_json::json!(v),
        AnyValue::Float32(v) => serde_json::json!(v),
        AnyValue::Float64(v) => serde_json::json!(v),
        AnyValue::List(inner) => nested_cells_as_json(inner)
            .map(serde_json::Value::Array)
            .unwrap_or(serde_json::Value::Null),
        other => serde_json::json!(format!("{}", other)),
    }
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a string Series.
///
/// Ties resolve to the lexicographically smallest value so results are stable.
pub fn string_mode(series: &Series) -> Option<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return None;
    }

    let str_series = as_string_series(&non_null).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: HashMap<&str, usize> = HashMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val.to_string())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled: Vec<Option<f64>> = float_series
        .f64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = as_string_series(series)?;
    let filled: Vec<Option<String>> = str_series
        .str()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value).to_string()))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
    }

    #[test]
    fn test_parse_numeric_cell() {
        assert_eq!(parse_numeric_cell("42"), Some(42.0));
        assert_eq!(parse_numeric_cell("  -3.5 "), Some(-3.5));
        assert_eq!(parse_numeric_cell(""), None);
        assert_eq!(parse_numeric_cell("abc"), None);
        assert_eq!(parse_numeric_cell("NaN"), None);
    }

    #[test]
    fn test_numeric_cells_from_strings() {
        let series = Series::new("n".into(), &[Some("1"), None, Some("x"), Some("2.5")]);
        let cells = numeric_cells(&series).unwrap();
        assert_eq!(cells, vec![Some(1.0), None, None, Some(2.5)]);
    }

    #[test]
    fn test_numeric_cells_drops_nan() {
        let series = Series::new("n".into(), &[Some(1.0f64), Some(f64::NAN), None]);
        let cells = numeric_cells(&series).unwrap();
        assert_eq!(cells, vec![Some(1.0), None, None]);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("test".into(), &[Some("a"), None]);
        let filled = fill_string_nulls(&series, "Unknown").unwrap();
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("a"), Some("Unknown")]);
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_tie_is_stable() {
        let series = Series::new("test".into(), &["b", "a", "b", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_list_column_as_json_text() {
        let df = df! {
            "tags" => [
                Series::new("".into(), &["x", "y"]),
                Series::new("".into(), &["z"]),
            ],
        }
        .unwrap();
        let mut tags = df.column("tags").unwrap().as_materialized_series().clone();
        let missing = Series::full_null("tags".into(), 1, tags.dtype());
        tags.append(&missing).unwrap();

        let text = as_string_series(&tags).unwrap();
        let values: Vec<Option<&str>> = text.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(r#"["x","y"]"#), Some(r#"["z"]"#), None]);
    }

    #[test]
    fn test_nested_as_text_keeps_flat_columns() {
        let df = df! {
            "id" => [1i64, 2],
            "tags" => [
                Series::new("".into(), &[1i64, 2]),
                Series::new("".into(), &[3i64]),
            ],
        }
        .unwrap();

        let flat = nested_as_text(&df).unwrap();
        assert_eq!(flat.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(flat.column("tags").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_any_value_to_json() {
        assert_eq!(any_value_to_json(&AnyValue::Null), serde_json::Value::Null);
        assert_eq!(any_value_to_json(&AnyValue::Int64(7)), serde_json::json!(7));
        assert_eq!(
            any_value_to_json(&AnyValue::String("x")),
            serde_json::json!("x")
        );
    }
}
