//! Dataset loading.
//!
//! CSV files go through a chain of increasingly lenient readers; JSON files
//! must hold an array of records. Spreadsheets (with the `excel` feature) are
//! read from their first worksheet. Anything else is rejected.

use crate::error::{ProfilingError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

#[cfg(feature = "excel")]
const SUPPORTED_FORMATS: &str = ".csv, .json, .xls or .xlsx";
#[cfg(not(feature = "excel"))]
const SUPPORTED_FORMATS: &str = ".csv or .json";

/// Timestamp layout for spreadsheet date cells.
#[cfg(feature = "excel")]
const EXCEL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load a dataset, dispatching on the file extension.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProfilingError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let df = match extension.as_str() {
        "csv" => load_csv_with_fallbacks(path)?,
        "json" => load_json(path)?,
        #[cfg(feature = "excel")]
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => load_excel(path)?,
        other => {
            return Err(ProfilingError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                format!(".{} (expected {})", other, SUPPORTED_FORMATS)
            }));
        }
    };

    info!("Loaded {}: {} rows x {} columns", path.display(), df.height(), df.width());
    Ok(df)
}

/// Load CSV with multiple fallback strategies.
pub fn load_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    let cleaned = clean_csv_content(&content);

    Ok(CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()?)
}

/// Load a JSON array of records.
pub fn load_json(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    Ok(JsonReader::new(file)
        .with_json_format(JsonFormat::Json)
        .infer_schema_len(std::num::NonZeroUsize::new(INFER_SCHEMA_ROWS))
        .finish()?)
}

/// Load the first worksheet of a spreadsheet.
///
/// The first row holds the column names. A column whose cells are all whole
/// numbers becomes `Int64`, any other numeric column `Float64`, an all-boolean
/// column `Boolean`, and everything else `String`. Empty and error cells are null.
#[cfg(feature = "excel")]
pub fn load_excel(path: &Path) -> Result<DataFrame> {
    use calamine::{Reader, open_workbook_auto};

    let mut workbook = open_workbook_auto(path)?;
    if let Some(name) = workbook.sheet_names().first() {
        debug!("Reading worksheet '{}'", name);
    }
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(calamine::Error::Msg("workbook has no worksheets"))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            calamine::Data::Empty => format!("column_{}", idx + 1),
            other => other.to_string(),
        })
        .collect();

    let mut cells: Vec<Vec<&calamine::Data>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).unwrap_or(&calamine::Data::Empty));
        }
    }

    let columns = names
        .iter()
        .zip(&cells)
        .map(|(name, column)| excel_column(name, column))
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}

/// Build one typed column from spreadsheet cells.
#[cfg(feature = "excel")]
fn excel_column(name: &str, cells: &[&calamine::Data]) -> Column {
    use calamine::Data;

    let present = || cells.iter().filter(|c| !matches!(c, Data::Empty | Data::Error(_)));
    let name: PlSmallStr = name.into();

    if present().count() > 0 && present().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Column::new(name, values);
    }

    let numeric = present().count() > 0
        && present().all(|c| matches!(c, Data::Int(_) | Data::Float(_)));
    if numeric {
        let whole = present().all(|c| match c {
            Data::Int(_) => true,
            Data::Float(f) => f.fract() == 0.0 && f.abs() < i64::MAX as f64,
            _ => false,
        });
        if whole {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            return Column::new(name, values);
        }
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        return Column::new(name, values);
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|c| match c {
            Data::Empty | Data::Error(_) => None,
            Data::DateTime(dt) => Some(
                dt.as_datetime()
                    .map(|d| d.format(EXCEL_DATETIME_FORMAT).to_string())
                    .unwrap_or_else(|| dt.to_string()),
            ),
            other => Some(other.to_string()),
        })
        .collect();
    Column::new(name, values)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
