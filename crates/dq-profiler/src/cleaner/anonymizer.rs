//! Pattern based masking of emails and name-like columns.

use crate::error::Result;
use crate::types::TableSample;
use crate::utils::{any_value_to_json, as_string_series, column_names, is_text_series};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

/// Literal that replaces every email address.
pub const EMAIL_MASK: &str = "***@***.com";

/// Literal that replaces every cell of a name-like column.
pub const NAME_PLACEHOLDER: &str = "ANONYMIZED";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid regex: email")
});

/// Produces anonymized copies of a frame. The input is never modified.
pub struct DataAnonymizer;

impl DataAnonymizer {
    /// Mask emails in text cells, then blank out every column whose name
    /// contains "name" in any case. Applying it twice changes nothing.
    pub fn anonymize(df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();

        for name in column_names(df) {
            if Self::is_name_column(&name) {
                let placeholder = vec![NAME_PLACEHOLDER; out.height()];
                out.replace(&name, Series::new(name.as_str().into(), placeholder))?;
                debug!("Anonymized name column '{}'", name);
                continue;
            }

            let series = out.column(&name)?.as_materialized_series().clone();
            if !is_text_series(&series) {
                continue;
            }

            let as_text = as_string_series(&series)?;
            let masked: Vec<Option<String>> = as_text
                .str()?
                .into_iter()
                .map(|v| v.map(Self::mask_emails))
                .collect();
            out.replace(&name, Series::new(name.as_str().into(), masked))?;
        }

        Ok(out)
    }

    /// Anonymized preview of the first `rows` rows.
    pub fn sample(df: &DataFrame, rows: usize) -> Result<TableSample> {
        let head = Self::anonymize(&df.head(Some(rows)))?;

        let mut table_rows = Vec::with_capacity(head.height());
        for idx in 0..head.height() {
            let mut row = Vec::with_capacity(head.width());
            for column in head.get_columns() {
                row.push(any_value_to_json(&column.get(idx)?));
            }
            table_rows.push(row);
        }

        Ok(TableSample {
            columns: column_names(&head),
            rows: table_rows,
        })
    }

    pub fn is_name_column(name: &str) -> bool {
        name.to_lowercase().contains("name")
    }

    /// Replace every email-shaped substring with [`EMAIL_MASK`].
    pub fn mask_emails(text: &str) -> String {
        EMAIL_PATTERN.replace_all(text, EMAIL_MASK).into_owned()
    }

    pub fn contains_email(text: &str) -> bool {
        EMAIL_PATTERN.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> DataFrame {
        df! {
            "Name" => [Some("Alice"), Some("Bob"), None],
            "Email" => [Some("alice@example.com"), Some("contact bob@mail.org now"), None],
            "Age" => [25i64, 30, 35],
        }
        .unwrap()
    }

    fn text_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_masks_emails_inside_text() {
        let out = DataAnonymizer::anonymize(&people()).unwrap();
        assert_eq!(
            text_values(&out, "Email"),
            vec![
                Some("***@***.com".to_string()),
                Some("contact ***@***.com now".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_name_columns_fully_replaced() {
        let df = df! {
            "first_NAME" => [Some("Ann"), None],
            "score" => [1i64, 2],
        }
        .unwrap();

        let out = DataAnonymizer::anonymize(&df).unwrap();
        assert!(
            text_values(&out, "first_NAME")
                .iter()
                .all(|v| v.as_deref() == Some(NAME_PLACEHOLDER))
        );
    }

    #[test]
    fn test_idempotent() {
        let once = DataAnonymizer::anonymize(&people()).unwrap();
        let twice = DataAnonymizer::anonymize(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_input_untouched() {
        let df = people();
        let _ = DataAnonymizer::anonymize(&df).unwrap();
        assert_eq!(text_values(&df, "Name")[0], Some("Alice".to_string()));
    }

    #[test]
    fn test_sample_limits_rows() {
        let sample = DataAnonymizer::sample(&people(), 2).unwrap();
        assert_eq!(sample.columns, vec!["Name", "Email", "Age"]);
        assert_eq!(sample.rows.len(), 2);
        assert_eq!(sample.rows[0][0], serde_json::json!(NAME_PLACEHOLDER));
        assert_eq!(sample.rows[1][2], serde_json::json!(30));
    }

    #[test]
    fn test_mask_leaves_no_email() {
        let masked = DataAnonymizer::mask_emails("a.b+c@d-e.co.uk and x@y.io");
        assert!(!DataAnonymizer::contains_email(&masked));
    }
}
