//! Categorical encoding: string columns to integer codes

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PipelineError;
use super::{ColumnSelection, Stage};

/// Raw value marking a missing entry in the census files
pub const MISSING_MARKER: &str = "?";

/// Code reserved for [`MISSING_MARKER`]; the imputer treats it as missing
pub const MISSING_CODE: i64 = 0;

/// What the encoder does with a value it did not see during `fit`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownCategoryPolicy {
    /// Fail with [`PipelineError::UnknownCategory`]
    #[default]
    Reject,
    /// Encode as [`MISSING_CODE`] so a downstream imputer fills it
    AsMissing,
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownCategoryPolicy::Reject => write!(f, "reject"),
            UnknownCategoryPolicy::AsMissing => write!(f, "as-missing"),
        }
    }
}

impl FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(UnknownCategoryPolicy::Reject),
            "as-missing" | "missing" => Ok(UnknownCategoryPolicy::AsMissing),
            _ => Err(format!(
                "Unknown policy '{}'. Use 'reject' or 'as-missing'",
                s
            )),
        }
    }
}

/// Bidirectional code table for one column.
///
/// Observed values other than the missing marker are coded `1..=n` in sorted
/// order; the marker is always [`MISSING_CODE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    /// Sorted distinct values; `categories[i]` has code `i + 1`
    categories: Vec<String>,
    /// Whether the marker was observed at fit time
    has_missing: bool,
}

impl CodeTable {
    /// Build a table from column values (nulls count as the missing marker)
    pub fn fit<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut distinct = BTreeSet::new();
        let mut has_missing = false;
        for value in values {
            match value {
                None | Some(MISSING_MARKER) => has_missing = true,
                Some(v) => {
                    distinct.insert(v.to_string());
                }
            }
        }
        Self {
            categories: distinct.into_iter().collect(),
            has_missing,
        }
    }

    pub fn encode(&self, value: &str) -> Option<i64> {
        if value == MISSING_MARKER {
            return Some(MISSING_CODE);
        }
        self.categories
            .binary_search_by(|c| c.as_str().cmp(&value))
            .ok()
            .map(|idx| idx as i64 + 1)
    }

    pub fn decode(&self, code: i64) -> Option<&str> {
        if code == MISSING_CODE {
            return Some(MISSING_MARKER);
        }
        let idx = usize::try_from(code - 1).ok()?;
        self.categories.get(idx).map(String::as_str)
    }

    /// Distinct values seen at fit time, the missing marker included
    pub fn len(&self) -> usize {
        self.categories.len() + usize::from(self.has_missing)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A table whose categorical columns have been replaced by codes.
///
/// Only [`CategoricalEncoder`] creates values of this type, which is what
/// guarantees the imputer always runs on encoded data.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    frame: DataFrame,
    encoded: Vec<String>,
}

impl EncodedFrame {
    pub fn as_frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Columns holding category codes, as opposed to raw numeric columns
    pub fn encoded_columns(&self) -> &[String] {
        &self.encoded
    }

    pub fn is_encoded(&self, column: &str) -> bool {
        self.encoded.iter().any(|c| c == column)
    }

    pub fn into_inner(self) -> DataFrame {
        self.frame
    }
}

/// Encodes the selected string columns of a table into integer codes.
///
/// One [`CodeTable`] is learned per column from the training table. Columns
/// that were not fitted pass through untouched and the input table is never
/// modified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    columns: ColumnSelection,
    unknown: UnknownCategoryPolicy,
    tables: Option<BTreeMap<String, CodeTable>>,
}

impl CategoricalEncoder {
    pub fn new(columns: ColumnSelection) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn with_unknown_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.unknown = policy;
        self
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.columns
    }

    pub fn unknown_policy(&self) -> UnknownCategoryPolicy {
        self.unknown
    }

    /// Fitted code table of a column
    pub fn table(&self, column: &str) -> Option<&CodeTable> {
        self.tables.as_ref()?.get(column)
    }

    /// Fitted column names, sorted
    pub fn encoded_columns(&self) -> Vec<&str> {
        self.tables
            .iter()
            .flat_map(|tables| tables.keys().map(String::as_str))
            .collect()
    }

    /// Decode a single code of a fitted column
    pub fn inverse(&self, column: &str, code: i64) -> Result<&str, PipelineError> {
        let tables = self.tables.as_ref().ok_or(PipelineError::NotFitted {
            stage: self.name(),
        })?;
        let table = tables
            .get(column)
            .ok_or_else(|| PipelineError::MissingColumn(column.to_string()))?;
        table
            .decode(code)
            .ok_or_else(|| PipelineError::UnknownCategory {
                column: column.to_string(),
                value: code.to_string(),
            })
    }

    fn encode_column(&self, column: &Column, table: &CodeTable) -> Result<Column, PipelineError> {
        let name = column.name().to_string();
        let values = string_values(column)?;

        let mut codes = Vec::with_capacity(values.len());
        for value in values.into_iter() {
            let value = value.unwrap_or(MISSING_MARKER);
            let code = match table.encode(value) {
                Some(code) => code,
                None => match self.unknown {
                    UnknownCategoryPolicy::Reject => {
                        return Err(PipelineError::UnknownCategory {
                            column: name,
                            value: value.to_string(),
                        })
                    }
                    UnknownCategoryPolicy::AsMissing => {
                        debug!(column = %name, value, "unseen category encoded as missing");
                        MISSING_CODE
                    }
                },
            };
            codes.push(code);
        }

        Ok(Column::new(name.into(), codes))
    }
}

fn string_values(column: &Column) -> Result<&StringChunked, PipelineError> {
    if column.dtype() != &DataType::String {
        return Err(PipelineError::AlreadyEncoded {
            column: column.name().to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    Ok(column.str()?)
}

impl Stage for CategoricalEncoder {
    type Input = DataFrame;
    type Output = EncodedFrame;

    fn name(&self) -> &'static str {
        "encoder"
    }

    fn is_fitted(&self) -> bool {
        self.tables.is_some()
    }

    fn fit(&mut self, input: &DataFrame) -> Result<(), PipelineError> {
        let available: Vec<String> = input
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = self.columns.resolve(&available, |name| {
            input
                .column(name)
                .map(|c| c.dtype() == &DataType::String)
                .unwrap_or(false)
        })?;

        let mut tables = BTreeMap::new();
        for name in columns {
            let values = string_values(input.column(&name)?)?;
            let table = CodeTable::fit(values.into_iter());
            debug!(column = %name, categories = table.len(), "fitted code table");
            tables.insert(name, table);
        }

        self.tables = Some(tables);
        Ok(())
    }

    fn transform(&self, input: &DataFrame) -> Result<EncodedFrame, PipelineError> {
        let tables = self.tables.as_ref().ok_or(PipelineError::NotFitted {
            stage: self.name(),
        })?;

        let mut output = input.clone();
        for (name, table) in tables {
            let column = input
                .column(name)
                .map_err(|_| PipelineError::MissingColumn(name.clone()))?;
            let encoded = self.encode_column(column, table)?;
            output.with_column(encoded)?;
        }

        Ok(EncodedFrame {
            frame: output,
            encoded: tables.keys().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table_reserves_zero_for_missing() {
        let table = CodeTable::fit([Some("b"), Some("?"), Some("a"), None]);
        assert_eq!(table.encode("?"), Some(0));
        assert_eq!(table.encode("a"), Some(1));
        assert_eq!(table.encode("b"), Some(2));
        assert_eq!(table.encode("c"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_code_table_decode() {
        let table = CodeTable::fit([Some("Private"), Some("State-gov")]);
        assert_eq!(table.decode(0), Some("?"));
        assert_eq!(table.decode(1), Some("Private"));
        assert_eq!(table.decode(2), Some("State-gov"));
        assert_eq!(table.decode(3), None);
        assert_eq!(table.decode(-1), None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "reject".parse::<UnknownCategoryPolicy>().unwrap(),
            UnknownCategoryPolicy::Reject
        );
        assert_eq!(
            "AS-MISSING".parse::<UnknownCategoryPolicy>().unwrap(),
            UnknownCategoryPolicy::AsMissing
        );
        assert!("skip".parse::<UnknownCategoryPolicy>().is_err());
    }
}
