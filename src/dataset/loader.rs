//! Loader for the comma-separated census files

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use super::error::DataError;
use super::meta::DatasetMeta;
use super::{is_numeric_column, NAMES_FILE, TEST_FILE, TRAIN_FILE};

/// Which file of the census release a table comes from.
///
/// The test file starts with a header-like row and its labels carry a
/// trailing period (`>50K.`), so the two splits are read slightly differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Leading lines to skip before the first record
    pub fn skip_rows(self) -> usize {
        match self {
            Split::Train => 0,
            Split::Test => 1,
        }
    }
}

/// A raw record with its position in the source file
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// One-based line number
    pub line: usize,
    pub fields: Vec<String>,
}

/// Feature table plus the target column kept apart from it
#[derive(Debug, Clone)]
pub struct LabeledFrame {
    pub features: DataFrame,
    pub target: Vec<String>,
}

/// Train and test tables with the metadata they were read with
#[derive(Debug, Clone)]
pub struct Dataset {
    pub data: DataFrame,
    pub target: Vec<String>,
    pub data_test: DataFrame,
    pub target_test: Vec<String>,
    pub target_names: Vec<String>,
    pub feature_names: Vec<String>,
    /// Categorical domains of the input features (target excluded)
    pub categorical_features: BTreeMap<String, Vec<String>>,
    /// Contents of `adult.names`, when present
    pub description: Option<String>,
}

/// Strip surrounding whitespace and the trailing period used by the test file
pub fn normalize_label(label: &str) -> &str {
    label.trim().trim_end_matches('.')
}

/// Read all records of a file, splitting fields on commas.
///
/// Fields are trimmed, blank lines are ignored and the first `skip_rows`
/// lines are dropped. Every remaining line must have exactly `n_columns`
/// fields.
pub fn read_records(
    path: &Path,
    n_columns: usize,
    skip_rows: usize,
) -> Result<Vec<RawRecord>, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate().skip(skip_rows) {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<String> = line.split(',').map(|f| f.trim().to_string()).collect();
        if fields.len() != n_columns {
            return Err(DataError::FieldCount {
                path: path.to_path_buf(),
                line: idx + 1,
                expected: n_columns,
                found: fields.len(),
            });
        }

        records.push(RawRecord {
            line: idx + 1,
            fields,
        });
    }

    if records.is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), records = records.len(), "read census records");
    Ok(records)
}

/// Build the feature frame and target vector from raw records.
///
/// `names` lists every column with the target last. Numeric columns become
/// `Int64`, all other features `String`.
pub fn records_to_frame(
    path: &Path,
    records: &[RawRecord],
    names: &[String],
    split: Split,
) -> Result<LabeledFrame, DataError> {
    let Some((target_name, feature_names)) = names.split_last() else {
        return Err(DataError::ColumnMismatch {
            expected: records.first().map(|r| r.fields.len()).unwrap_or(0),
            found: 0,
        });
    };

    let mut columns: Vec<Column> = Vec::with_capacity(feature_names.len());
    for (col_idx, name) in feature_names.iter().enumerate() {
        let column = if is_numeric_column(name) {
            let values = records
                .iter()
                .map(|record| parse_integer(path, record, col_idx, name))
                .collect::<Result<Vec<i64>, DataError>>()?;
            Column::new(name.as_str().into(), values)
        } else {
            let values: Vec<String> = records
                .iter()
                .map(|record| record.fields[col_idx].clone())
                .collect();
            Column::new(name.as_str().into(), values)
        };
        columns.push(column);
    }

    let target_idx = feature_names.len();
    let target: Vec<String> = records
        .iter()
        .map(|record| {
            let raw = record.fields[target_idx].as_str();
            match split {
                Split::Train => raw.to_string(),
                Split::Test => normalize_label(raw).to_string(),
            }
        })
        .collect();

    debug!(target = %target_name, rows = target.len(), "built labeled frame");

    Ok(LabeledFrame {
        features: DataFrame::new(columns)?,
        target,
    })
}

fn parse_integer(
    path: &Path,
    record: &RawRecord,
    col_idx: usize,
    name: &str,
) -> Result<i64, DataError> {
    let raw = &record.fields[col_idx];
    raw.parse::<i64>().map_err(|_| DataError::InvalidNumber {
        path: path.to_path_buf(),
        line: record.line,
        column: name.to_string(),
        value: raw.clone(),
    })
}

/// Read one split of the census release
pub fn load_split(path: &Path, names: &[String], split: Split) -> Result<LabeledFrame, DataError> {
    let records = read_records(path, names.len(), split.skip_rows())?;
    records_to_frame(path, &records, names, split)
}

/// Load training and test data using the column layout recorded in `meta`
pub fn load_dataset(root: &Path, meta: &DatasetMeta) -> Result<Dataset, DataError> {
    let names = &meta.feature_names;

    let train = load_split(&root.join(TRAIN_FILE), names, Split::Train)?;
    let test = load_split(&root.join(TEST_FILE), names, Split::Test)?;

    let description = read_description(&root.join(NAMES_FILE))?;

    Ok(Dataset {
        data: train.features,
        target: train.target,
        data_test: test.features,
        target_test: test.target,
        target_names: meta.target_names.clone(),
        feature_names: meta.feature_names.clone(),
        categorical_features: meta.input_domains(),
        description,
    })
}

fn read_description(path: &Path) -> Result<Option<String>, DataError> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| DataError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_strips_period_and_space() {
        assert_eq!(normalize_label(" >50K."), ">50K");
        assert_eq!(normalize_label("<=50K"), "<=50K");
    }

    #[test]
    fn test_split_skip_rows() {
        assert_eq!(Split::Train.skip_rows(), 0);
        assert_eq!(Split::Test.skip_rows(), 1);
    }
}
