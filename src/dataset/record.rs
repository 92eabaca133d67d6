//! Single feature records supplied for prediction

use std::collections::BTreeMap;

use polars::prelude::*;

use super::error::DataError;
use super::meta::DatasetMeta;

/// A validated feature value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
}

/// One individual's features, keyed by column name.
///
/// Values are validated against the metadata before they are stored, so a
/// complete record converts to a one-row table the pipeline can score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: BTreeMap<String, FieldValue>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: FieldValue) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a one-row table in the metadata's feature order.
    ///
    /// Every input feature must be present and no unknown column may be set.
    pub fn to_frame(&self, meta: &DatasetMeta) -> Result<DataFrame, DataError> {
        let features = meta.input_features();

        if let Some(unknown) = self
            .values
            .keys()
            .find(|name| !features.contains(*name))
        {
            return Err(DataError::UnknownFeature(unknown.clone()));
        }

        let mut columns = Vec::with_capacity(features.len());
        for name in features {
            let value = self
                .values
                .get(name)
                .ok_or_else(|| DataError::MissingFeature(name.clone()))?;

            let column = match (value, meta.domain(name)) {
                (FieldValue::Text(text), Some(_)) => {
                    Column::new(name.as_str().into(), [text.as_str()])
                }
                (FieldValue::Number(number), None) => Column::new(name.as_str().into(), [*number]),
                (FieldValue::Text(text), None) => {
                    return Err(DataError::InvalidValue {
                        column: name.clone(),
                        value: text.clone(),
                    })
                }
                (FieldValue::Number(number), Some(_)) => {
                    return Err(DataError::InvalidValue {
                        column: name.clone(),
                        value: number.to_string(),
                    })
                }
            };
            columns.push(column);
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Accept `input` only if it names one of the values in `domain`.
///
/// The error text lists the valid choices and is shown when reprompting.
pub fn validate_choice(domain: &[String], input: &str) -> Result<String, String> {
    let value = input.trim();
    if domain.iter().any(|v| v == value) {
        Ok(value.to_string())
    } else {
        Err(format!("Not valid, choose one of {}", domain.join(", ")))
    }
}

/// Parse a raw value for `column`: categorical columns are checked against
/// their domain, all others must be integers.
pub fn parse_field(meta: &DatasetMeta, column: &str, raw: &str) -> Result<FieldValue, DataError> {
    if !meta.input_features().iter().any(|f| f == column) {
        return Err(DataError::UnknownFeature(column.to_string()));
    }

    let invalid = || DataError::InvalidValue {
        column: column.to_string(),
        value: raw.to_string(),
    };

    match meta.domain(column) {
        Some(domain) => validate_choice(domain, raw)
            .map(FieldValue::Text)
            .map_err(|_| invalid()),
        None => raw
            .trim()
            .parse::<i64>()
            .map(FieldValue::Number)
            .map_err(|_| invalid()),
    }
}
