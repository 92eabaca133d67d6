//! Most-frequent imputation of missing codes

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::encoder::{EncodedFrame, MISSING_CODE};
use super::error::PipelineError;
use super::{ColumnSelection, Stage};

/// Code treated as missing by the imputer
pub const SENTINEL: i64 = MISSING_CODE;

/// Encoded table after imputation, ready to become a feature matrix
#[derive(Debug, Clone)]
pub struct ImputedFrame(DataFrame);

impl ImputedFrame {
    pub fn as_frame(&self) -> &DataFrame {
        &self.0
    }

    pub fn into_inner(self) -> DataFrame {
        self.0
    }
}

/// Replaces the [`SENTINEL`] code (and nulls) in the selected columns with the
/// most frequent non-sentinel code seen at fit time.
///
/// Works on [`EncodedFrame`] only, so it can never see raw categories.
/// `ColumnSelection::All` means every column the encoder produced; naming a
/// raw numeric column is [`PipelineError::NotEncoded`], since zero is a real
/// value there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalImputer {
    columns: ColumnSelection,
    replacements: Option<BTreeMap<String, i64>>,
}

impl CategoricalImputer {
    pub fn new(columns: ColumnSelection) -> Self {
        Self {
            columns,
            replacements: None,
        }
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.columns
    }

    /// Fitted replacement code of a column
    pub fn replacement(&self, column: &str) -> Option<i64> {
        self.replacements.as_ref()?.get(column).copied()
    }

    pub fn replacements(&self) -> Option<&BTreeMap<String, i64>> {
        self.replacements.as_ref()
    }
}

/// Most frequent non-sentinel value; ties go to the smallest code
pub fn most_frequent(values: impl IntoIterator<Item = Option<i64>>) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        if value != SENTINEL {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

fn integer_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, PipelineError> {
    let column = frame
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;

    if !column.dtype().is_integer() {
        return Err(PipelineError::NotEncoded {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let cast = column.cast(&DataType::Int64)?;
    Ok(cast.i64()?.into_iter().collect())
}

impl Stage for CategoricalImputer {
    type Input = EncodedFrame;
    type Output = ImputedFrame;

    fn name(&self) -> &'static str {
        "imputer"
    }

    fn is_fitted(&self) -> bool {
        self.replacements.is_some()
    }

    fn fit(&mut self, input: &EncodedFrame) -> Result<(), PipelineError> {
        let frame = input.as_frame();
        let available: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = self.columns.resolve(&available, |name| input.is_encoded(name))?;
        if let Some(raw) = columns.iter().find(|name| !input.is_encoded(name)) {
            let dtype = frame
                .column(raw)
                .map(|c| c.dtype().to_string())
                .unwrap_or_default();
            return Err(PipelineError::NotEncoded {
                column: raw.clone(),
                dtype,
            });
        }

        let mut replacements = BTreeMap::new();
        for name in columns {
            let values = integer_values(frame, &name)?;
            let replacement = most_frequent(values)
                .ok_or_else(|| PipelineError::NothingToImpute(name.clone()))?;
            debug!(column = %name, replacement, "fitted imputer column");
            replacements.insert(name, replacement);
        }

        self.replacements = Some(replacements);
        Ok(())
    }

    fn transform(&self, input: &EncodedFrame) -> Result<ImputedFrame, PipelineError> {
        let replacements = self.replacements.as_ref().ok_or(PipelineError::NotFitted {
            stage: self.name(),
        })?;

        let frame = input.as_frame();
        let mut output = frame.clone();
        for (name, &replacement) in replacements {
            let filled: Vec<i64> = integer_values(frame, name)?
                .into_iter()
                .map(|value| match value {
                    Some(v) if v != SENTINEL => v,
                    _ => replacement,
                })
                .collect();
            output.with_column(Column::new(name.as_str().into(), filled))?;
        }

        Ok(ImputedFrame(output))
    }
}
