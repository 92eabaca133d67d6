//! Error types for fitting and applying pipeline stages.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the encoder, imputer, classifier and the pipeline that
/// composes them.
///
/// [`PipelineError::NotFitted`] marks a programming error (a stage used before
/// `fit`) and is kept apart from the data errors; see
/// [`PipelineError::is_not_fitted`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage was asked to transform or predict before being fitted.
    #[error("Stage '{stage}' has not been fitted; call fit before transform or predict")]
    NotFitted { stage: &'static str },

    /// The encoder received a column that already holds codes.
    #[error("Column '{column}' is already encoded ({dtype}); the encoder expects raw categories")]
    AlreadyEncoded { column: String, dtype: String },

    /// A stage that works on codes received a non-integer column.
    #[error("Column '{column}' must be integer-coded ({dtype} found)")]
    NotEncoded { column: String, dtype: String },

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A value not seen while fitting the encoder.
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("Unknown target label '{0}'")]
    UnknownLabel(String),

    /// Every training value of an imputed column is the missing sentinel.
    #[error("Column '{0}' has no non-missing values to impute from")]
    NothingToImpute(String),

    #[error("Feature rows ({rows}) and labels ({labels}) differ in length")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("Label {0} is not binary (expected 0 or 1)")]
    InvalidLabel(usize),

    #[error("Training labels contain a single class; both classes are required")]
    SingleClass,

    #[error("Expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Column '{0}' contains null values")]
    NullValues(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    /// True for stale-pipeline errors (use before `fit`)
    pub fn is_not_fitted(&self) -> bool {
        matches!(self, PipelineError::NotFitted { .. })
    }
}
