//! The composed encoder → imputer → classifier pipeline

use faer::Mat;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::classifier::LogisticRegression;
use super::encoder::CategoricalEncoder;
use super::error::PipelineError;
use super::imputer::CategoricalImputer;
use super::Stage;
use crate::config::PipelineConfig;

/// Encoding, imputation and classification fitted as one unit.
///
/// Only the classifier sees the labels. `fit` is atomic: a failure in any
/// stage leaves the pipeline exactly as it was.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pipeline {
    encoder: CategoricalEncoder,
    imputer: CategoricalImputer,
    classifier: LogisticRegression,
    /// Feature columns, in matrix order, fixed at fit time
    features: Option<Vec<String>>,
}

impl Pipeline {
    pub fn new(
        encoder: CategoricalEncoder,
        imputer: CategoricalImputer,
        classifier: LogisticRegression,
    ) -> Self {
        Self {
            encoder,
            imputer,
            classifier,
            features: None,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            CategoricalEncoder::new(config.categorical.clone())
                .with_unknown_policy(config.unknown_categories),
            CategoricalImputer::new(config.impute.clone()),
            LogisticRegression::new(config.classifier),
        )
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> [&'static str; 3] {
        [
            self.encoder.name(),
            self.imputer.name(),
            self.classifier.name(),
        ]
    }

    pub fn is_fitted(&self) -> bool {
        self.features.is_some()
            && self.encoder.is_fitted()
            && self.imputer.is_fitted()
            && self.classifier.is_fitted()
    }

    pub fn encoder(&self) -> &CategoricalEncoder {
        &self.encoder
    }

    pub fn imputer(&self) -> &CategoricalImputer {
        &self.imputer
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// Feature columns seen at fit time
    pub fn features(&self) -> Option<&[String]> {
        self.features.as_deref()
    }

    pub fn fit(&mut self, x: &DataFrame, y: &[usize]) -> Result<(), PipelineError> {
        if x.height() != y.len() {
            return Err(PipelineError::LengthMismatch {
                rows: x.height(),
                labels: y.len(),
            });
        }

        let mut encoder = self.encoder.clone();
        let mut imputer = self.imputer.clone();
        let mut classifier = self.classifier.clone();

        let encoded = encoder.fit_transform(x)?;
        debug!(columns = ?encoder.encoded_columns(), "encoder fitted");
        let imputed = imputer.fit_transform(&encoded)?;
        debug!(replacements = ?imputer.replacements(), "imputer fitted");

        let frame = imputed.as_frame();
        let features: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matrix = frame_to_matrix(frame, &features)?;
        classifier.fit(&matrix, y)?;
        info!(
            rows = x.height(),
            features = features.len(),
            iterations = classifier.n_iter().unwrap_or(0),
            "pipeline fitted"
        );

        self.encoder = encoder;
        self.imputer = imputer;
        self.classifier = classifier;
        self.features = Some(features);
        Ok(())
    }

    /// Apply the fitted encoder and imputer, producing the classifier's input
    pub fn transform(&self, x: &DataFrame) -> Result<Mat<f64>, PipelineError> {
        let features = match &self.features {
            Some(features) if self.is_fitted() => features,
            _ => return Err(PipelineError::NotFitted { stage: "pipeline" }),
        };
        let encoded = self.encoder.transform(x)?;
        let imputed = self.imputer.transform(&encoded)?;
        frame_to_matrix(imputed.as_frame(), features)
    }

    pub fn predict(&self, x: &DataFrame) -> Result<Vec<usize>, PipelineError> {
        let matrix = self.transform(x)?;
        self.classifier.predict(&matrix)
    }

    /// Probability of label 1 per row
    pub fn predict_proba(&self, x: &DataFrame) -> Result<Vec<f64>, PipelineError> {
        let matrix = self.transform(x)?;
        self.classifier.predict_proba(&matrix)
    }
}

/// Copy the named numeric columns of a frame into a row-major feature matrix
pub fn frame_to_matrix(frame: &DataFrame, columns: &[String]) -> Result<Mat<f64>, PipelineError> {
    let mut matrix = Mat::<f64>::zeros(frame.height(), columns.len());

    for (j, name) in columns.iter().enumerate() {
        let column = frame
            .column(name)
            .map_err(|_| PipelineError::MissingColumn(name.clone()))?;
        if !column.dtype().is_primitive_numeric() {
            return Err(PipelineError::NotEncoded {
                column: name.clone(),
                dtype: column.dtype().to_string(),
            });
        }
        if column.null_count() > 0 {
            return Err(PipelineError::NullValues(name.clone()));
        }

        let cast = column.cast(&DataType::Float64)?;
        for (i, value) in cast.f64()?.into_no_null_iter().enumerate() {
            matrix[(i, j)] = value;
        }
    }

    Ok(matrix)
}
