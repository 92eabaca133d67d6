//! Pipeline module - encoding, imputation and classification stages

pub mod artifact;
pub mod classifier;
pub mod encoder;
pub mod error;
pub mod imputer;
pub mod model;
pub mod target;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use artifact::*;
pub use classifier::*;
pub use encoder::*;
pub use error::PipelineError;
pub use imputer::*;
pub use model::*;
pub use target::*;

/// Columns a stage operates on.
///
/// The selection is resolved against the training table at fit time and the
/// resolved list lives in the stage's fitted state; the selection itself is
/// never rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelection {
    /// Every eligible column present at fit time
    #[default]
    All,
    /// Exactly these columns; each must exist at fit time
    Only(BTreeSet<String>),
}

impl ColumnSelection {
    pub fn only<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Only(columns.into_iter().map(Into::into).collect())
    }

    /// Resolve to concrete column names, in the order they appear in `available`.
    ///
    /// `All` keeps the columns accepted by `eligible`; `Only` requires every
    /// named column to be present.
    pub fn resolve(
        &self,
        available: &[String],
        eligible: impl Fn(&str) -> bool,
    ) -> Result<Vec<String>, PipelineError> {
        match self {
            ColumnSelection::All => Ok(available
                .iter()
                .filter(|name| eligible(name))
                .cloned()
                .collect()),
            ColumnSelection::Only(names) => {
                if let Some(missing) = names.iter().find(|name| !available.contains(*name)) {
                    return Err(PipelineError::MissingColumn(missing.clone()));
                }
                Ok(available
                    .iter()
                    .filter(|name| names.contains(*name))
                    .cloned()
                    .collect())
            }
        }
    }
}

/// A fit/transform step of the pipeline.
///
/// `fit` learns state from training input only; `transform` applies that
/// state and must fail with [`PipelineError::NotFitted`] before `fit`.
pub trait Stage {
    type Input;
    type Output;

    /// Stage name used in errors and logs
    fn name(&self) -> &'static str;

    fn is_fitted(&self) -> bool;

    fn fit(&mut self, input: &Self::Input) -> Result<(), PipelineError>;

    fn transform(&self, input: &Self::Input) -> Result<Self::Output, PipelineError>;

    fn fit_transform(&mut self, input: &Self::Input) -> Result<Self::Output, PipelineError> {
        self.fit(input)?;
        self.transform(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_all_filters_eligible() {
        let available = names(&["age", "workclass", "sex"]);
        let resolved = ColumnSelection::All
            .resolve(&available, |name| name != "age")
            .unwrap();
        assert_eq!(resolved, names(&["workclass", "sex"]));
    }

    #[test]
    fn test_resolve_only_keeps_table_order() {
        let available = names(&["age", "workclass", "sex"]);
        let resolved = ColumnSelection::only(["sex", "workclass"])
            .resolve(&available, |_| false)
            .unwrap();
        assert_eq!(resolved, names(&["workclass", "sex"]));
    }

    #[test]
    fn test_resolve_only_missing_column() {
        let available = names(&["age"]);
        let err = ColumnSelection::only(["occupation"])
            .resolve(&available, |_| true)
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(c) if c == "occupation"));
    }
}
