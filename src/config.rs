//! Pipeline configuration

use serde::{Deserialize, Serialize};

use crate::pipeline::{ColumnSelection, LogisticConfig, UnknownCategoryPolicy};

/// Columns imputed by default: the census columns that carry `?` entries
pub const DEFAULT_IMPUTE_COLUMNS: [&str; 3] = ["workclass", "native-country", "occupation"];

/// Settings for building an unfitted [`crate::pipeline::Pipeline`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Columns the encoder turns into codes
    pub categorical: ColumnSelection,
    /// Columns the imputer fills
    pub impute: ColumnSelection,
    /// Handling of categories not seen during training
    pub unknown_categories: UnknownCategoryPolicy,
    pub classifier: LogisticConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            categorical: ColumnSelection::All,
            impute: ColumnSelection::only(DEFAULT_IMPUTE_COLUMNS),
            unknown_categories: UnknownCategoryPolicy::default(),
            classifier: LogisticConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Replace the imputed columns; an empty list means every encoded column
    pub fn with_impute_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.impute = if columns.is_empty() {
            ColumnSelection::All
        } else {
            ColumnSelection::only(columns)
        };
        self
    }
}
