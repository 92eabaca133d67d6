//! Dataset metadata: target classes, column order and categorical domains

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::DataError;
use super::loader::{load_split, LabeledFrame, Split};
use super::{COLUMN_NAMES, META_FILE, TARGET_COLUMN, TRAIN_FILE};

/// Description of the census tables, captured once from the training split.
///
/// Serialized as `meta.json` and read back both when training and when
/// prompting for predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Target classes, sorted so that a class's position is its label code
    pub target_names: Vec<String>,
    /// All column names in file order, target last
    pub feature_names: Vec<String>,
    /// Observed values of every string column (target included), in order of first appearance
    pub categorical_features: BTreeMap<String, Vec<String>>,
}

impl DatasetMeta {
    /// Capture metadata from a training table
    pub fn from_training(train: &LabeledFrame, target_column: &str) -> Result<Self, DataError> {
        let mut feature_names: Vec<String> = train
            .features
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        feature_names.push(target_column.to_string());

        let mut categorical_features = BTreeMap::new();
        for column in train.features.get_columns() {
            if column.dtype() != &DataType::String {
                continue;
            }
            let values = unique_in_order(column.str()?.into_iter().flatten());
            categorical_features.insert(column.name().to_string(), values);
        }
        categorical_features.insert(
            target_column.to_string(),
            unique_in_order(train.target.iter().map(String::as_str)),
        );

        let target_names: Vec<String> = train
            .target
            .iter()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        Ok(Self {
            target_names,
            feature_names,
            categorical_features,
        })
    }

    /// Name of the target column (the last listed column)
    pub fn target_column(&self) -> Option<&str> {
        self.feature_names.last().map(String::as_str)
    }

    /// Input feature names in file order, target excluded
    pub fn input_features(&self) -> &[String] {
        match self.feature_names.split_last() {
            Some((_, features)) => features,
            None => &[],
        }
    }

    /// Known values of a categorical input feature
    pub fn domain(&self, column: &str) -> Option<&[String]> {
        if Some(column) == self.target_column() {
            return None;
        }
        self.categorical_features.get(column).map(Vec::as_slice)
    }

    /// Categorical domains of the input features, target removed
    pub fn input_domains(&self) -> BTreeMap<String, Vec<String>> {
        let mut domains = self.categorical_features.clone();
        if let Some(target) = self.target_column() {
            domains.remove(target);
        }
        domains
    }

    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| DataError::Meta {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| DataError::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| DataError::Meta {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load `meta.json` from `root`, building it from the training file when
/// missing or when `rebuild` is set.
pub fn load_or_build_meta(root: &Path, rebuild: bool) -> Result<DatasetMeta, DataError> {
    let meta_path = root.join(META_FILE);
    if meta_path.exists() && !rebuild {
        return DatasetMeta::load(&meta_path);
    }

    let names: Vec<String> = COLUMN_NAMES.iter().map(|s| s.to_string()).collect();
    let train = load_split(&root.join(TRAIN_FILE), &names, Split::Train)?;
    let meta = DatasetMeta::from_training(&train, TARGET_COLUMN)?;
    meta.save(&meta_path)?;
    debug!(path = %meta_path.display(), "wrote dataset metadata");
    Ok(meta)
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut unique = Vec::new();
    for value in values {
        if seen.insert(value) {
            unique.push(value.to_string());
        }
    }
    unique
}
