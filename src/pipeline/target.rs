//! Target label mapping
//!
//! Maps income class names to the integer labels the classifier trains on
//! and back. Labels are normalized first, so the test split's `">50K."`
//! encodes to the same integer as the training split's `">50K"`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::PipelineError;
use crate::dataset::normalize_label;

/// Bidirectional mapping between class names and labels `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEncoder {
    /// Sorted class names; `classes[i]` has label `i`
    classes: Vec<String>,
}

impl TargetEncoder {
    /// Create an encoder from known class names (e.g. from dataset metadata)
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = classes
            .into_iter()
            .map(|c| normalize_label(c.as_ref()).to_string())
            .collect();
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Learn the classes from observed labels
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Result<Self, PipelineError> {
        if labels.is_empty() {
            return Err(PipelineError::EmptyData(
                "no target labels to fit".to_string(),
            ));
        }
        Ok(Self::new(labels))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode_one(&self, label: &str) -> Result<usize, PipelineError> {
        let normalized = normalize_label(label);
        self.classes
            .binary_search_by(|c| c.as_str().cmp(&normalized))
            .map_err(|_| PipelineError::UnknownLabel(label.to_string()))
    }

    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, PipelineError> {
        labels.iter().map(|l| self.encode_one(l.as_ref())).collect()
    }

    pub fn decode(&self, label: usize) -> Result<&str, PipelineError> {
        self.classes
            .get(label)
            .map(String::as_str)
            .ok_or(PipelineError::InvalidLabel(label))
    }

    /// Number of occurrences of each class; unknown labels are an error
    pub fn count_labels<S: AsRef<str>>(
        &self,
        labels: &[S],
    ) -> Result<BTreeMap<String, usize>, PipelineError> {
        let mut counts: BTreeMap<String, usize> =
            self.classes.iter().map(|c| (c.clone(), 0)).collect();
        for code in self.encode(labels)? {
            if let Some(count) = counts.get_mut(&self.classes[code]) {
                *count += 1;
            }
        }
        Ok(counts)
    }
}
