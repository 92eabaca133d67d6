//! Model persistence
//!
//! A trained model is stored as a single JSON document tagged with a format
//! name and version. The tag is checked before the pipeline itself is
//! deserialized so an artifact from another tool or an incompatible release
//! fails with a clear error.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::model::Pipeline;
use super::target::TargetEncoder;

pub const ARTIFACT_FORMAT: &str = "census-income/pipeline";
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to access model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported artifact format '{0}' (expected '{expected}')", expected = ARTIFACT_FORMAT)]
    UnsupportedFormat(String),

    #[error("Unsupported artifact version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Model artifact holds an unfitted pipeline")]
    NotFitted,
}

/// A fitted pipeline together with the mapping of its labels to class names
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub target: TargetEncoder,
    pub pipeline: Pipeline,
}

impl TrainedModel {
    pub fn new(target: TargetEncoder, pipeline: Pipeline) -> Self {
        Self { target, pipeline }
    }
}

#[derive(Deserialize)]
struct ArtifactHeader {
    format: String,
    version: u32,
}

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format: &'static str,
    version: u32,
    created_at: String,
    crate_version: &'static str,
    target_names: &'a [String],
    pipeline: &'a Pipeline,
}

#[derive(Deserialize)]
struct Artifact {
    target_names: Vec<String>,
    pipeline: Pipeline,
}

pub fn to_bytes(model: &TrainedModel) -> Result<Vec<u8>, ArtifactError> {
    if !model.pipeline.is_fitted() {
        return Err(ArtifactError::NotFitted);
    }
    let artifact = ArtifactRef {
        format: ARTIFACT_FORMAT,
        version: ARTIFACT_VERSION,
        created_at: Utc::now().to_rfc3339(),
        crate_version: env!("CARGO_PKG_VERSION"),
        target_names: model.target.classes(),
        pipeline: &model.pipeline,
    };
    Ok(serde_json::to_vec_pretty(&artifact)?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<TrainedModel, ArtifactError> {
    let header: ArtifactHeader = serde_json::from_slice(bytes)?;
    if header.format != ARTIFACT_FORMAT {
        return Err(ArtifactError::UnsupportedFormat(header.format));
    }
    if header.version != ARTIFACT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            found: header.version,
            supported: ARTIFACT_VERSION,
        });
    }

    let artifact: Artifact = serde_json::from_slice(bytes)?;
    if !artifact.pipeline.is_fitted() {
        return Err(ArtifactError::NotFitted);
    }
    Ok(TrainedModel::new(
        TargetEncoder::new(artifact.target_names),
        artifact.pipeline,
    ))
}

pub fn save_model(model: &TrainedModel, path: &Path) -> Result<(), ArtifactError> {
    let bytes = to_bytes(model)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "model saved");
    Ok(())
}

pub fn load_model(path: &Path) -> Result<TrainedModel, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_bytes(&bytes)
}
