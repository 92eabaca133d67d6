//! `predict` subcommand

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use super::prompts::{confirm_step, is_fully_specified, prompt_record};
use crate::dataset::{DatasetMeta, META_FILE};
use crate::pipeline::load_model;

/// Predict the income class of one person at a time.
///
/// Values not given as presets are asked for interactively; when every
/// feature is preset a single prediction is printed without prompting.
pub fn run_predict(data_dir: &Path, model_path: &Path, preset: &[(String, String)]) -> Result<()> {
    let meta_path = data_dir.join(META_FILE);
    let meta = DatasetMeta::load(&meta_path).with_context(|| {
        format!(
            "Failed to load {} (run `census train` first)",
            meta_path.display()
        )
    })?;
    let model = load_model(model_path)
        .with_context(|| format!("Failed to load the model from {}", model_path.display()))?;

    let interactive = !is_fully_specified(&meta, preset);
    loop {
        let record = prompt_record(&meta, preset)?;
        let frame = record.to_frame(&meta)?;

        let label = model.pipeline.predict(&frame)?[0];
        let p_positive = model.pipeline.predict_proba(&frame)?[0];
        let confidence = if label == 1 { p_positive } else { 1.0 - p_positive };
        let class = model.target.decode(label)?;

        println!(
            "We predict that you make {} {}",
            style(class).green().bold(),
            style(format!("({:.1}% confidence)", confidence * 100.0)).dim()
        );

        if !interactive || !confirm_step("Predict another?")? {
            break;
        }
    }

    Ok(())
}
