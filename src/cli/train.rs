//! `train` subcommand

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use crate::config::PipelineConfig;
use crate::dataset::{load_dataset, load_or_build_meta};
use crate::pipeline::{save_model, Pipeline, TargetEncoder, TrainedModel};
use crate::report::{accuracy, majority_baseline, ClassificationReport, TrainingSummary};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_success,
};

/// Everything the `train` subcommand needs
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub data_dir: PathBuf,
    pub model: PathBuf,
    pub config: PipelineConfig,
    pub rebuild_meta: bool,
}

pub fn run_train(opts: &TrainOptions) -> Result<TrainingSummary> {
    let TrainOptions {
        data_dir,
        model,
        config,
        rebuild_meta,
    } = opts;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        data_dir,
        model,
        config.classifier.c,
        config.classifier.max_iter,
        &format!("{:?}", config.impute),
        &config.unknown_categories.to_string(),
    );

    // Step 1: metadata and data
    print_step_header(1, "Load Dataset");
    let spinner = create_spinner("Reading metadata and census files...");
    let meta = load_or_build_meta(data_dir, *rebuild_meta)
        .with_context(|| format!("Failed to prepare metadata in {}", data_dir.display()))?;
    let dataset = load_dataset(data_dir, &meta)
        .with_context(|| format!("Failed to load the census files in {}", data_dir.display()))?;
    finish_with_success(&spinner, "Dataset loaded");
    print_count("training rows", dataset.data.height(), None);
    print_count("test rows", dataset.data_test.height(), None);
    print_count(
        "categorical features",
        dataset.categorical_features.len(),
        None,
    );

    let target = TargetEncoder::new(&dataset.target_names);
    let y_train = target.encode(&dataset.target)?;
    let y_test = target.encode(&dataset.target_test)?;
    print_count("income classes", target.n_classes(), None);
    for (class, count) in target.count_labels(&dataset.target)? {
        print_info(&format!("{}: {} training rows", class, count));
    }

    // Step 2: fit
    print_step_header(2, "Fit Pipeline");
    let step_start = Instant::now();
    let mut pipeline = Pipeline::from_config(config);
    print_info(&format!("Stages: {}", pipeline.stage_names().join(" → ")));
    let spinner = create_spinner("Encoding, imputing and fitting the classifier...");
    pipeline
        .fit(&dataset.data, &y_train)
        .context("Failed to fit the pipeline")?;
    let converged = pipeline.classifier().converged().unwrap_or(false);
    let iterations = pipeline.classifier().n_iter().unwrap_or(0);
    if converged {
        finish_with_success(
            &spinner,
            &format!("Fitted in {} iterations", iterations),
        );
    } else {
        finish_with_warning(
            &spinner,
            &format!("Stopped after {} iterations without converging", iterations),
        );
    }
    println!(
        "      {}",
        style(format!("⏱ {:.2}s", step_start.elapsed().as_secs_f64())).dim()
    );

    let mut summary = TrainingSummary::new(
        dataset.data.height(),
        dataset.data_test.height(),
        pipeline.features().map_or(0, |f| f.len()),
    );
    summary.encoded_columns = pipeline.encoder().encoded_columns().len();
    summary.iterations = iterations;
    summary.converged = converged;
    if let Some(replacements) = pipeline.imputer().replacements() {
        for (column, &code) in replacements {
            let value = pipeline.encoder().inverse(column, code)?;
            summary.imputed.push((column.clone(), value.to_string()));
        }
    }

    // Step 3: evaluate
    print_step_header(3, "Evaluate");
    let train_pred = pipeline.predict(&dataset.data)?;
    let test_pred = pipeline
        .predict(&dataset.data_test)
        .context("Failed to score the test split")?;
    summary.train_accuracy = accuracy(&y_train, &train_pred)?;
    summary.test_accuracy = accuracy(&y_test, &test_pred)?;
    summary.baseline = majority_baseline(&y_test);

    let report = ClassificationReport::compute(&y_test, &test_pred, target.classes())?;
    report.display("CLASSIFICATION REPORT (adult.test)");

    // Step 4: persist
    print_step_header(4, "Save Model");
    let trained = TrainedModel::new(target, pipeline);
    save_model(&trained, model)
        .with_context(|| format!("Failed to save the model to {}", model.display()))?;
    print_success(&format!("Model written to {}", model.display()));

    summary.display();
    print_completion("Training complete!");
    Ok(summary)
}
