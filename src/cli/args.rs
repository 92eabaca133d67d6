//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::PipelineConfig;
use crate::dataset::MODEL_FILE;
use crate::pipeline::{ColumnSelection, LogisticConfig, UnknownCategoryPolicy};

/// Census - predict whether income exceeds $50K/yr from census data
#[derive(Parser, Debug)]
#[command(name = "census")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug diagnostics on stderr (otherwise controlled by RUST_LOG)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download adult.data, adult.names and adult.test from the UCI repository
    Download {
        /// Directory the files are written to
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Summarize the training data: numeric statistics and income crosstabs
    Describe {
        /// Directory holding the census files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Categorical columns to cross-tabulate against income (comma-separated)
        #[arg(long, value_delimiter = ',', default_value = "occupation,education")]
        by: Vec<String>,
    },

    /// Fit the pipeline on adult.data, evaluate on adult.test and save the model
    Train {
        /// Directory holding the census files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Model output path. Defaults to <data-dir>/classifier.json
        #[arg(long)]
        model: Option<PathBuf>,

        /// Inverse L2 regularization strength
        #[arg(long, default_value = "1.0", value_parser = validate_positive)]
        c: f64,

        /// Maximum Newton iterations of the solver
        #[arg(long, default_value = "100", value_parser = validate_max_iter)]
        max_iter: usize,

        /// Convergence tolerance on the largest coefficient update
        #[arg(long, default_value = "1e-6", value_parser = validate_positive)]
        tolerance: f64,

        /// Columns whose missing entries are imputed (comma-separated, or "all")
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "workclass,native-country,occupation"
        )]
        impute: Vec<String>,

        /// Handling of categories unseen during training: "reject" or "as-missing"
        #[arg(long, default_value = "reject", value_parser = parse_policy)]
        unknown_categories: UnknownCategoryPolicy,

        /// Rebuild meta.json from adult.data even if it exists
        #[arg(long, default_value = "false")]
        rebuild_meta: bool,
    },

    /// Predict income for one person, prompting for any value not given
    Predict {
        /// Directory holding meta.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Model path. Defaults to <data-dir>/classifier.json
        #[arg(long)]
        model: Option<PathBuf>,

        /// Feature value as COLUMN=VALUE; may be repeated
        #[arg(long = "value", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },
}

/// Model path, defaulting to the standard file inside the data directory
pub fn model_path(data_dir: &Path, model: Option<&Path>) -> PathBuf {
    model
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join(MODEL_FILE))
}

/// Build the pipeline configuration from the `train` flags
pub fn pipeline_config(
    c: f64,
    max_iter: usize,
    tolerance: f64,
    impute: &[String],
    unknown_categories: UnknownCategoryPolicy,
) -> PipelineConfig {
    let impute = if impute.iter().any(|c| c.eq_ignore_ascii_case("all")) {
        ColumnSelection::All
    } else {
        ColumnSelection::only(impute.iter().map(|c| c.trim()).filter(|c| !c.is_empty()))
    };

    PipelineConfig {
        impute,
        unknown_categories,
        classifier: LogisticConfig {
            c,
            max_iter,
            tolerance,
        },
        ..PipelineConfig::default()
    }
}

/// Validator for strictly positive floating point parameters
fn validate_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("value must be positive, got {}", value))
    }
}

/// Validator for max_iter parameter
fn validate_max_iter(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid integer", s))?;

    if value == 0 {
        Err("max_iter must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

fn parse_policy(s: &str) -> Result<UnknownCategoryPolicy, String> {
    s.parse()
}

/// Parse a `COLUMN=VALUE` pair
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", s))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    Ok((column.to_string(), value.trim().to_string()))
}
