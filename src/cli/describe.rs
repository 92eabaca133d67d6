//! `describe` subcommand

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::dataset::{load_split, Split, COLUMN_NAMES, TRAIN_FILE};
use crate::report::{crosstab, describe_numeric, render_numeric_summary};
use crate::utils::{create_spinner, finish_with_success, print_step_header, print_table};

/// Print numeric statistics of the training file and crosstabs of the
/// `by` columns against income
pub fn run_describe(data_dir: &Path, by: &[String]) -> Result<()> {
    let path = data_dir.join(TRAIN_FILE);
    let names: Vec<String> = COLUMN_NAMES.iter().map(|s| s.to_string()).collect();

    let spinner = create_spinner("Loading training data...");
    let train = load_split(&path, &names, Split::Train)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    finish_with_success(
        &spinner,
        &format!("Loaded {} rows from {}", train.features.height(), TRAIN_FILE),
    );

    print_step_header(1, "Numeric Columns");
    let summaries = describe_numeric(&train.features)?;
    print_table(&render_numeric_summary(&summaries));

    for (idx, column) in by.iter().enumerate() {
        print_step_header(idx as u8 + 2, &format!("{} by income", column));
        let table = crosstab(&train.features, column, &train.target)
            .with_context(|| format!("Cannot cross-tabulate '{}'", column))?;
        print_table(&table.render());
        println!(
            "      {} distinct values",
            style(table.rows.len()).yellow().bold()
        );
    }

    Ok(())
}
