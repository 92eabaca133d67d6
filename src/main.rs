//! Census: income classification CLI
//!
//! Downloads the UCI adult dataset, summarizes it, trains the
//! encoder → imputer → classifier pipeline and predicts interactively.

use anyhow::Result;
use clap::Parser;

use census::cli::{
    model_path, pipeline_config, run_describe, run_download, run_predict, run_train, Cli,
    Commands, TrainOptions,
};
use census::utils::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Download { data_dir } => run_download(&data_dir),
        Commands::Describe { data_dir, by } => run_describe(&data_dir, &by),
        Commands::Train {
            data_dir,
            model,
            c,
            max_iter,
            tolerance,
            impute,
            unknown_categories,
            rebuild_meta,
        } => {
            let opts = TrainOptions {
                model: model_path(&data_dir, model.as_deref()),
                config: pipeline_config(c, max_iter, tolerance, &impute, unknown_categories),
                data_dir,
                rebuild_meta,
            };
            run_train(&opts).map(|_| ())
        }
        Commands::Predict {
            data_dir,
            model,
            values,
        } => run_predict(&data_dir, &model_path(&data_dir, model.as_deref()), &values),
    }
}
