//! CLI module - argument parsing, subcommands and interactive prompts

mod args;
pub mod describe;
pub mod download;
pub mod predict;
pub mod prompts;
pub mod train;

pub use args::*;
pub use describe::run_describe;
pub use download::run_download;
pub use predict::run_predict;
pub use prompts::*;
pub use train::{run_train, TrainOptions};
