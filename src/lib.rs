//! Census: income classification on the UCI adult dataset
//!
//! Loads the census files, encodes and imputes categorical columns, fits a
//! regularized logistic regression and persists the fitted pipeline for
//! interactive prediction.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod report;
pub mod utils;
