//! Tests for CLI argument parsing and the end-to-end commands

mod common;

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use census::cli::{model_path, pipeline_config, run_train, Cli, Commands, TrainOptions};
use census::pipeline::UnknownCategoryPolicy;
use clap::Parser;
use common::census_dir;
use predicates::prelude::*;

const PRESET_VALUES: [&str; 13] = [
    "age=52",
    "workclass=Self-emp-not-inc",
    "education=Masters",
    "education-num=14",
    "marital-status=Married-civ-spouse",
    "occupation=Exec-managerial",
    "relationship=Husband",
    "race=White",
    "sex=Male",
    "capital-gain=15024",
    "capital-loss=0",
    "hours-per-week=60",
    "native-country=United-States",
];

#[test]
fn test_cli_train_default_values() {
    let cli = Cli::parse_from(["census", "train"]);
    assert!(!cli.verbose);

    match cli.command {
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
            assert_eq!(data_dir, PathBuf::from("data"));
            assert!(model.is_none());
            assert_eq!(c, 1.0, "Default C should be 1.0");
            assert_eq!(max_iter, 100);
            assert_eq!(tolerance, 1e-6);
            assert_eq!(impute, vec!["workclass", "native-country", "occupation"]);
            assert_eq!(unknown_categories, UnknownCategoryPolicy::Reject);
            assert!(!rebuild_meta);
        }
        other => panic!("Expected train, got {other:?}"),
    }
}

#[test]
fn test_cli_train_custom_values() {
    let cli = Cli::parse_from([
        "census",
        "--verbose",
        "train",
        "--data-dir",
        "/tmp/census",
        "--c",
        "0.5",
        "--impute",
        "workclass",
        "--unknown-categories",
        "as-missing",
    ]);
    assert!(cli.verbose);

    match cli.command {
        Commands::Train {
            data_dir,
            c,
            impute,
            unknown_categories,
            ..
        } => {
            assert_eq!(data_dir, PathBuf::from("/tmp/census"));
            assert_eq!(c, 0.5);
            assert_eq!(impute, vec!["workclass"]);
            assert_eq!(unknown_categories, UnknownCategoryPolicy::AsMissing);
        }
        other => panic!("Expected train, got {other:?}"),
    }
}

#[test]
fn test_cli_rejects_invalid_values() {
    assert!(Cli::try_parse_from(["census", "train", "--c", "0"]).is_err());
    assert!(Cli::try_parse_from(["census", "train", "--c", "abc"]).is_err());
    assert!(Cli::try_parse_from(["census", "train", "--max-iter", "0"]).is_err());
    assert!(Cli::try_parse_from(["census", "train", "--unknown-categories", "skip"]).is_err());
    assert!(Cli::try_parse_from(["census", "predict", "--value", "age"]).is_err());
    assert!(Cli::try_parse_from(["census"]).is_err(), "a subcommand is required");
}

#[test]
fn test_cli_predict_values() {
    let cli = Cli::parse_from([
        "census",
        "predict",
        "--value",
        "age=39",
        "--value",
        "sex=Male",
    ]);
    match cli.command {
        Commands::Predict { values, model, .. } => {
            assert!(model.is_none());
            assert_eq!(
                values,
                vec![
                    ("age".to_string(), "39".to_string()),
                    ("sex".to_string(), "Male".to_string())
                ]
            );
        }
        other => panic!("Expected predict, got {other:?}"),
    }
}

#[test]
fn test_cli_describe_default_columns() {
    let cli = Cli::parse_from(["census", "describe"]);
    match cli.command {
        Commands::Describe { by, .. } => assert_eq!(by, vec!["occupation", "education"]),
        other => panic!("Expected describe, got {other:?}"),
    }
}

fn census_cmd() -> Command {
    Command::cargo_bin("census").unwrap()
}

fn train_in(dir: &Path) {
    census_cmd()
        .args(["train", "--data-dir"])
        .arg(dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("CLASSIFICATION REPORT"))
        .stdout(predicate::str::contains("Training complete"));
}

#[test]
fn test_train_then_predict() {
    let dir = census_dir(600, 150, 71);
    train_in(dir.path());
    assert!(dir.path().join("meta.json").exists());
    assert!(dir.path().join("classifier.json").exists());

    let mut cmd = census_cmd();
    cmd.args(["predict", "--data-dir"]).arg(dir.path());
    for value in PRESET_VALUES {
        cmd.args(["--value", value]);
    }
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("We predict that you make"))
        .stdout(predicate::str::contains(">50K"));
}

#[test]
fn test_predict_rejects_out_of_domain_value() {
    let dir = census_dir(300, 50, 72);
    train_in(dir.path());

    let mut cmd = census_cmd();
    cmd.args(["predict", "--data-dir"]).arg(dir.path());
    for value in PRESET_VALUES {
        cmd.args(["--value", value]);
    }
    cmd.args(["--value", "sex=Robot"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("sex=Robot"));
}

#[test]
fn test_predict_without_model_fails() {
    let dir = census_dir(50, 10, 73);
    census_cmd()
        .args(["predict", "--data-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("meta.json"));
}

#[test]
fn test_describe_prints_tables() {
    let dir = census_dir(200, 10, 74);
    census_cmd()
        .args(["describe", "--by", "sex", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("hours-per-week"))
        .stdout(predicate::str::contains("Female"));
}

#[test]
fn test_run_train_impute_all() {
    let dir = census_dir(400, 80, 75);
    let opts = TrainOptions {
        data_dir: dir.path().to_path_buf(),
        model: model_path(dir.path(), None),
        config: pipeline_config(
            1.0,
            100,
            1e-6,
            &["all".to_string()],
            UnknownCategoryPolicy::Reject,
        ),
        rebuild_meta: false,
    };

    let summary = run_train(&opts).unwrap();
    assert_eq!(summary.imputed.len(), 8);
    assert!(summary.imputed.iter().all(|(column, _)| column != "capital-gain"));
    assert!(summary.imputed.iter().all(|(_, value)| value != "?"));
    assert!(opts.model.exists());
}

#[test]
fn test_train_impute_all_command() {
    let dir = census_dir(300, 60, 76);
    census_cmd()
        .args(["train", "--impute", "all", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Training complete"));
}
