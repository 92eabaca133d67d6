//! Tests for the categorical encoder

mod common;

use std::collections::BTreeSet;

use census::pipeline::*;
use common::{census_dir, column_names, create_raw_frame};
use polars::prelude::*;

fn distinct(frame: &DataFrame, column: &str) -> usize {
    frame
        .column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .len()
}

#[test]
fn test_code_count_matches_distinct_values() {
    let dir = census_dir(300, 10, 7);
    let train = census::dataset::load_split(
        &dir.path().join("adult.data"),
        &column_names(),
        census::dataset::Split::Train,
    )
    .unwrap();

    let mut encoder = CategoricalEncoder::default();
    encoder.fit(&train.features).unwrap();

    assert_eq!(encoder.encoded_columns().len(), 8);
    for column in encoder.encoded_columns() {
        let table = encoder.table(column).unwrap();
        assert_eq!(
            table.len(),
            distinct(&train.features, column),
            "code count of '{}' should equal its distinct values",
            column
        );
    }
}

#[test]
fn test_transform_encodes_only_fitted_columns() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::new(ColumnSelection::only(["workclass"]));
    let encoded = encoder.fit_transform(&df).unwrap();
    let frame = encoded.as_frame();

    assert_eq!(frame.column("workclass").unwrap().dtype(), &DataType::Int64);
    assert_eq!(frame.column("sex").unwrap().dtype(), &DataType::String);
    assert_eq!(frame.column("age").unwrap().dtype(), &DataType::Int64);

    let codes: Vec<i64> = frame
        .column("workclass")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    // "?" is 0, the rest are sorted: Private, Self-emp-not-inc, State-gov
    assert_eq!(codes, vec![3, 2, 1, 1, 0, 1]);
}

#[test]
fn test_transform_does_not_mutate_input() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::default();
    let _ = encoder.fit_transform(&df).unwrap();
    assert!(df.equals(&create_raw_frame()));
}

#[test]
fn test_all_selection_resolved_at_fit() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::default();
    encoder.fit(&df).unwrap();

    assert_eq!(encoder.selection(), &ColumnSelection::All);
    assert_eq!(encoder.encoded_columns(), vec!["sex", "workclass"]);
}

#[test]
fn test_reencoding_output_is_rejected() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&df).unwrap();

    let err = encoder.transform(&encoded.into_inner()).unwrap_err();
    assert!(
        matches!(err, PipelineError::AlreadyEncoded { .. }),
        "re-encoding should be reported as a stale-pipeline error, got {err:?}"
    );
}

#[test]
fn test_transform_before_fit() {
    let encoder = CategoricalEncoder::default();
    let err = encoder.transform(&create_raw_frame()).unwrap_err();
    assert!(matches!(err, PipelineError::NotFitted { stage: "encoder" }));
    assert!(err.is_not_fitted());
}

#[test]
fn test_unknown_category_rejected_by_default() {
    let mut encoder = CategoricalEncoder::default();
    encoder.fit(&create_raw_frame()).unwrap();

    let new = df! {
        "age" => [30i64],
        "workclass" => ["Never-worked"],
        "sex" => ["Male"],
    }
    .unwrap();
    let err = encoder.transform(&new).unwrap_err();
    match err {
        PipelineError::UnknownCategory { column, value } => {
            assert_eq!(column, "workclass");
            assert_eq!(value, "Never-worked");
        }
        other => panic!("Expected UnknownCategory, got {other:?}"),
    }
}

#[test]
fn test_unknown_category_as_missing() {
    let mut encoder = CategoricalEncoder::default()
        .with_unknown_policy(UnknownCategoryPolicy::AsMissing);
    encoder.fit(&create_raw_frame()).unwrap();

    let new = df! {
        "age" => [30i64],
        "workclass" => ["Never-worked"],
        "sex" => ["Male"],
    }
    .unwrap();
    let encoded = encoder.transform(&new).unwrap();
    let code = encoded
        .as_frame()
        .column("workclass")
        .unwrap()
        .i64()
        .unwrap()
        .get(0);
    assert_eq!(code, Some(MISSING_CODE));
}

#[test]
fn test_selected_column_missing_at_fit() {
    let mut encoder = CategoricalEncoder::new(ColumnSelection::only(["occupation"]));
    let err = encoder.fit(&create_raw_frame()).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn(c) if c == "occupation"));
    assert!(!encoder.is_fitted());
}

#[test]
fn test_fitted_column_missing_at_transform() {
    let mut encoder = CategoricalEncoder::default();
    encoder.fit(&create_raw_frame()).unwrap();

    let new = df! { "age" => [30i64], "sex" => ["Male"] }.unwrap();
    let err = encoder.transform(&new).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn(c) if c == "workclass"));
}

#[test]
fn test_inverse() {
    let mut encoder = CategoricalEncoder::default();
    encoder.fit(&create_raw_frame()).unwrap();

    assert_eq!(encoder.inverse("workclass", 1).unwrap(), "Private");
    assert_eq!(encoder.inverse("workclass", 0).unwrap(), "?");
    assert_eq!(encoder.inverse("sex", 1).unwrap(), "Female");
    assert!(encoder.inverse("workclass", 9).is_err());
    assert!(matches!(
        encoder.inverse("race", 1),
        Err(PipelineError::MissingColumn(_))
    ));
}
