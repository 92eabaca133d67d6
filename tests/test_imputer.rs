//! Tests for the most-frequent imputer

mod common;

use census::pipeline::*;
use common::{create_raw_frame, create_workclass_frame};
use polars::prelude::*;

fn codes(frame: &DataFrame, column: &str) -> Vec<i64> {
    frame
        .column(column)
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

#[test]
fn test_workclass_missing_imputed_with_private() {
    let df = create_workclass_frame();
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&df).unwrap();

    let before = codes(encoded.as_frame(), "workclass");
    assert_eq!(before.iter().filter(|&&c| c == SENTINEL).count(), 5);

    let mut imputer = CategoricalImputer::new(ColumnSelection::only(["workclass"]));
    let imputed = imputer.fit_transform(&encoded).unwrap();

    let private = encoder.table("workclass").unwrap().encode("Private").unwrap();
    assert_eq!(imputer.replacement("workclass"), Some(private));

    let after = codes(imputed.as_frame(), "workclass");
    assert!(after.iter().all(|&c| c != SENTINEL), "no sentinel may survive");
    assert_eq!(after.iter().filter(|&&c| c == private).count(), 65);
    assert_eq!(after[95..], [private; 5]);
}

#[test]
fn test_untouched_columns_pass_through() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&df).unwrap();

    let mut imputer = CategoricalImputer::new(ColumnSelection::only(["workclass"]));
    let imputed = imputer.fit_transform(&encoded).unwrap();

    assert_eq!(
        codes(imputed.as_frame(), "sex"),
        codes(encoded.as_frame(), "sex")
    );
    assert_eq!(codes(imputed.as_frame(), "age"), vec![39, 50, 38, 53, 28, 37]);
}

#[test]
fn test_fit_uses_training_data_only() {
    let mut encoder = CategoricalEncoder::default();
    let train = encoder.fit_transform(&create_workclass_frame()).unwrap();
    let mut imputer = CategoricalImputer::new(ColumnSelection::only(["workclass"]));
    imputer.fit(&train).unwrap();

    // A later table dominated by another category does not change the replacement
    let later = df! {
        "age" => [30i64, 31, 32, 33],
        "workclass" => ["State-gov", "State-gov", "State-gov", "?"],
    }
    .unwrap();
    let imputed = imputer.transform(&encoder.transform(&later).unwrap()).unwrap();
    let private = encoder.table("workclass").unwrap().encode("Private").unwrap();
    assert_eq!(codes(imputed.as_frame(), "workclass")[3], private);
}

#[test]
fn test_all_sentinel_column() {
    let df = df! {
        "age" => [1i64, 2, 3],
        "workclass" => ["?", "?", "?"],
    }
    .unwrap();
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&df).unwrap();

    let mut imputer = CategoricalImputer::new(ColumnSelection::only(["workclass"]));
    let err = imputer.fit(&encoded).unwrap_err();
    assert!(matches!(err, PipelineError::NothingToImpute(c) if c == "workclass"));
    assert!(!imputer.is_fitted());
}

#[test]
fn test_unencoded_column_rejected() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::new(ColumnSelection::only(["sex"]));
    let encoded = encoder.fit_transform(&df).unwrap();

    let mut imputer = CategoricalImputer::new(ColumnSelection::only(["workclass"]));
    let err = imputer.fit(&encoded).unwrap_err();
    assert!(matches!(err, PipelineError::NotEncoded { .. }));
}

#[test]
fn test_all_selection_imputes_encoded_columns_only() {
    let df = create_raw_frame();
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&df).unwrap();

    let mut imputer = CategoricalImputer::default();
    imputer.fit(&encoded).unwrap();
    let replacements = imputer.replacements().unwrap();
    assert_eq!(
        replacements.keys().cloned().collect::<Vec<_>>(),
        vec!["sex".to_string(), "workclass".to_string()]
    );
    assert!(!replacements.contains_key("age"));
}

#[test]
fn test_raw_numeric_column_rejected() {
    let df = df! {
        "capital-gain" => [0i64, 0, 0, 5178],
        "workclass" => ["Private", "?", "Private", "State-gov"],
    }
    .unwrap();
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&df).unwrap();

    let mut imputer = CategoricalImputer::new(ColumnSelection::only(["capital-gain"]));
    let err = imputer.fit(&encoded).unwrap_err();
    assert!(matches!(err, PipelineError::NotEncoded { column, .. } if column == "capital-gain"));

    let mut imputer = CategoricalImputer::default();
    let imputed = imputer.fit_transform(&encoded).unwrap();
    let gains: Vec<i64> = imputed
        .as_frame()
        .column("capital-gain")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(gains, vec![0, 0, 0, 5178], "zero is a real amount, not a missing code");
}

#[test]
fn test_transform_before_fit() {
    let mut encoder = CategoricalEncoder::default();
    let encoded = encoder.fit_transform(&create_raw_frame()).unwrap();

    let imputer = CategoricalImputer::default();
    let err = imputer.transform(&encoded).unwrap_err();
    assert!(matches!(err, PipelineError::NotFitted { stage: "imputer" }));
}
