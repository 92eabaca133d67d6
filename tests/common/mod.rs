//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

pub const WORKCLASS: [&str; 4] = ["Private", "Self-emp-not-inc", "State-gov", "Federal-gov"];
pub const EDUCATION: [&str; 4] = ["Bachelors", "HS-grad", "Masters", "Some-college"];
pub const MARITAL: [&str; 3] = ["Married-civ-spouse", "Never-married", "Divorced"];
pub const OCCUPATION: [&str; 4] = ["Exec-managerial", "Prof-specialty", "Craft-repair", "Sales"];
pub const RELATIONSHIP: [&str; 4] = ["Husband", "Wife", "Not-in-family", "Own-child"];
pub const RACE: [&str; 3] = ["White", "Black", "Asian-Pac-Islander"];
pub const SEX: [&str; 2] = ["Male", "Female"];
pub const COUNTRY: [&str; 3] = ["United-States", "Mexico", "India"];

/// Leading training rows that cycle deterministically through every value
/// (and the `?` marker), so the test split never holds an unseen category
const CYCLE_ROWS: usize = 10;

/// Header-like first line of the real `adult.test`
pub const TEST_HEADER: &str = "|1x3 Cross validator";

fn pick<'a>(rng: &mut StdRng, values: &[&'a str], row: usize, with_missing: bool) -> &'a str {
    let slots = values.len() + usize::from(with_missing);
    let idx = if row < CYCLE_ROWS {
        row % slots
    } else if with_missing && rng.gen_bool(0.05) {
        values.len()
    } else {
        rng.gen_range(0..values.len())
    };
    values.get(idx).copied().unwrap_or("?")
}

fn education_num(education: &str) -> i64 {
    match education {
        "Bachelors" => 13,
        "Masters" => 14,
        "Some-college" => 10,
        _ => 9,
    }
}

/// One census-format line. Income depends on age, education, marital status
/// and hours worked, with noise; roughly a quarter of rows earn `>50K`.
pub fn census_line(rng: &mut StdRng, row: usize, test_split: bool) -> String {
    let age: i64 = rng.gen_range(17..76);
    let workclass = pick(rng, &WORKCLASS, row, true);
    let fnlwgt: i64 = rng.gen_range(20_000..400_000);
    let education = pick(rng, &EDUCATION, row, false);
    let marital = pick(rng, &MARITAL, row, false);
    let occupation = pick(rng, &OCCUPATION, row, true);
    let relationship = pick(rng, &RELATIONSHIP, row, false);
    let race = pick(rng, &RACE, row, false);
    let sex = pick(rng, &SEX, row, false);
    let capital_gain: i64 = if rng.gen_bool(0.1) {
        rng.gen_range(5_000..20_000)
    } else {
        0
    };
    let capital_loss: i64 = if rng.gen_bool(0.05) {
        rng.gen_range(1_000..2_500)
    } else {
        0
    };
    let hours: i64 = rng.gen_range(20..61);
    let country = pick(rng, &COUNTRY, row, true);

    let degree = matches!(education, "Bachelors" | "Masters");
    let married = marital == "Married-civ-spouse";
    let score = 0.08 * (age - 38) as f64
        + if married { 1.5 } else { 0.0 }
        + if degree { 1.2 } else { 0.0 }
        + 0.05 * (hours - 40) as f64
        + if capital_gain > 0 { 1.0 } else { 0.0 }
        + (rng.gen::<f64>() - 0.5) * 2.0;
    let income = match (score > 3.0, test_split) {
        (true, false) => ">50K",
        (false, false) => "<=50K",
        (true, true) => ">50K.",
        (false, true) => "<=50K.",
    };

    format!(
        "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
        age,
        workclass,
        fnlwgt,
        education,
        education_num(education),
        marital,
        occupation,
        relationship,
        race,
        sex,
        capital_gain,
        capital_loss,
        hours,
        country,
        income
    )
}

/// Write `adult.data`, `adult.test` and `adult.names` into `dir`
pub fn write_census_files(dir: &Path, n_train: usize, n_test: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut train = String::new();
    for row in 0..n_train {
        train.push_str(&census_line(&mut rng, row, false));
        train.push('\n');
    }
    train.push('\n');

    let mut test = format!("{}\n", TEST_HEADER);
    for row in 0..n_test {
        test.push_str(&census_line(&mut rng, CYCLE_ROWS + row, true));
        test.push('\n');
    }

    fs::write(dir.join("adult.data"), train).unwrap();
    fs::write(dir.join("adult.test"), test).unwrap();
    fs::write(
        dir.join("adult.names"),
        "| Synthetic census data for tests\n| 48842 instances in the real release\n",
    )
    .unwrap();
}

/// Temporary data directory holding synthetic census files
pub fn census_dir(n_train: usize, n_test: usize, seed: u64) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_census_files(dir.path(), n_train, n_test, seed);
    dir
}

pub fn column_names() -> Vec<String> {
    census::dataset::COLUMN_NAMES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Small raw table with two categorical columns and one numeric column
pub fn create_raw_frame() -> DataFrame {
    df! {
        "age" => [39i64, 50, 38, 53, 28, 37],
        "workclass" => ["State-gov", "Self-emp-not-inc", "Private", "Private", "?", "Private"],
        "sex" => ["Male", "Male", "Male", "Female", "Female", "Female"],
    }
    .unwrap()
}

/// Workclass column with 5% missing entries; "Private" is the most common value
pub fn create_workclass_frame() -> DataFrame {
    let mut workclass = Vec::with_capacity(100);
    workclass.extend(std::iter::repeat("Private").take(60));
    workclass.extend(std::iter::repeat("Self-emp-not-inc").take(20));
    workclass.extend(std::iter::repeat("State-gov").take(15));
    workclass.extend(std::iter::repeat("?").take(5));
    let age: Vec<i64> = (0..100).map(|i| 20 + (i % 40)).collect();

    df! {
        "age" => age,
        "workclass" => workclass,
    }
    .unwrap()
}
