//! Dataset module - loading, metadata and acquisition of the census data

pub mod download;
pub mod error;
pub mod loader;
pub mod meta;
pub mod record;

pub use download::*;
pub use error::DataError;
pub use loader::*;
pub use meta::*;
pub use record::*;

/// Column order of the raw census files, target last
pub const COLUMN_NAMES: [&str; 15] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "income",
];

/// Columns parsed as integers; every other feature column is categorical
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "age",
    "fnlwgt",
    "education-num",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
];

pub const TARGET_COLUMN: &str = "income";

/// Value substituted for `fnlwgt` during interactive prediction (training mean)
pub const DEFAULT_FNLWGT: i64 = 189_778;

pub const TRAIN_FILE: &str = "adult.data";
pub const TEST_FILE: &str = "adult.test";
pub const NAMES_FILE: &str = "adult.names";
pub const META_FILE: &str = "meta.json";
pub const MODEL_FILE: &str = "classifier.json";

/// Whether a column holds integer values in the raw files
pub fn is_numeric_column(name: &str) -> bool {
    NUMERIC_COLUMNS.contains(&name)
}
