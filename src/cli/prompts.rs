//! Interactive prompts using dialoguer

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};

use crate::dataset::{
    parse_field, validate_choice, DatasetMeta, FeatureRecord, FieldValue, DEFAULT_FNLWGT,
};

/// Column filled with [`DEFAULT_FNLWGT`] instead of being asked for
const UNPROMPTED_COLUMN: &str = "fnlwgt";

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Ask for a categorical value until it is one of `domain`
pub fn prompt_category(column: &str, domain: &[String]) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(format!("enter {}", column))
        .validate_with(|input: &String| -> Result<(), String> {
            validate_choice(domain, input).map(|_| ())
        })
        .interact_text()
        .with_context(|| format!("Failed to read a value for '{}'", column))?;
    Ok(value.trim().to_string())
}

/// Ask for an integer value until it parses
pub fn prompt_number(column: &str) -> Result<i64> {
    let value: i64 = Input::new()
        .with_prompt(format!("enter {}", column))
        .interact_text()
        .with_context(|| format!("Failed to read a value for '{}'", column))?;
    Ok(value)
}

/// Build a complete record from preset `COLUMN=VALUE` pairs, prompting for
/// every other feature in metadata order.
///
/// Presets are validated up front; an unknown column or out-of-domain value
/// is an error rather than a reprompt.
pub fn prompt_record(meta: &DatasetMeta, preset: &[(String, String)]) -> Result<FeatureRecord> {
    let mut record = FeatureRecord::new();
    for (column, raw) in preset {
        let value = parse_field(meta, column, raw)
            .with_context(|| format!("Invalid --value {}={}", column, raw))?;
        record.set(column.clone(), value);
    }

    for column in meta.input_features() {
        if record.contains(column) {
            continue;
        }
        let value = if column == UNPROMPTED_COLUMN {
            FieldValue::Number(DEFAULT_FNLWGT)
        } else {
            match meta.domain(column) {
                Some(domain) => FieldValue::Text(prompt_category(column, domain)?),
                None => FieldValue::Number(prompt_number(column)?),
            }
        };
        record.set(column.clone(), value);
    }

    Ok(record)
}

/// True when every feature is either preset or never prompted for
pub fn is_fully_specified(meta: &DatasetMeta, preset: &[(String, String)]) -> bool {
    meta.input_features()
        .iter()
        .filter(|f| f.as_str() != UNPROMPTED_COLUMN)
        .all(|f| preset.iter().any(|(column, _)| column == f))
}
