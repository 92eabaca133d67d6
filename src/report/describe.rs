//! Dataset summaries: numeric statistics and categorical crosstabs

use std::collections::{BTreeMap, BTreeSet};

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use polars::prelude::*;

use crate::dataset::normalize_label;
use crate::pipeline::PipelineError;

/// Count, mean, standard deviation and quartiles of one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Quantile of sorted values by linear interpolation between neighbours
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Summaries of every numeric column of a frame, in column order.
/// Nulls are skipped.
pub fn describe_numeric(frame: &DataFrame) -> Result<Vec<NumericSummary>, PipelineError> {
    let mut summaries = Vec::new();

    for column in frame.get_columns() {
        if !column.dtype().is_primitive_numeric() {
            continue;
        }
        let cast = column.cast(&DataType::Float64)?;
        let mut values: Vec<f64> = cast.f64()?.into_iter().flatten().collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        summaries.push(NumericSummary {
            column: column.name().to_string(),
            count,
            mean,
            std,
            min: values.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
        });
    }

    Ok(summaries)
}

pub fn render_numeric_summary(summaries: &[NumericSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("").add_attribute(Attribute::Bold)];
    header.extend(
        summaries
            .iter()
            .map(|s| Cell::new(&s.column).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    let stats: [(&str, fn(&NumericSummary) -> f64); 8] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];
    for (label, stat) in stats {
        let mut row = vec![Cell::new(label).fg(Color::Cyan)];
        row.extend(summaries.iter().map(|s| {
            Cell::new(format!("{:.2}", stat(s))).set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }

    table
}

/// Counts of each value of one column split by target class
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    pub column: String,
    /// Target classes, sorted
    pub classes: Vec<String>,
    /// Column value to counts aligned with `classes`, sorted by value
    pub rows: BTreeMap<String, Vec<usize>>,
}

impl Crosstab {
    pub fn render(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut header = vec![Cell::new(&self.column).add_attribute(Attribute::Bold)];
        header.extend(
            self.classes
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
        );
        header.push(Cell::new("Total").add_attribute(Attribute::Bold));
        table.set_header(header);

        for (value, counts) in &self.rows {
            let mut row = vec![Cell::new(value).fg(Color::Cyan)];
            row.extend(
                counts
                    .iter()
                    .map(|n| Cell::new(n).set_alignment(CellAlignment::Right)),
            );
            row.push(
                Cell::new(counts.iter().sum::<usize>())
                    .set_alignment(CellAlignment::Right)
                    .add_attribute(Attribute::Bold),
            );
            table.add_row(row);
        }

        table
    }
}

/// Cross-tabulate a column of `frame` against target labels
pub fn crosstab<S: AsRef<str>>(
    frame: &DataFrame,
    column: &str,
    target: &[S],
) -> Result<Crosstab, PipelineError> {
    let col = frame
        .column(column)
        .map_err(|_| PipelineError::MissingColumn(column.to_string()))?;
    if col.len() != target.len() {
        return Err(PipelineError::LengthMismatch {
            rows: col.len(),
            labels: target.len(),
        });
    }

    let labels: Vec<&str> = target.iter().map(|t| normalize_label(t.as_ref())).collect();
    let classes: Vec<String> = labels
        .iter()
        .map(|l| l.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let cast = col.cast(&DataType::String)?;
    let mut rows: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (value, label) in cast.str()?.into_iter().zip(&labels) {
        let key = value.unwrap_or("null").to_string();
        let counts = rows.entry(key).or_insert_with(|| vec![0; classes.len()]);
        if let Ok(idx) = classes.binary_search_by(|c| c.as_str().cmp(label)) {
            counts[idx] += 1;
        }
    }

    Ok(Crosstab {
        column: column.to_string(),
        classes,
        rows,
    })
}
