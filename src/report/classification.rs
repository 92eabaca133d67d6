//! Classification metrics

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::PipelineError;

/// Precision, recall, F1 and support of one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision, recall and F1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub total: usize,
}

/// `num / den`, or 0 when the denominator is 0
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn check_labels(y_true: &[usize], y_pred: &[usize]) -> Result<(), PipelineError> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::LengthMismatch {
            rows: y_pred.len(),
            labels: y_true.len(),
        });
    }
    if y_true.is_empty() {
        return Err(PipelineError::EmptyData(
            "no labels to evaluate".to_string(),
        ));
    }
    Ok(())
}

/// Fraction of predictions equal to the true label
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> Result<f64, PipelineError> {
    check_labels(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(ratio(correct, y_true.len()))
}

/// Accuracy of always predicting the most frequent label
pub fn majority_baseline(y: &[usize]) -> f64 {
    let n_classes = y.iter().max().map_or(0, |&m| m + 1);
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }
    ratio(counts.into_iter().max().unwrap_or(0), y.len())
}

impl ClassificationReport {
    pub fn compute(
        y_true: &[usize],
        y_pred: &[usize],
        class_names: &[String],
    ) -> Result<Self, PipelineError> {
        check_labels(y_true, y_pred)?;
        let n_classes = class_names.len();
        if let Some(&label) = y_true.iter().chain(y_pred).find(|&&l| l >= n_classes) {
            return Err(PipelineError::InvalidLabel(label));
        }

        let mut true_pos = vec![0usize; n_classes];
        let mut predicted = vec![0usize; n_classes];
        let mut support = vec![0usize; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            support[t] += 1;
            predicted[p] += 1;
            if t == p {
                true_pos[t] += 1;
            }
        }

        let classes: Vec<ClassMetrics> = class_names
            .iter()
            .enumerate()
            .map(|(k, name)| {
                let precision = ratio(true_pos[k], predicted[k]);
                let recall = ratio(true_pos[k], support[k]);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    class: name.clone(),
                    precision,
                    recall,
                    f1,
                    support: support[k],
                }
            })
            .collect();

        let total = y_true.len();
        let k = n_classes.max(1) as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
        };
        let weight = |c: &ClassMetrics| c.support as f64 / total as f64;
        let weighted_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision * weight(c)).sum(),
            recall: classes.iter().map(|c| c.recall * weight(c)).sum(),
            f1: classes.iter().map(|c| c.f1 * weight(c)).sum(),
        };

        Ok(Self {
            accuracy: ratio(true_pos.iter().sum(), total),
            classes,
            macro_avg,
            weighted_avg,
            total,
        })
    }

    /// Render the report as a table
    pub fn render(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new("Precision").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("F1").add_attribute(Attribute::Bold),
            Cell::new("Support").add_attribute(Attribute::Bold),
        ]);

        for metrics in &self.classes {
            table.add_row(vec![
                Cell::new(&metrics.class).fg(Color::Cyan),
                metric_cell(metrics.precision),
                metric_cell(metrics.recall),
                metric_cell(metrics.f1),
                Cell::new(metrics.support).set_alignment(CellAlignment::Right),
            ]);
        }

        table.add_row(vec![
            Cell::new("accuracy").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            metric_cell(self.accuracy).fg(Color::Green),
            Cell::new(self.total).set_alignment(CellAlignment::Right),
        ]);
        for (label, avg) in [("macro avg", self.macro_avg), ("weighted avg", self.weighted_avg)] {
            table.add_row(vec![
                Cell::new(label),
                metric_cell(avg.precision),
                metric_cell(avg.recall),
                metric_cell(avg.f1),
                Cell::new(self.total).set_alignment(CellAlignment::Right),
            ]);
        }

        table
    }

    pub fn display(&self, title: &str) {
        println!();
        println!("    {} {}", style("📊").cyan(), style(title).white().bold());
        println!("    {}", style("─".repeat(50)).dim());
        for line in self.render().to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn metric_cell(value: f64) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}
