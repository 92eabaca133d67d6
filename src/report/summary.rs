//! Training summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of a training run
#[derive(Debug, Default)]
pub struct TrainingSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: usize,
    pub encoded_columns: usize,
    /// Imputed column and the category its missing entries became
    pub imputed: Vec<(String, String)>,
    pub iterations: usize,
    pub converged: bool,
    pub baseline: f64,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

impl TrainingSummary {
    pub fn new(train_rows: usize, test_rows: usize, features: usize) -> Self {
        Self {
            train_rows,
            test_rows,
            features,
            ..Default::default()
        }
    }

    /// Accuracy gained over always predicting the majority class
    pub fn lift(&self) -> f64 {
        self.test_accuracy - self.baseline
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Training rows"), Cell::new(self.train_rows)]);
        table.add_row(vec![Cell::new("🧪 Test rows"), Cell::new(self.test_rows)]);
        table.add_row(vec![
            Cell::new("🔢 Features"),
            Cell::new(format!(
                "{} ({} encoded)",
                self.features, self.encoded_columns
            )),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Newton iterations"),
            Cell::new(self.iterations).fg(if self.converged {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("⚖️  Majority baseline"),
            Cell::new(format!("{:.2}%", self.baseline * 100.0)),
        ]);
        table.add_row(vec![
            Cell::new("🏋️  Train accuracy"),
            Cell::new(format!("{:.2}%", self.train_accuracy * 100.0)),
        ]);

        let color = if self.lift() > 0.05 {
            Color::Green
        } else if self.lift() > 0.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("✅ Test accuracy"),
            Cell::new(format!("{:.2}%", self.test_accuracy * 100.0))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.imputed.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("IMPUTED COLUMNS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (column, value) in &self.imputed {
                println!(
                    "        {} {} {} {}",
                    style("•").dim(),
                    column,
                    style("→").dim(),
                    style(value).yellow()
                );
            }
        }

        if !self.converged {
            println!();
            println!(
                "    {} {}",
                style("⚠️").yellow(),
                style("Solver stopped at the iteration limit before converging").yellow()
            );
        }
    }
}
