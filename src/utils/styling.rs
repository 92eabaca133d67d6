//! Terminal styling utilities

use std::path::Path;

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");

const CARD_WIDTH: usize = 56;

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("census").cyan().bold(),
        style("Income classification on the UCI adult dataset").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the training configuration card
pub fn print_config(
    data_dir: &Path,
    model: &Path,
    c: f64,
    max_iter: usize,
    impute: &str,
    unknown: &str,
) {
    let line = "─".repeat(CARD_WIDTH - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(CARD_WIDTH - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Data:   {:<39}│", FOLDER, truncate_path(data_dir, 38));
    println!("    │  {} Model:  {:<39}│", SAVE, truncate_path(model, 38));
    println!("    ├{}┤", line);
    println!(
        "    │  {} C: {:<13} Max iterations: {:<12}│",
        CHART,
        style(c).yellow(),
        style(max_iter).yellow()
    );
    println!(
        "    │  {} Impute:   {:<37}│",
        GEAR,
        truncate_string(impute, 36)
    );
    println!(
        "    │  {} Unknown:  {:<37}│",
        GEAR,
        truncate_string(unknown, 36)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the final completion message
pub fn print_completion(message: &str) {
    println!();
    println!("    {} {}", ROCKET, style(message).green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    match detail {
        Some(info) => println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        ),
        None => println!("      Found {} {}", style(count).yellow().bold(), description),
    }
}

/// Print a comfy-table indented to line up with the other output
pub fn print_table(table: &comfy_table::Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
