//! Terminal styling utilities

use console::style;
use std::path::Path;

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("◉ quakelens").cyan().bold(),
        style("earthquake catalog attribute analysis").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, target: &str, output: &Path, threshold: f64, seed: u64) {
    println!("    {} Input:     {}", style("✧").cyan(), input.display());
    println!("    {} Target:    {}", style("✧").cyan(), target);
    println!("    {} Output:    {}", style("✧").cyan(), output.display());
    println!(
        "    {} Strong |r| threshold: {}",
        style("✧").cyan(),
        style(format!("{:.2}", threshold)).yellow()
    );
    println!(
        "    {} Forest seed: {}",
        style("✧").cyan(),
        style(seed).yellow()
    );
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
    println!("    {} {}", style("ℹ").cyan(), message);
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        style("»").cyan(),
        style("Quakelens analysis complete!").green().bold()
    );
    println!();
}
