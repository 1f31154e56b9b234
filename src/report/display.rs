//! Terminal rendering of report sections

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{
    AttributeImportance, AttributeSummary, BinSummary, GroupImportance, ScalingSummary,
    SignificanceReport, StrongCorrelation,
};

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn section_header(title: &str) {
    println!();
    println!("    {}", style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Render per-attribute descriptive statistics.
pub fn display_summary_statistics(summaries: &[AttributeSummary]) {
    section_header("SUMMARY STATISTICS");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Attribute").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Missing").add_attribute(Attribute::Bold),
        Cell::new("Mean").add_attribute(Attribute::Bold),
        Cell::new("Std").add_attribute(Attribute::Bold),
        Cell::new("Min").add_attribute(Attribute::Bold),
        Cell::new("Median").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
    ]);

    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.attribute),
            Cell::new(s.count),
            Cell::new(s.missing).fg(if s.missing > 0 {
                Color::Yellow
            } else {
                Color::White
            }),
            Cell::new(format!("{:.3}", s.mean)),
            Cell::new(format!("{:.3}", s.std_dev)),
            Cell::new(format!("{:.3}", s.min)),
            Cell::new(format!("{:.3}", s.median)),
            Cell::new(format!("{:.3}", s.max)),
        ]);
    }
    print_indented(&table);
}

/// Render class-bin occupancy for one attribute.
pub fn display_bins(title: &str, bins: &[BinSummary]) {
    if bins.is_empty() {
        return;
    }
    section_header(title);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Class").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("Share").add_attribute(Attribute::Bold),
    ]);
    for bin in bins {
        table.add_row(vec![
            Cell::new(&bin.label),
            Cell::new(bin.count),
            Cell::new(format!("{:.1}%", bin.share * 100.0)),
        ]);
    }
    print_indented(&table);
}

/// Render before/after scaling statistics.
pub fn display_scaling(summaries: &[ScalingSummary]) {
    if summaries.is_empty() {
        return;
    }
    section_header("SCALING SUMMARY");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Attribute").add_attribute(Attribute::Bold),
        Cell::new("Method").add_attribute(Attribute::Bold),
        Cell::new("Mean").add_attribute(Attribute::Bold),
        Cell::new("Std").add_attribute(Attribute::Bold),
        Cell::new("Scaled Mean").add_attribute(Attribute::Bold),
        Cell::new("Scaled Std").add_attribute(Attribute::Bold),
    ]);
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.attribute),
            Cell::new(s.method.to_string()),
            Cell::new(format!("{:.3}", s.original.mean)),
            Cell::new(format!("{:.3}", s.original.std_dev)),
            Cell::new(format!("{:.3}", s.scaled.mean)),
            Cell::new(format!("{:.3}", s.scaled.std_dev)),
        ]);
    }
    print_indented(&table);
}

/// Render the strong-correlation list.
pub fn display_strong_correlations(pairs: &[StrongCorrelation], threshold: f64) {
    section_header("STRONG CORRELATIONS");

    if pairs.is_empty() {
        println!(
            "    {} No pairs at |r| >= {:.2}",
            style("✧").cyan(),
            threshold
        );
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Attribute A").add_attribute(Attribute::Bold),
        Cell::new("Attribute B").add_attribute(Attribute::Bold),
        Cell::new("r").add_attribute(Attribute::Bold),
    ]);
    for pair in pairs {
        let color = if pair.coefficient.abs() >= 0.8 {
            Color::Red
        } else {
            Color::Yellow
        };
        table.add_row(vec![
            Cell::new(&pair.attribute_a),
            Cell::new(&pair.attribute_b),
            Cell::new(format!("{:+.4}", pair.coefficient)).fg(color),
        ]);
    }
    print_indented(&table);
}

/// Render significance tiers and exclusions.
pub fn display_significance(report: &SignificanceReport, target: &str) {
    section_header(&format!(
        "SIGNIFICANCE vs {}",
        target.to_uppercase()
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Attribute").add_attribute(Attribute::Bold),
        Cell::new("r").add_attribute(Attribute::Bold),
        Cell::new("p-value").add_attribute(Attribute::Bold),
        Cell::new("n").add_attribute(Attribute::Bold),
        Cell::new("Tier").add_attribute(Attribute::Bold),
    ]);

    for (name, entries) in report.tiers() {
        let color = match name {
            "highly_significant" => Color::Green,
            "significant" => Color::Cyan,
            _ => Color::White,
        };
        for entry in entries {
            table.add_row(vec![
                Cell::new(&entry.attribute),
                Cell::new(format!("{:+.4}", entry.coefficient)),
                Cell::new(format!("{:.4}", entry.p_value)),
                Cell::new(entry.observations),
                Cell::new(name).fg(color),
            ]);
        }
    }
    print_indented(&table);

    if !report.excluded.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Excluded").yellow(),
            style(format!("({})", report.excluded.len())).dim()
        );
        for excluded in &report.excluded {
            println!(
                "        {} {}: {}",
                style("•").dim(),
                excluded.attribute,
                style(&excluded.reason).dim()
            );
        }
    }
}

/// Render per-attribute and per-group importance.
pub fn display_importance(scores: &[AttributeImportance], groups: &[GroupImportance]) {
    section_header("FEATURE IMPORTANCE");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Attribute").add_attribute(Attribute::Bold),
        Cell::new("Importance").add_attribute(Attribute::Bold),
    ]);
    for score in scores {
        table.add_row(vec![
            Cell::new(&score.attribute),
            Cell::new(format!("{:.1}%", score.score * 100.0)).fg(if score.score >= 0.2 {
                Color::Green
            } else {
                Color::White
            }),
        ]);
    }
    print_indented(&table);

    if !groups.is_empty() {
        section_header("GROUP IMPORTANCE");
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Group").add_attribute(Attribute::Bold),
            Cell::new("Importance").add_attribute(Attribute::Bold),
        ]);
        for group in groups {
            table.add_row(vec![
                Cell::new(&group.group),
                Cell::new(format!("{:.1}%", group.score * 100.0)),
            ]);
        }
        print_indented(&table);
    }
}
