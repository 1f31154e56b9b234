//! Quakelens: Earthquake Catalog Analysis CLI
//!
//! Loads a catalog, runs every analysis stage in order, renders result
//! tables, and writes the assembled JSON report.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use quakelens::cli::Cli;
use quakelens::pipeline::{
    bin_attribute, build_correlation_matrix, classify_against_target, dataset_stats, depth_bins,
    load_dataset, magnitude_bins, rank_feature_importance, resolve_attributes, scaling_summary,
    summarize_attributes, FeatureGroups, ForestConfig, ScalingPlan,
};
use quakelens::report::{
    assemble, display_bins, display_importance, display_scaling, display_significance,
    display_strong_correlations, display_summary_statistics, export_report, AnalysisConfig,
    ReportSections,
};
use quakelens::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config, print_info,
    print_step_header, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_path = cli.output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        &cli.target,
        &output_path,
        cli.correlation_threshold,
        cli.seed,
    );

    let groups = match &cli.groups {
        Some(path) => FeatureGroups::from_json_file(path)?,
        None => FeatureGroups::earthquake_defaults(),
    };

    let config = AnalysisConfig {
        target: cli.target.clone(),
        attributes: if cli.attributes.is_empty() {
            None
        } else {
            Some(cli.attributes.clone())
        },
        strong_threshold: cli.correlation_threshold,
        forest: ForestConfig {
            trees: cli.trees,
            seed: cli.seed,
            ..Default::default()
        },
        groups,
        scaling: ScalingPlan::default(),
        input_file: cli.input.display().to_string(),
    };

    let run_start = Instant::now();

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let spinner = create_spinner("Loading catalog...");
    let df = load_dataset(&cli.input, cli.infer_schema_length)?;
    let (rows, cols, memory_mb) = dataset_stats(&df);
    finish_with_success(&spinner, "Dataset loaded");
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let attributes = resolve_attributes(&df, config.attributes.as_deref())?;
    if !attributes.iter().any(|a| a == &config.target) {
        anyhow::bail!(
            "Target attribute '{}' not found among numeric columns: {:?}",
            config.target,
            attributes
        );
    }
    print_info(&format!("Analyzing {} attributes", attributes.len()));

    // Step 2: Descriptive statistics
    print_step_header(2, "Descriptive Statistics");
    let summary_statistics = summarize_attributes(&df, &attributes)?;
    display_summary_statistics(&summary_statistics);

    // Step 3: Class binning
    print_step_header(3, "Class Binning");
    let magnitude_summary = if df.column("magnitude").is_ok() {
        bin_attribute(&df, "magnitude", &magnitude_bins())?
    } else {
        Vec::new()
    };
    let depth_summary = if df.column("depth").is_ok() {
        bin_attribute(&df, "depth", &depth_bins())?
    } else {
        Vec::new()
    };
    if magnitude_summary.is_empty() && depth_summary.is_empty() {
        print_info("No magnitude or depth columns to bin");
    }
    display_bins("MAGNITUDE CLASSES", &magnitude_summary);
    display_bins("DEPTH CLASSES", &depth_summary);

    // Step 4: Scaling summary
    print_step_header(4, "Scaling Summary");
    let scaling = scaling_summary(&df, &config.scaling)?;
    display_scaling(&scaling);

    // Step 5: Correlation analysis
    print_step_header(5, "Correlation Analysis");
    let spinner = create_spinner("Computing pairwise correlations...");
    let matrix = build_correlation_matrix(&df, &attributes)?;
    finish_with_success(&spinner, "Correlation matrix complete");
    let strong = matrix.strong_correlations(config.strong_threshold);
    display_strong_correlations(&strong, config.strong_threshold);

    // Step 6: Significance analysis
    print_step_header(6, "Correlation Significance");
    let significance = classify_against_target(&df, &attributes, &config.target)?;
    display_significance(&significance, &config.target);

    // Step 7: Feature importance
    print_step_header(7, "Feature Importance");
    let spinner = create_spinner("Fitting importance forest...");
    let importance = rank_feature_importance(
        &df,
        &attributes,
        &config.target,
        &config.groups,
        &config.forest,
    )?;
    finish_with_success(
        &spinner,
        &format!("Forest fitted on {} complete rows", importance.complete_rows),
    );
    display_importance(&importance.scores, &importance.groups);

    // Step 8: Assemble and export report
    print_step_header(8, "Export Report");
    let report = assemble(
        &config,
        ReportSections {
            summary_statistics,
            magnitude_bins: magnitude_summary,
            depth_bins: depth_summary,
            scaling,
            matrix,
            significance,
            importance,
        },
    );
    export_report(&report, &output_path)?;
    print_success(&format!("Report written to {}", output_path.display()));

    println!(
        "\n    {} Total time: {:.2}s",
        style("✧").cyan(),
        run_start.elapsed().as_secs_f64()
    );
    print_completion();

    Ok(())
}
