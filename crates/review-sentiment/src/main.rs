//! CLI entry point for the review sentiment report.

use anyhow::{Context, Result};
use clap::Parser;
use review_sentiment::{ReportConfig, ReviewError, ReviewPipeline, RunReport};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const SUCCESS_MESSAGE: &str = "All outputs created successfully.";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Product review sentiment report",
    long_about = "Scores marketplace review exports and writes per-product sentiment \
                  summaries, ranking tables, bar charts and word clouds.\n\n\
                  EXAMPLES:\n  \
                  # Default Amazon + Flipkart datasets\n  \
                  review-sentiment\n\n  \
                  # Custom configuration, tables only\n  \
                  review-sentiment --config report.json --no-images\n\n  \
                  # Machine-readable run report\n  \
                  review-sentiment --json | jq .marketplaces"
)]
struct Args {
    /// JSON configuration file
    ///
    /// If not specified, the built-in Amazon and Flipkart settings are used
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for processed datasets and product summaries
    #[arg(long)]
    processed_dir: Option<PathBuf>,

    /// Directory for ranking tables, charts, word clouds and the run report
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the bar chart and word clouds
    #[arg(long)]
    no_images: bool,

    /// JSON lexicon (`{"word": polarity}`) merged over the built-in one
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the JSON run report to stdout instead of the human-readable summary
    ///
    /// Disables all progress logs.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<ReviewError>()
                .map(ReviewError::error_code)
                .unwrap_or("ERROR");
            error!("Run failed: {:#}", e);
            eprintln!("[{}] {:#}", code, e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let pipeline = build_pipeline(args, config)?;
    let report = pipeline.run()?;

    write_outcome(
        &report,
        args.json,
        args.quiet,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
}

/// Write the run result and the success message.
///
/// In JSON mode stdout carries only the report, so the success message goes
/// to `err`.
fn write_outcome(
    report: &RunReport,
    json: bool,
    quiet: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        writeln!(err, "{SUCCESS_MESSAGE}")?;
        return Ok(());
    }

    if !quiet {
        write_human_readable_summary(report, out)?;
    }
    writeln!(out, "{SUCCESS_MESSAGE}")?;
    Ok(())
}

/// Load the configuration file (or defaults) and apply CLI overrides.
fn build_config(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => ReportConfig::default(),
    };

    if let Some(dir) = &args.processed_dir {
        config.processed_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if args.no_images {
        config.render_images = false;
    }
    if let Some(path) = &args.lexicon {
        config.lexicon_path = Some(path.clone());
    }

    config.validate().map_err(ReviewError::from)?;
    Ok(config)
}

fn build_pipeline(args: &Args, config: ReportConfig) -> Result<ReviewPipeline> {
    let mut builder = ReviewPipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Write a per-marketplace summary of the run.
fn write_human_readable_summary(report: &RunReport, out: &mut dyn Write) -> std::io::Result<()> {
    let rule = "=".repeat(80);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "REVIEW REPORT COMPLETE")?;
    writeln!(out, "{rule}")?;

    for marketplace in &report.marketplaces {
        let counts = &marketplace.sentiment_distribution;
        writeln!(out)?;
        writeln!(out, "{}", marketplace.name.to_uppercase())?;
        writeln!(out, "  Input:    {}", marketplace.input_file)?;
        writeln!(
            out,
            "  Rows:     {} loaded, {} analysed",
            marketplace.rows_loaded, marketplace.rows_sampled
        )?;
        writeln!(
            out,
            "  Columns:  text='{}', product='{}'",
            marketplace.columns.text, marketplace.columns.product
        )?;
        writeln!(
            out,
            "  Labels:   {} positive, {} neutral, {} negative",
            counts.positive, counts.neutral, counts.negative
        )?;
        writeln!(out, "  Products: {}", marketplace.product_count)?;
        if marketplace.reviews_without_product > 0 {
            writeln!(
                out,
                "  ! {} reviews had no product identifier",
                marketplace.reviews_without_product
            )?;
        }
        writeln!(out, "  Files:    {}", marketplace.files_written.len())?;
    }

    writeln!(out)?;
    writeln!(out, "Duration: {}ms", report.duration_ms)?;
    writeln!(out, "Use --json for machine-readable output")?;
    writeln!(out, "{rule}")
}
