//! CLI entry point for the data quality profiler.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use dq_profiler::{
    DataCleaner, DataSummary, FillStrategy, ProfileEnvelope, ProfilerConfig, QualityReport,
    ReportGenerator, SectionOutcome, load_dataset,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Data quality profiler: load a dataset, optionally remediate it, and
/// report on its quality.
#[derive(Parser, Debug)]
#[command(
    name = "dq-profiler",
    version,
    about = "Profile a tabular dataset and report data quality issues",
    after_help = "EXAMPLES:\n  \
                  # Profile a CSV file\n  \
                  dq-profiler -i data.csv\n\n  \
                  # Include the class balance of a target column\n  \
                  dq-profiler -i data.csv --target Survived\n\n  \
                  # Fill, rename and drop before profiling, then export\n  \
                  dq-profiler -i data.csv --fill Age=median --fill City=unknown \\\n    \
                  --rename Fare=TicketPrice --drop Cabin --export clean\n\n  \
                  # Machine-readable output\n  \
                  dq-profiler -i data.csv --json | jq '.report[\"Data Quality Score\"]'"
)]
struct Args {
    /// Path to the dataset (.csv or .json)
    #[arg(short, long)]
    input: String,

    /// Target column for the class imbalance report
    #[arg(short, long)]
    target: Option<String>,

    /// Output directory for exported files
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// JSON file with profiler thresholds
    ///
    /// Unspecified fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a suggested fill strategy for every column with missing values
    #[arg(long)]
    recommend: bool,

    /// Fill missing values before profiling (COLUMN=STRATEGY, repeatable)
    ///
    /// STRATEGY is one of mean, median, mode, unknown, drop or custom:<value>.
    #[arg(long, value_name = "COLUMN=STRATEGY", value_parser = parse_key_value)]
    fill: Vec<(String, String)>,

    /// Rename a column before profiling (OLD=NEW, repeatable)
    #[arg(long, value_name = "OLD=NEW", value_parser = parse_key_value)]
    rename: Vec<(String, String)>,

    /// Drop a column before profiling (repeatable)
    #[arg(long, value_name = "COLUMN")]
    drop: Vec<String>,

    /// Export the remediated dataset as <STEM>.csv and <STEM>.json
    #[arg(long, value_name = "STEM")]
    export: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Parse `KEY=VALUE`.
fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
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

fn main() -> Result<()> {
    // Load environment variables from .env file (RUST_LOG)
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = load_config(args.config.as_deref())?;

    info!("Loading dataset from: {}", args.input);
    let original = load_dataset(&args.input)
        .with_context(|| format!("Failed to load dataset '{}'", args.input))?;

    let (data, actions) = apply_remediation(&args, &original)?;

    let report = DataSummary::new(config).generate_report(&data, args.target.as_deref())?;
    let recommendations = if args.recommend {
        DataCleaner::recommend_null_filling(&data)?
    } else {
        Vec::new()
    };

    let envelope = ReportGenerator::build_envelope(
        &args.input,
        &original,
        &data,
        actions,
        recommendations,
        report,
    );

    let generator = ReportGenerator::new(PathBuf::from(&args.output));

    if let Some(ref stem) = args.export {
        let (csv_path, json_path) = generator.export_dataset(&data, stem)?;
        info!(
            "Exported dataset to {} and {}",
            csv_path.display(),
            json_path.display()
        );
    }

    if args.emit_report {
        let report_path =
            generator.write_report_to_file(&envelope, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    print_human_readable_summary(&envelope);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ProfilerConfig> {
    let Some(path) = path else {
        return Ok(ProfilerConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;
    let config: ProfilerConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config '{}'", path.display()))?;
    config.validate()?;

    debug!("Loaded config: {:?}", config);
    Ok(config)
}

/// Apply fills, then renames, then drops.
fn apply_remediation(args: &Args, df: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
    let mut actions = Vec::new();
    let mut data = df.clone();

    if !args.fill.is_empty() {
        let plan = args
            .fill
            .iter()
            .map(|(column, strategy)| Ok((column.clone(), strategy.parse::<FillStrategy>()?)))
            .collect::<Result<Vec<_>>>()?;
        let (filled, fill_actions) = DataCleaner::fill_missing_values(&data, &plan)?;
        data = filled;
        actions.extend(fill_actions);
    }

    for (old, new) in &args.rename {
        data = DataCleaner::rename_column(&data, old, new)?;
        actions.push(format!("Renamed '{}' to '{}'", old, new));
    }

    if !args.drop.is_empty() {
        data = DataCleaner::drop_columns(&data, &args.drop)?;
        actions.push(format!("Dropped columns: {}", args.drop.join(", ")));
    }

    if data.width() == 0 {
        return Err(anyhow!("No columns left to profile after remediation"));
    }

    Ok((data, actions))
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn section_status<T>(outcome: &SectionOutcome<T>, describe: impl Fn(&T) -> String) -> String {
    match outcome {
        SectionOutcome::Ready(value) => describe(value),
        SectionOutcome::Unavailable(err) => format!("unavailable ({})", err.message),
    }
}

/// Print a human-readable summary of the report.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(envelope: &ProfileEnvelope) {
    let report: &QualityReport = &envelope.report;

    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY REPORT");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input: {} ({} rows x {} columns)",
        envelope.input_file, envelope.original_shape.0, envelope.original_shape.1
    );
    if envelope.final_shape != envelope.original_shape {
        println!(
            "Profiled: {} rows x {} columns",
            envelope.final_shape.0, envelope.final_shape.1
        );
    }
    println!();

    if !envelope.remediation_actions.is_empty() {
        println!("Actions Taken:");
        for action in &envelope.remediation_actions {
            println!("  - {}", action);
        }
        println!();
    }

    if let SectionOutcome::Ready(score) = &report.quality_score {
        let breakdown = score.breakdown();
        println!("Quality Score: {:.2}", score.overall());
        println!("  Completeness: {:.1}", breakdown.completeness);
        println!("  Uniqueness:   {:.1}", breakdown.uniqueness);
        println!("  Validity:     {:.1}", breakdown.validity);
        println!("  Accuracy:     {:.1}", breakdown.accuracy);
        println!("  Consistency:  {:.1}", breakdown.consistency);
        if let Some(timeliness) = breakdown.timeliness {
            println!("  Timeliness:   {:.1}", timeliness);
        }
        println!();
    }

    println!("Findings:");
    println!(
        "  Missing values: {}",
        section_status(&report.missing_values, |rows| {
            if rows.is_empty() {
                "none".to_string()
            } else {
                rows.iter()
                    .map(|r| format!("{} ({}, {:.1}%)", r.column, r.count, r.percentage))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        })
    );
    println!(
        "  Duplicate rows: {}",
        section_status(&report.duplicates, |d| d.total_duplicates.to_string())
    );
    println!(
        "  Categorical variants: {}",
        section_status(&report.categorical_issues, |issues| {
            let with_variants: Vec<&str> = issues
                .iter()
                .filter(|(_, issue)| !issue.variants.is_empty())
                .map(|(column, _)| column.as_str())
                .collect();
            if with_variants.is_empty() {
                "none".to_string()
            } else {
                with_variants.join(", ")
            }
        })
    );
    println!(
        "  High VIF: {}",
        section_status(&report.multicollinearity, |vif| {
            if vif.high_vif.is_empty() {
                "none".to_string()
            } else {
                vif.high_vif
                    .iter()
                    .map(|e| format!("{} ({:.1})", e.feature, e.vif))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        })
    );
    println!(
        "  Highly correlated: {}",
        section_status(&report.correlated_features, |c| {
            if c.features.is_empty() {
                "none".to_string()
            } else {
                c.features.join(", ")
            }
        })
    );
    println!(
        "  Extreme values: {}",
        section_status(&report.extreme_values, |outliers| {
            if outliers.is_empty() {
                "none".to_string()
            } else {
                outliers
                    .iter()
                    .map(|(column, s)| format!("{} ({})", column, s.count))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        })
    );
    if let Some(ref class_imbalance) = report.class_imbalance {
        println!(
            "  Class balance: {}",
            section_status(class_imbalance, |shares| {
                shares
                    .iter()
                    .map(|s| format!("{} {:.1}%", s.class, s.percentage))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
        );
    }
    println!();

    if !envelope.recommendations.is_empty() {
        println!("Fill Recommendations:");
        for rec in &envelope.recommendations {
            println!(
                "  {} ({:.1}% missing): {} - {}",
                rec.column, rec.missing_percentage, rec.strategy, rec.reason
            );
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the JSON report");
    println!("{}", "=".repeat(80));
}
