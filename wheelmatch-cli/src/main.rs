use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wheelmatch::io::load_gray_image;
use wheelmatch::{
    analyze_library, classification_report, classify, quality_summary, ClassifyConfig,
    QualityConfig, TemplateLibrary,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Wheel outcome recognizer and template linter")]
struct Cli {
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a captured image against a template directory.
    Classify(ClassifyArgs),
    /// Lint every template against a negative-control image.
    Lint(LintArgs),
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Directory holding number_<label>.<ext> template files.
    #[arg(long, value_name = "DIR")]
    templates: PathBuf,
    /// Image to classify.
    #[arg(long, value_name = "FILE")]
    target: PathBuf,
    /// Minimum best confidence for a non-rejected decision.
    #[arg(long, default_value_t = ClassifyConfig::default().threshold)]
    threshold: f32,
    /// Minimum best-vs-runner-up gap for acceptance.
    #[arg(long, default_value_t = ClassifyConfig::default().min_margin)]
    min_margin: f32,
    /// Correlate templates across the rayon worker pool.
    #[arg(long)]
    parallel: bool,
    /// Write the JSON report here instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LintArgs {
    /// Directory holding number_<label>.<ext> template files.
    #[arg(long, value_name = "DIR")]
    templates: PathBuf,
    /// Negative-control image containing none of the target patterns.
    #[arg(long, value_name = "FILE")]
    control: PathBuf,
    /// Fill ratios below this flag LowFill.
    #[arg(long, default_value_t = QualityConfig::default().min_fill_ratio)]
    min_fill_ratio: f32,
    /// Pixel variances below this flag LowVariance.
    #[arg(long, default_value_t = QualityConfig::default().min_variance)]
    min_variance: f32,
    /// Either dimension above this flags Oversized.
    #[arg(long, default_value_t = QualityConfig::default().max_dimension)]
    max_dimension: usize,
    /// Control confidences at or above this flag TooGeneric.
    #[arg(long, default_value_t = QualityConfig::default().generic_threshold)]
    generic_threshold: f32,
    /// Intensities at or below this count as background.
    #[arg(long, default_value_t = QualityConfig::default().background_level)]
    background_level: u8,
    /// Write the JSON summary here instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn emit<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn run_classify(args: &ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let library = TemplateLibrary::load_dir(&args.templates)?;
    let target = load_gray_image(&args.target)?;

    let cfg = ClassifyConfig {
        threshold: args.threshold,
        min_margin: args.min_margin,
        parallel: args.parallel,
        ..ClassifyConfig::default()
    };
    let decision = classify(target.view(), &library, &cfg)?;
    let report = classification_report(&decision, &library, &cfg);
    emit(&report, args.output.as_ref())
}

fn run_lint(args: &LintArgs) -> Result<(), Box<dyn std::error::Error>> {
    let library = TemplateLibrary::load_dir(&args.templates)?;
    let control = load_gray_image(&args.control)?;

    let cfg = QualityConfig {
        background_level: args.background_level,
        min_fill_ratio: args.min_fill_ratio,
        min_variance: args.min_variance,
        max_dimension: args.max_dimension,
        generic_threshold: args.generic_threshold,
        ..QualityConfig::default()
    };
    let reports = analyze_library(&library, control.view(), &cfg);
    let summary = quality_summary(reports);
    emit(&summary, args.output.as_ref())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("wheelmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    match &cli.command {
        Command::Classify(args) => run_classify(args),
        Command::Lint(args) => run_lint(args),
    }
}
