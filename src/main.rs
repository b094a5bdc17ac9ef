//! Anime Genre Report - command line entry point
//!
//! Loads an anime CSV dataset, ranks genres by average rating and writes a
//! timestamped folder with charts, listings and a Markdown report.

use anime_genre_report::config::{load_config, AnalysisConfig};
use anime_genre_report::data::{DataLoader, DataProcessor};
use anime_genre_report::report::{
    OutputLayout, ReportGenerator, ReportOptions, ReportSummary, FOLDER_TIMESTAMP_FORMAT,
    REPORT_FILE_NAME, REPORT_TIMESTAMP_FORMAT,
};
use anime_genre_report::stats::StatsCalculator;
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;

/// Anime Genre Report - rank anime genres and build a static report
#[derive(Parser, Debug)]
#[command(name = "anime-genre-report")]
#[command(about = "Analyze anime genres from a CSV dataset and generate a report", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the anime CSV file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output folder prefix; a timestamp is appended
    #[arg(short, long, value_name = "DIR")]
    output_base: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum number of anime a genre needs to be ranked
    #[arg(long, value_name = "COUNT")]
    min_anime_count: Option<usize>,

    /// Number of genres analyzed in detail
    #[arg(long, value_name = "COUNT")]
    top_genres: Option<usize>,

    /// Number of anime listed per detailed genre
    #[arg(long, value_name = "COUNT")]
    top_anime: Option<usize>,

    /// Minimum co-occurrence count for side genres
    #[arg(long, value_name = "COUNT")]
    side_min_count: Option<usize>,

    /// Do not open the output folder when finished
    #[arg(long)]
    no_open: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    log::info!("Anime Genre Report v{}", env!("CARGO_PKG_VERSION"));

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    let loader = DataLoader::new(&config.data_path);
    let dataset = loader.load_and_clean().with_context(|| {
        format!(
            "Failed to load data from {}. Please check the file path",
            loader.file_path().display()
        )
    })?;

    let rows = DataProcessor::expand_genres(&dataset).context("Genre expansion failed")?;
    let ranking = StatsCalculator::rank_genres(&rows, config.min_anime_count)
        .context("Genre analysis failed")?;

    let now = Local::now();
    let root = OutputLayout::timestamped_root(
        &config.base_output_dir,
        &now.format(FOLDER_TIMESTAMP_FORMAT).to_string(),
    );
    let layout = OutputLayout::create(root).context("Failed to create output folders")?;

    let generator = ReportGenerator::new(
        layout,
        ReportOptions::from(&config),
        now.format(REPORT_TIMESTAMP_FORMAT).to_string(),
    );
    let summary = generator
        .generate(&dataset, &ranking)
        .context("Failed to write the report")?;

    if !args.quiet {
        print_summary(&summary);
    }

    if config.open_output_dir {
        generator.layout().open_in_file_browser();
    }

    Ok(())
}

/// File configuration first, then command line overrides.
fn resolve_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(input) = &args.input {
        config.data_path = input.clone();
    }
    if let Some(base) = &args.output_base {
        config.base_output_dir = base.clone();
    }
    if let Some(count) = args.min_anime_count {
        config.min_anime_count = count;
    }
    if let Some(count) = args.top_genres {
        config.top_n_genres = count;
    }
    if let Some(count) = args.top_anime {
        config.top_anime_per_genre = count;
    }
    if let Some(count) = args.side_min_count {
        config.side_genre_min_count = count;
    }
    if args.no_open {
        config.open_output_dir = false;
    }

    Ok(config)
}

fn print_summary(summary: &ReportSummary) {
    println!("\n{}", "=".repeat(80));
    println!("ANALYSIS REPORT COMPLETE");
    println!("{}", "=".repeat(80));
    println!("Output folder:    {}", summary.output_dir.display());
    println!("Markdown report:  {}", REPORT_FILE_NAME);
    println!("Images:           charts/ and tables/");
    println!("Files written:    {}", summary.written.len() + 1);
    if !summary.failed.is_empty() {
        println!("Files failed:     {}", summary.failed.len());
        for path in &summary.failed {
            println!("  - {}", path.display());
        }
    }
    println!();
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
