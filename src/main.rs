//! Curl Metrics CLI
//!
//! Summarizes curl timing datasets into per-metric statistics and
//! per-request phase timelines.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use curl_metrics::aggregator::{NegativeDurationPolicy, StartOffsetMode};
use curl_metrics::commands::{
    display_schema, display_version, execute_analyze, validate_dataset_file, AnalyzeArgs,
};
use curl_metrics::utils::config::{DEFAULT_DATASET_ENV, SUMMARY_TIMELINE_ROWS};

/// Curl Metrics - statistics and timelines for curl timing data
#[derive(Parser, Debug)]
#[command(name = "curl-metrics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute statistics and timelines for a dataset
    Analyze {
        /// Path to the JSON dataset
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Dataset used when --file is not given
        #[arg(long, env = DEFAULT_DATASET_ENV)]
        default_json: Option<PathBuf>,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Timeline origin: request offsets as-is, or the earliest request at 0
        #[arg(long, value_enum)]
        anchor: Option<StartOffsetMode>,

        /// Handling of negative phase durations
        #[arg(long, value_enum)]
        negative_durations: Option<NegativeDurationPolicy>,

        /// Number of timelines listed in the summary
        #[arg(long, default_value_t = SUMMARY_TIMELINE_ROWS)]
        timeline_rows: usize,
    },

    /// Validate a dataset JSON file
    Validate {
        /// Path to the JSON dataset
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display input schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            file,
            default_json,
            output,
            summary,
            config,
            title,
            anchor,
            negative_durations,
            timeline_rows,
        } => {
            // Without a report path the summary is the only output
            let print_summary = summary || output.is_none();

            let args = AnalyzeArgs {
                input: file,
                default_input: default_json,
                output_json: output,
                print_summary,
                config_path: config,
                title,
                anchor,
                negative_durations,
                timeline_rows,
            };

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_dataset_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
