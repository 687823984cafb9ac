//! Horse racing CLI - Command-line interface for race record analysis

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use horseracing::{
    AnalysisConfig, AnalysisError, AnalysisOutcome, AnalysisRequest, CleanReport, Pipeline,
};

/// Default race entries file (relative to the working directory)
const DEFAULT_DATA_FILE: &str = "Horses.csv";
const DEFAULT_ODDS_COLUMN: &str = "ForecastPrice";

#[derive(Parser)]
#[command(name = "horseracing")]
#[command(author, version, about = "Horse race record analysis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to race entries CSV
    #[arg(long, global = true, default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Configuration file (toml, json or yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and clean the data
    Clean {
        /// Write the cleaned table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Win rates grouped by an identifier or categorical column
    Wins {
        /// HorseID, JockeyID, OwnerID, TrainerID, DamID, SireID, DamSireID, Sex or Colour
        column: String,

        /// Minimum distinct races for a group to be ranked
        #[arg(long)]
        min_races: Option<usize>,

        /// Number of groups in the top and bottom lists
        #[arg(long)]
        top: Option<usize>,
    },

    /// Win share by WeightValue or Age with a regression chart
    Plot {
        /// WeightValue or Age
        column: String,

        /// Directory for the chart PNG
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Compute the regression without writing a chart
        #[arg(long)]
        no_chart: bool,
    },

    /// Price accuracy against actual winners
    Accuracy {
        /// ForecastPrice or StartingPrice
        column: String,
    },

    /// Run several analyses over one load
    Run {
        /// Columns for win data
        #[arg(long, value_delimiter = ',')]
        wins: Vec<String>,

        /// Columns for wins charts
        #[arg(long, value_delimiter = ',')]
        plot: Vec<String>,

        /// Columns for price accuracy
        #[arg(long, value_delimiter = ',')]
        accuracy: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let mut config = AnalysisConfig::load(cli.config.as_deref())
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    if !cli.json {
        println!("{}", "Horse Racing Analysis".cyan().bold());
        println!();
    }

    if cli.interactive {
        return run_interactive(&cli.data, config);
    }

    let command = cli.command.unwrap_or(Commands::Accuracy {
        column: DEFAULT_ODDS_COLUMN.to_string(),
    });

    match command {
        Commands::Clean { output } => run_clean(&cli.data, config, output.as_deref(), cli.json),
        Commands::Wins {
            column,
            min_races,
            top,
        } => {
            let request = AnalysisRequest::WinData {
                column,
                min_races: min_races.unwrap_or(config.min_races),
                top_n: top.unwrap_or(config.top_n),
            };
            run_analyses(&cli.data, Pipeline::new(config), &[request], cli.json)
        }
        Commands::Plot {
            column,
            output_dir,
            no_chart,
        } => {
            if let Some(dir) = output_dir {
                config.chart.output_dir = dir;
            }
            let mut pipeline = Pipeline::new(config);
            if no_chart {
                pipeline = pipeline.without_charts();
            }
            let request = AnalysisRequest::WinsChart { column };
            run_analyses(&cli.data, pipeline, &[request], cli.json)
        }
        Commands::Accuracy { column } => {
            let request = AnalysisRequest::PriceAccuracy { column };
            run_analyses(&cli.data, Pipeline::new(config), &[request], cli.json)
        }
        Commands::Run {
            wins,
            plot,
            accuracy,
        } => {
            let mut requests = Vec::new();
            requests.extend(wins.into_iter().map(|column| AnalysisRequest::WinData {
                column,
                min_races: config.min_races,
                top_n: config.top_n,
            }));
            requests.extend(
                plot.into_iter()
                    .map(|column| AnalysisRequest::WinsChart { column }),
            );
            requests.extend(
                accuracy
                    .into_iter()
                    .map(|column| AnalysisRequest::PriceAccuracy { column }),
            );
            run_analyses(&cli.data, Pipeline::new(config), &requests, cli.json)
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

/// Run a loading step behind a spinner
fn with_spinner<T>(message: &'static str, task: impl FnOnce() -> T) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);

    let output = task();

    pb.finish_and_clear();
    Ok(output)
}

fn load_cleaned(pipeline: &Pipeline, data: &Path) -> Result<CleanReport> {
    with_spinner("Loading race data...", || pipeline.prepare(data))?
        .with_context(|| format!("Failed to load race data from {:?}", data))
}

fn run_clean(data: &Path, config: AnalysisConfig, output: Option<&Path>, json: bool) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let report = load_cleaned(&pipeline, data)?;

    if let Some(path) = output {
        report
            .table
            .write_csv(path)
            .with_context(|| format!("Failed to write cleaned CSV to {:?}", path))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_clean_report(&report);
        if let Some(path) = output {
            println!("{} {:?}", "Cleaned data written to".green(), path);
        }
    }
    Ok(())
}

fn run_analyses(
    data: &Path,
    pipeline: Pipeline,
    requests: &[AnalysisRequest],
    json: bool,
) -> Result<()> {
    let run = with_spinner("Loading race data...", || pipeline.run(data, requests))?
        .with_context(|| format!("Failed to load race data from {:?}", data))?;

    if json {
        let results: Vec<serde_json::Value> = run
            .results
            .iter()
            .map(|(request, result)| match result {
                Ok(outcome) => json!({ "request": request, "outcome": outcome }),
                Err(e) => json!({ "request": request, "error": e.to_string() }),
            })
            .collect();
        let document = json!({ "clean": run.clean, "results": results });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_clean_report(&run.clean);
    for (request, result) in &run.results {
        print_outcome(request, result);
    }
    Ok(())
}

fn print_clean_report(report: &CleanReport) {
    println!("{}", "Cleaning:".yellow().bold());
    println!("{}", report);
    println!(
        "{} of {} rows remain, {} columns",
        report.rows_after,
        report.rows_before,
        report.table.column_names().len()
    );
}

fn print_outcome(request: &AnalysisRequest, result: &Result<AnalysisOutcome, AnalysisError>) {
    let heading = match request {
        AnalysisRequest::WinData { .. } => "Win data",
        AnalysisRequest::WinsChart { .. } => "Wins by value",
        AnalysisRequest::PriceAccuracy { .. } => "Price accuracy",
    };
    println!();
    println!(
        "{} {}",
        format!("{}:", heading).yellow().bold(),
        request.column()
    );

    match result {
        Ok(outcome) => println!("{}", outcome),
        Err(e) if e.is_recoverable() => println!("{}", e.to_string().yellow()),
        Err(e) => println!("{} {}", "Error:".red().bold(), e),
    }
}

fn run_interactive(data: &Path, config: AnalysisConfig) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();
    let min_races = config.min_races;
    let top_n = config.top_n;
    let pipeline = Pipeline::new(config);
    let clean = load_cleaned(&pipeline, data)?;
    print_clean_report(&clean);
    println!();

    loop {
        let options = vec!["Win data", "Wins by value", "Price accuracy", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        let request = match selection {
            0 => {
                let column: String = Input::with_theme(&theme)
                    .with_prompt("Column")
                    .default("JockeyID".to_string())
                    .interact_text()?;
                let min_races: usize = Input::with_theme(&theme)
                    .with_prompt("Minimum races")
                    .default(min_races)
                    .interact_text()?;
                let top_n: usize = Input::with_theme(&theme)
                    .with_prompt("Top/bottom count")
                    .default(top_n)
                    .interact_text()?;
                AnalysisRequest::WinData {
                    column,
                    min_races,
                    top_n,
                }
            }
            1 => {
                let column: String = Input::with_theme(&theme)
                    .with_prompt("Column (WeightValue or Age)")
                    .default("Age".to_string())
                    .interact_text()?;
                AnalysisRequest::WinsChart { column }
            }
            2 => {
                let column: String = Input::with_theme(&theme)
                    .with_prompt("Column (ForecastPrice or StartingPrice)")
                    .default(DEFAULT_ODDS_COLUMN.to_string())
                    .interact_text()?;
                AnalysisRequest::PriceAccuracy { column }
            }
            _ => {
                println!("Goodbye!");
                break;
            }
        };

        let result = pipeline.execute(&clean.table, &request);
        print_outcome(&request, &result);
        println!();
    }

    Ok(())
}
